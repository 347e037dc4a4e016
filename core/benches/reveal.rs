use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use mineclear_core::*;
use std::hint::black_box;

fn first_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_reveal");
    for (size, mines) in [(9, 10), (16, 40), (64, 600), (255, 9000)] {
        group.bench_function(format!("{size}x{size}/{mines}"), |b| {
            b.iter_batched(
                || GameEngine::new(Board::new(size, mines), 0x5eed).unwrap(),
                |mut engine| black_box(engine.reveal((size / 2, size / 2))),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn empty_board_cascade(c: &mut Criterion) {
    c.bench_function("cascade/255x255/empty", |b| {
        b.iter_batched(
            || GameEngine::new(Board::new(255, 0), 1).unwrap(),
            |mut engine| black_box(engine.reveal((0, 0))),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, first_reveal, empty_board_cascade);
criterion_main!(benches);
