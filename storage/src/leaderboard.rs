use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::*;

/// How many entries the leaderboard keeps.
pub const MAX_ENTRIES: usize = 10;

/// Name recorded when the player did not give one.
pub const ANONYMOUS: &str = "Anon.";

/// One leaderboard line. A score of 0 means "no numeric score" and is stored as an empty field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub score: u32,
}

impl Entry {
    /// Ascending by score, so an entry without a score ranks first.
    fn sort_key(&self) -> u32 {
        self.score
    }
}

/// Best completion times, lowest first, backed by a `name score` text file.
#[derive(Clone, Debug)]
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<Entry>,
}

impl Leaderboard {
    /// Reads every record from `path`. A missing file is an empty leaderboard, a malformed line fails the load.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };

        let mut entries = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| parse_record(index + 1, line))
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by_key(Entry::sort_key);
        log::debug!("Loaded {} leaderboard entries", entries.len());

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a score and rewrites the file, returning the 1-based rank if the entry made the cut.
    pub fn add_score(&mut self, name: &str, score: u32) -> Result<Option<usize>> {
        let entry = Entry {
            name: clean_name(name),
            score,
        };

        self.entries.push(entry.clone());
        self.entries.sort_by_key(Entry::sort_key);
        // stable sort keeps the new entry behind existing ties
        let rank = self
            .entries
            .iter()
            .rposition(|e| *e == entry)
            .filter(|&pos| pos < MAX_ENTRIES)
            .map(|pos| pos + 1);
        self.entries.truncate(MAX_ENTRIES);

        self.persist()?;
        log::debug!("Added score {} for {:?}, rank {:?}", score, entry.name, rank);

        Ok(rank)
    }

    /// Name at a 1-based rank, empty when there is no such rank.
    pub fn name_at(&self, rank: usize) -> &str {
        self.entry_at(rank).map_or("", |entry| entry.name.as_str())
    }

    /// Score at a 1-based rank, 0 when there is no such rank.
    pub fn score_at(&self, rank: usize) -> u32 {
        self.entry_at(rank).map_or(0, |entry| entry.score)
    }

    fn entry_at(&self, rank: usize) -> Option<&Entry> {
        rank.checked_sub(1).and_then(|index| self.entries.get(index))
    }

    fn persist(&self) -> Result<()> {
        let mut content = String::new();
        for entry in &self.entries {
            content.push_str(&entry.name);
            content.push(' ');
            if entry.score > 0 {
                content.push_str(&entry.score.to_string());
            }
            content.push('\n');
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;

        Ok(())
    }
}

/// Names are a single token on disk.
fn clean_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return ANONYMOUS.to_owned();
    }

    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

fn parse_record(line: usize, content: &str) -> Result<Entry> {
    let malformed = || StorageError::MalformedRecord {
        line,
        content: content.to_owned(),
    };

    let mut fields = content.split_whitespace();
    let name = fields.next().ok_or_else(malformed)?;
    let score = match fields.next() {
        Some(score) => score.parse().map_err(|_| malformed())?,
        None => 0,
    };
    if fields.next().is_some() {
        return Err(malformed());
    }

    Ok(Entry {
        name: name.to_owned(),
        score,
    })
}
