//! Persistence boundary for the Lanota song bot: tolerant catalog loading
//! and the alias file with its coarse write lock. This is the only part of
//! the system that touches disk; everything it hands out is plain data for
//! `lanota-core` to compute over.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use eyre::WrapErr;
use models::{AliasTable, Category, Song};
use tracing::warn;

pub const SONGS_FILE: &str = "lanota_songs.json";
pub const ALIASES_FILE: &str = "lanota_aliases.json";

/// An immutable catalog snapshot, loaded fresh per request.
#[derive(Debug, Clone, Default)]
pub struct SongDb {
    songs: Vec<Song>,
}

impl SongDb {
    pub fn new(songs: Vec<Song>) -> Self {
        SongDb { songs }
    }

    /// Strict loader for tooling: any read or parse failure is an error.
    pub fn load_from_path(path: &Path) -> eyre::Result<Self> {
        let file =
            File::open(path).wrap_err_with(|| format!("open song catalog: {}", path.display()))?;
        let reader = BufReader::new(file);
        let songs: Vec<Song> = serde_json::from_reader(reader)
            .wrap_err_with(|| format!("parse song catalog: {}", path.display()))?;
        Ok(SongDb { songs })
    }

    /// Request-path loader: a shared bot process must keep answering, so an
    /// unreadable catalog degrades to an empty one with a warning.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load_from_path(path) {
            Ok(db) => db,
            Err(err) => {
                warn!(
                    "song catalog unreadable at {} ({err:#}); serving an empty catalog",
                    path.display()
                );
                SongDb::default()
            }
        }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn has_title_ci(&self, candidate: &str) -> bool {
        let needle = candidate.to_lowercase();
        self.songs
            .iter()
            .any(|song| song.title.to_lowercase() == needle)
    }

    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for song in &self.songs {
            *counts.entry(song.category).or_insert(0) += 1;
        }
        counts
    }
}

/// Result of an alias add. Refusals are values, not errors; `Err` from the
/// store is I/O only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasWrite {
    Added { title: String },
    /// The alias equals a song's canonical title.
    IsCanonicalTitle,
    /// The alias already belongs to a different song.
    UsedBy { title: String },
    /// The alias is already registered under this very title.
    AlreadyPresent { title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasRemoval {
    Removed { title: String },
    NotFound,
}

/// The alias file plus the single coarse lock serializing its
/// read-modify-write cycles. Two concurrent edits must never interleave,
/// since every write rewrites the whole file.
#[derive(Debug)]
pub struct AliasStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl AliasStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AliasStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table; a missing file is an empty table, not an error.
    pub fn load_strict(&self) -> eyre::Result<AliasTable> {
        if !self.path.exists() {
            return Ok(AliasTable::default());
        }
        let file = File::open(&self.path)
            .wrap_err_with(|| format!("open alias table: {}", self.path.display()))?;
        let reader = BufReader::new(file);
        let table: AliasTable = serde_json::from_reader(reader)
            .wrap_err_with(|| format!("parse alias table: {}", self.path.display()))?;
        Ok(table)
    }

    /// Request-path read: degrade to an empty table with a warning.
    pub fn load(&self) -> AliasTable {
        match self.load_strict() {
            Ok(table) => table,
            Err(err) => {
                warn!(
                    "alias table unreadable at {} ({err:#}); serving an empty table",
                    self.path.display()
                );
                AliasTable::default()
            }
        }
    }

    /// Register `alias` under `title`, refusing aliases that collide with a
    /// canonical title or already belong to someone. The whole
    /// read-modify-write runs under the store lock.
    pub fn add_alias(&self, db: &SongDb, title: &str, alias: &str) -> eyre::Result<AliasWrite> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if db.has_title_ci(alias) {
            return Ok(AliasWrite::IsCanonicalTitle);
        }

        let mut table = self.load_strict()?;
        if let Some(owner) = table.canonical_for(alias) {
            let owner = owner.to_string();
            return Ok(if owner == title {
                AliasWrite::AlreadyPresent { title: owner }
            } else {
                AliasWrite::UsedBy { title: owner }
            });
        }

        table.add(title, alias);
        self.write(&table)?;
        Ok(AliasWrite::Added {
            title: title.to_string(),
        })
    }

    /// Remove `alias` from whichever title holds it.
    pub fn remove_alias(&self, alias: &str) -> eyre::Result<AliasRemoval> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut table = self.load_strict()?;
        match table.remove(alias) {
            Some(title) => {
                self.write(&table)?;
                Ok(AliasRemoval::Removed { title })
            }
            None => Ok(AliasRemoval::NotFound),
        }
    }

    fn write(&self, table: &AliasTable) -> eyre::Result<()> {
        let bytes = serde_json::to_vec_pretty(table).wrap_err("serialize alias table")?;
        std::fs::write(&self.path, bytes)
            .wrap_err_with(|| format!("write alias table: {}", self.path.display()))?;
        Ok(())
    }
}
