//! Feeder table: which feeder slot, nozzle, speed and height each component
//! key is placed with.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::placement::ComponentKey;

/// Minimum number of columns a feeder row must carry.
pub const FEEDER_COLUMNS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeederSlot {
    pub feeder: String,
    pub nozzle: String,
    pub speed: String,
    pub height: String,
}

#[derive(Debug, Clone, Default)]
pub struct FeederTable {
    entries: HashMap<ComponentKey, FeederSlot>,
}

impl FeederTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Self::from_reader(path, file)
    }

    /// Loads a table from CSV. `path` only labels diagnostics.
    ///
    /// The header row is skipped. A key listed twice keeps its last row.
    pub fn from_reader(path: impl Into<PathBuf>, reader: impl Read) -> Result<Self> {
        let path = path.into();
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut table = Self::new();
        for record in rows.records() {
            let record = record.map_err(|e| Error::csv(&path, e))?;
            let line = record.position().map_or(0, |p| p.line());
            if record.len() < FEEDER_COLUMNS {
                return Err(Error::ShortRow {
                    path,
                    line,
                    expected: FEEDER_COLUMNS,
                    found: record.len(),
                });
            }
            let key = ComponentKey::from(&record[0]);
            let slot = FeederSlot {
                feeder: record[1].to_string(),
                nozzle: record[2].to_string(),
                speed: record[3].to_string(),
                height: record[4].to_string(),
            };
            if table.insert(key.clone(), slot).is_some() {
                tracing::warn!(key = %key, line, "duplicate feeder entry, later row wins");
            }
        }
        tracing::debug!(path = ?path, entries = table.len(), "loaded feeder table");
        Ok(table)
    }

    /// Returns the previous slot for `key`, if any.
    pub fn insert(&mut self, key: ComponentKey, slot: FeederSlot) -> Option<FeederSlot> {
        self.entries.insert(key, slot)
    }

    pub fn lookup(&self, key: &ComponentKey) -> Option<&FeederSlot> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
