// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Threshold tables: every checkpoint's invariant, keyed by name.
//!
//! Tables keep the numbers out of the comparison logic so they can be audited
//! and tuned on their own. A host usually compiles one in with
//! [`ThresholdTable::builder`]; the same table round-trips through JSON for
//! review, and [`ThresholdTable::fingerprint`] gives a CRC32 over the
//! canonical JSON so two copies can be compared at a glance.
//!
//! ```json
//! {
//!   "checkpoints": [
//!     {
//!       "name": "bucket-density",
//!       "category": "density",
//!       "predicate": { "op": "exceeds", "boundary": "inclusive" },
//!       "threshold": { "kind": "derived", "formula": "n / 10", "floor": 1 },
//!       "description": "..."
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::GuardError;
use crate::invariant::Invariant;
use crate::threshold::Threshold;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableFile", into = "TableFile")]
pub struct ThresholdTable {
    entries: BTreeMap<String, Invariant>,
}

/// On-disk shape: a list, so duplicate names can be detected.
#[derive(Serialize, Deserialize)]
struct TableFile {
    checkpoints: Vec<Invariant>,
}

impl TryFrom<TableFile> for ThresholdTable {
    type Error = GuardError;

    fn try_from(file: TableFile) -> Result<Self, Self::Error> {
        let mut table = ThresholdTable::new();
        for invariant in file.checkpoints {
            table.insert(invariant)?;
        }
        Ok(table)
    }
}

impl From<ThresholdTable> for TableFile {
    fn from(table: ThresholdTable) -> Self {
        TableFile {
            checkpoints: table.entries.into_values().collect(),
        }
    }
}

impl ThresholdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> TableBuilder {
        TableBuilder {
            table: ThresholdTable::new(),
        }
    }

    /// Add an invariant. Names must be unique.
    pub fn insert(&mut self, invariant: Invariant) -> Result<(), GuardError> {
        if self.entries.contains_key(&invariant.name) {
            return Err(GuardError::DuplicateCheckpoint {
                name: invariant.name,
            });
        }
        self.entries.insert(invariant.name.clone(), invariant);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Invariant> {
        self.entries.get(name)
    }

    pub fn invariant(&self, name: &str) -> Result<&Invariant, GuardError> {
        self.get(name).ok_or_else(|| GuardError::UnknownCheckpoint {
            name: name.to_string(),
        })
    }

    /// Replace one checkpoint's threshold, leaving everything else as is.
    pub fn retune(&mut self, name: &str, threshold: Threshold) -> Result<(), GuardError> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| GuardError::UnknownCheckpoint {
                name: name.to_string(),
            })?;
        entry.threshold = threshold;
        Ok(())
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Invariant> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, GuardError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, GuardError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, GuardError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GuardError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| GuardError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// CRC32 of the compact canonical JSON (entries sorted by name).
    pub fn fingerprint(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        // serializing plain data into a Vec cannot fail
        if let Ok(bytes) = serde_json::to_vec(self) {
            hasher.update(&bytes);
        }
        hasher.finalize()
    }
}

/// Collects compiled-in entries. A repeated name replaces the earlier entry.
pub struct TableBuilder {
    table: ThresholdTable,
}

impl TableBuilder {
    pub fn entry(mut self, invariant: Invariant) -> Self {
        self.table
            .entries
            .insert(invariant.name.clone(), invariant);
        self
    }

    pub fn build(self) -> ThresholdTable {
        self.table
    }
}
