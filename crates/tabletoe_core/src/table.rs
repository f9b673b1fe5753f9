//! Precomputed action-value tables.
//!
//! A table maps a [`StateKey`] to nine values, one per cell. It is built
//! offline, loaded once, and read-only afterwards.

use super::{Board, MarkMapping, StateKey, encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Value per candidate cell, in board order.
pub type MoveValues = [f64; 9];

/// Values returned for states the table does not know.
const ZERO_VALUES: MoveValues = [0.0; 9];

/// Immutable action-value table plus the mark convention its keys use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionTable {
    entries: HashMap<String, MoveValues>,
    mapping: MarkMapping,
    rejected: usize,
}

impl DecisionTable {
    /// An empty table. Move selection falls back to random play.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from already-validated entries under the canonical mapping.
    pub fn from_entries(entries: impl IntoIterator<Item = (StateKey, MoveValues)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, values)| (key.into_string(), values))
                .collect(),
            mapping: MarkMapping::canonical(),
            rejected: 0,
        }
    }

    /// Parses a JSON object of `key -> [9 numbers]` under the canonical mapping.
    ///
    /// Entries whose key does not parse as nine codes, or whose value is not a
    /// list of exactly nine numbers, are dropped and counted in [`Self::rejected`].
    #[instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut entries = HashMap::with_capacity(raw.len());
        let mut rejected = 0;
        for (key, values) in raw {
            if let Err(e) = StateKey::parse_codes(&key) {
                warn!(error = %e, "Dropping table entry with malformed key");
                rejected += 1;
                continue;
            }
            let Some(values) = move_values(&values) else {
                warn!(key = %key, "Dropping table entry without 9 numeric values");
                rejected += 1;
                continue;
            };
            entries.insert(key, values);
        }

        debug!(entries = entries.len(), rejected, "Decision table parsed");
        Ok(Self {
            entries,
            mapping: MarkMapping::canonical(),
            rejected,
        })
    }

    /// Replaces the mark convention used to encode lookups.
    pub fn with_mapping(mut self, mapping: MarkMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// The mark convention this table's keys were built with.
    pub fn mapping(&self) -> MarkMapping {
        self.mapping
    }

    /// Number of usable entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries dropped while parsing.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Key for `board` under this table's convention.
    pub fn key_for(&self, board: &Board) -> StateKey {
        encode(board, self.mapping)
    }

    /// Looks up a key, `None` when absent.
    pub fn lookup(&self, key: &StateKey) -> Option<&MoveValues> {
        self.entries.get(key.as_str())
    }

    /// Values for `board`, nine zeros when the state is unknown.
    #[instrument(skip(self, board))]
    pub fn values_for(&self, board: &Board) -> MoveValues {
        let key = self.key_for(board);
        match self.lookup(&key) {
            Some(values) => *values,
            None => {
                debug!(key = %key, "State not in table");
                ZERO_VALUES
            }
        }
    }
}

/// Reads a JSON array of exactly nine numbers.
fn move_values(value: &serde_json::Value) -> Option<MoveValues> {
    let numbers = value
        .as_array()?
        .iter()
        .map(serde_json::Value::as_f64)
        .collect::<Option<Vec<f64>>>()?;
    MoveValues::try_from(numbers.as_slice()).ok()
}

/// Error parsing a decision table.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
#[display("Invalid decision table: {}", _0)]
pub struct TableError(serde_json::Error);
