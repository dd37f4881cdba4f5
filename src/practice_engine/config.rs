//! Session configuration: which tables to practise and how many questions.
//!
//! A [`SessionConfig`] must pass [`SessionConfig::validate`] before a session
//! can start. Validation failures carry a user-facing message and are meant
//! to be shown next to the setup controls, not treated as crashes.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest session the runner accepts.
pub const MIN_SESSION_LENGTH: usize = 5;

/// Tables offered for selection.
pub const ALL_TABLES: std::ops::RangeInclusive<u32> = 1..=20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Please select at least one times table to practice.")]
    NoTablesSelected,

    #[error("Session length must be at least {min} questions.", min = MIN_SESSION_LENGTH)]
    SessionTooShort(usize),

    #[error("The {0} times table is not available. Choose tables from {lo} to {hi}.",
        lo = ALL_TABLES.start(), hi = ALL_TABLES.end())]
    TableOutOfRange(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub selected_tables: BTreeSet<u32>,
    pub session_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            selected_tables: TablePreset::Beginner.tables().collect(),
            session_length: 20,
        }
    }
}

impl SessionConfig {
    pub fn new(tables: impl IntoIterator<Item = u32>, session_length: usize) -> Self {
        SessionConfig {
            selected_tables: tables.into_iter().collect(),
            session_length,
        }
    }

    /// Check the preconditions a session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selected_tables.is_empty() {
            return Err(ConfigError::NoTablesSelected);
        }
        if let Some(&table) = self.selected_tables.iter().find(|&&t| !ALL_TABLES.contains(&t)) {
            return Err(ConfigError::TableOutOfRange(table));
        }
        if self.session_length < MIN_SESSION_LENGTH {
            return Err(ConfigError::SessionTooShort(self.session_length));
        }
        Ok(())
    }

    /// Add `table` if absent, remove it if present.
    pub fn toggle_table(&mut self, table: u32) {
        if !self.selected_tables.remove(&table) {
            self.selected_tables.insert(table);
        }
    }

    /// Replace the selection with a preset range.
    pub fn apply_preset(&mut self, preset: TablePreset) {
        self.selected_tables = preset.tables().collect();
    }

    pub fn clear_tables(&mut self) {
        self.selected_tables.clear();
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TablePreset {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl TablePreset {
    pub fn tables(self) -> std::ops::RangeInclusive<u32> {
        match self {
            TablePreset::Beginner     => 2..=5,
            TablePreset::Intermediate => 6..=9,
            TablePreset::Advanced     => 10..=12,
            TablePreset::Expert       => 13..=20,
        }
    }
}

impl fmt::Display for TablePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.tables();
        let name = match self {
            TablePreset::Beginner     => "Beginner",
            TablePreset::Intermediate => "Intermediate",
            TablePreset::Advanced     => "Advanced",
            TablePreset::Expert       => "Expert",
        };
        write!(f, "{} ({}-{})", name, range.start(), range.end())
    }
}
