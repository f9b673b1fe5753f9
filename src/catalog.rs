//! Catalog of shipped decision tables.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A named decision table the player can pick.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Model {
    /// Lightly trained table.
    Easy,
    /// Default table.
    #[default]
    Normal,
    /// Longest-trained table.
    Advanced,
}

impl Model {
    /// Asset file name of this table.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Easy => "q_table_easy.json",
            Self::Normal => "q_table_normal.json",
            Self::Advanced => "q_table_advanced.json",
        }
    }

    /// Returns the display label for this option.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy Model",
            Self::Normal => "Normal Model",
            Self::Advanced => "Advanced Model",
        }
    }

    /// Looks up a model by asset file name.
    #[instrument]
    pub fn from_file_name(file: &str) -> Option<Self> {
        <Self as strum::IntoEnumIterator>::iter().find(|m| m.file_name() == file)
    }

    /// Next model in catalog order, wrapping around.
    #[instrument]
    pub fn cycle(self) -> Self {
        match self {
            Self::Easy => Self::Normal,
            Self::Normal => Self::Advanced,
            Self::Advanced => Self::Easy,
        }
    }
}

/// Which side the human takes. The first mover always plays `X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Human moves first.
    #[default]
    First,
    /// AI moves first.
    Second,
}

impl Role {
    /// Returns the display label for this option.
    #[instrument]
    pub fn label(self) -> &'static str {
        match self {
            Self::First => "Play first (X)",
            Self::Second => "Play second (O)",
        }
    }

    /// Toggles between `First` and `Second`.
    #[instrument]
    pub fn toggle(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}
