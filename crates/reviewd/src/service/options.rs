//! Validation settings derived from the daemon configuration.

use review_config::{Config, CorruptRecordPolicy, LimitMode};

/// Inclusive upper bounds on argument lengths, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    /// Longest accepted document id.
    pub max_id_length: usize,
    /// Longest accepted `text` field.
    pub max_text_length: usize,
    /// Longest accepted search pattern.
    pub max_pattern_length: usize,
}

impl FieldLimits {
    /// Bounds taken from `config`, regardless of whether they are enforced.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_id_length: config.max_id_length,
            max_text_length: config.max_text_length,
            max_pattern_length: config.max_pattern_length,
        }
    }
}

/// Knobs the review service consults on every invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Length bounds, or `None` when any length is accepted.
    pub limits: Option<FieldLimits>,
    /// Treatment of records that fail to decode during a search.
    pub corrupt_records: CorruptRecordPolicy,
}

impl ServiceOptions {
    /// Derives the options from the resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let limits = match config.field_limits() {
            LimitMode::Off => None,
            LimitMode::Enforce => Some(FieldLimits::from_config(config)),
        };
        Self {
            limits,
            corrupt_records: config.corrupt_records(),
        }
    }
}
