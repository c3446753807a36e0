//! Validation policies applied by the review service.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether argument length limits are enforced.
///
/// Limits are off by default: ids, texts and patterns of any length are
/// accepted unless an operator opts in.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LimitMode {
    /// Accept arguments of any length.
    #[default]
    Off,
    /// Reject arguments outside the configured bounds with a bad request.
    Enforce,
}

/// How a search treats stored records that fail to decode.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CorruptRecordPolicy {
    /// Emit whatever fields could be salvaged and log a warning.
    #[default]
    Tolerate,
    /// Fail the whole search with an internal error.
    Reject,
}
