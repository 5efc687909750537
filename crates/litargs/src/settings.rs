use serde::{Deserialize, Serialize};

/// Character that marks a token as an option reference.
pub const DEFAULT_MARKER: char = '-';

/// What to do when the same option marker appears more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Record a `DuplicateError` for every repeated occurrence.
    #[default]
    Report,
    /// Accept repeats; the last occurrence wins when options are folded.
    LastWins,
}

/// What to do with value tokens that follow a flag before the next marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrphanPolicy {
    /// Record an `ArgumentError` naming the stray tokens.
    #[default]
    Reject,
    /// Drop them silently.
    Ignore,
}

/// Per-instance parser configuration.
///
/// Every field has a default, so a partial JSON object such as
/// `{"duplicates": "last-wins"}` deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub marker: char,
    pub duplicates: DuplicatePolicy,
    pub orphans: OrphanPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER,
            duplicates: DuplicatePolicy::default(),
            orphans: OrphanPolicy::default(),
        }
    }
}

impl Settings {
    pub fn marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn orphans(mut self, policy: OrphanPolicy) -> Self {
        self.orphans = policy;
        self
    }
}
