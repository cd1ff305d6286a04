//! Settings for the training and generation phases.

use serde::{Deserialize, Serialize};

/// Number of basic color terms taken from the frequency ranking.
pub const DEFAULT_VOCABULARY_SIZE: usize = 43;

/// Words of history the language model conditions on.
pub const DEFAULT_STATE_SIZE: usize = 2;

/// Candidate names tried per request before giving up.
pub const MAX_ITERATIONS: usize = 500;

/// Frequent corpus words that describe colors without being colors.
pub const DEFAULT_STOPLIST: &[&str] = &[
    "of", "mist", "sea", "sweet", "spring", "ice", "sky", "light", "garden", "stone", "deep",
    "golden", "dark", "pale", "soft", "the", "fresh", "mountain", "sage", "desert",
];

/// Vendors whose catalogs make up the default training corpus.
pub const DEFAULT_VENDORS: &[&str] = &["sherwinwilliams", "behr", "resene", "benjaminmoore"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub vocabulary_size: usize,
    pub stoplist: Vec<String>,
    pub state_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            vocabulary_size: DEFAULT_VOCABULARY_SIZE,
            stoplist: DEFAULT_STOPLIST.iter().map(|s| s.to_string()).collect(),
            state_size: DEFAULT_STATE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Upper bound on candidates sampled per request.
    pub max_iterations: usize,
    /// How many of the nearest basic colors a name may use.
    pub neighbours: usize,
    /// Also sample patterns without a `COLOR` tag; those are checked
    /// against related words instead of color names.
    pub all_patterns: bool,
    /// Reject candidates that copy long runs of a training name.
    pub novel_only: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            max_iterations: MAX_ITERATIONS,
            neighbours: 1,
            all_patterns: false,
            novel_only: false,
        }
    }
}
