use serde::{Deserialize, Serialize};

/// Matches the recursion limit of the `serde_json` parser.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What to do with values outside the plain data model, such as `NaN` or infinities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ClonePolicy {
    /// Fail with a serialization error.
    #[default]
    Strict,
    /// Replace the value with null, the way a JSON text round trip does.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneOptions {
    pub policy: ClonePolicy,
    /// Maximum number of nested containers, counting the root.
    pub max_depth: usize,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            policy: ClonePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CloneOptions {
    pub fn lenient() -> Self {
        Self {
            policy: ClonePolicy::Lenient,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
