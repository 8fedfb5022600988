use serde::{Deserialize, Serialize};

use crate::classifier::DEFAULT_VOCABULARY_KEY_THRESHOLD;

/// Configuration for bundle resolution behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Reject siblings whose content classifies to a role other than the one
    /// implied by their conventional file name
    pub strict_roles: bool,

    /// A `vocab.json` object needs strictly more keys than this to count as a
    /// vocabulary
    pub vocabulary_key_threshold: usize,

    /// Issue sibling fetches concurrently instead of one after another
    pub concurrent_fetch: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strict_roles: false,
            vocabulary_key_threshold: DEFAULT_VOCABULARY_KEY_THRESHOLD,
            concurrent_fetch: true,
        }
    }
}

impl ResolverConfig {
    /// Create config that only accepts siblings confirming their expected role
    pub fn strict() -> Self {
        Self {
            strict_roles: true,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.vocabulary_key_threshold == 0 {
            return Err("vocabulary_key_threshold must be > 0".to_string());
        }
        Ok(())
    }
}
