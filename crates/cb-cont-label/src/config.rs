//! Codec configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable holding the action hash seed.
pub const HASH_SEED_ENV: &str = "CBCONT_HASH_SEED";

/// Seed used when hashing action names if nothing else is configured.
pub const DEFAULT_HASH_SEED: u32 = 0;

/// Parameters shared by the text parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Seed passed to the action-name hash.
    pub hash_seed: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            hash_seed: DEFAULT_HASH_SEED,
        }
    }
}

impl CodecConfig {
    /// Create a config with an explicit hash seed.
    pub fn new(hash_seed: u32) -> Self {
        CodecConfig { hash_seed }
    }

    /// Read the seed from `CBCONT_HASH_SEED`, falling back to the default.
    pub fn from_env() -> Self {
        match std::env::var(HASH_SEED_ENV) {
            Ok(raw) => Self::from_seed_str(&raw),
            Err(_) => Self::default(),
        }
    }

    fn from_seed_str(raw: &str) -> Self {
        match raw.trim().parse::<u32>() {
            Ok(hash_seed) => CodecConfig { hash_seed },
            Err(e) => {
                warn!(
                    event = "config.invalid_hash_seed",
                    value = %raw,
                    error = %e,
                    "ignoring invalid hash seed"
                );
                Self::default()
            }
        }
    }
}
