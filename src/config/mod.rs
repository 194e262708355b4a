//! Configuration APIs for chainmap
//!
//! Configuration types share the [`Config`] trait, which covers validation,
//! environment initialization, presets and JSON file round-trips.
//!
//! # Preset Configurations
//!
//! ```rust
//! use chainmap::config::{ChainedHashMapConfig, Config};
//!
//! // Prune digests as soon as their chain empties
//! let config = ChainedHashMapConfig::memory_preset();
//! assert!(!config.retain_vacated_digests);
//!
//! // Keep every digest ever occupied
//! let config = ChainedHashMapConfig::balanced_preset();
//! assert!(config.retain_vacated_digests);
//! ```
//!
//! # Environment Initialization
//!
//! ```rust
//! use chainmap::config::{ChainedHashMapConfig, Config};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads CHAINMAP_MAP_* variables, falling back to defaults
//! let config = ChainedHashMapConfig::from_env()?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::env;
use std::fmt;
use std::path::Path;

pub mod hash_map;


pub use hash_map::ChainedHashMapConfig;

/// Common configuration trait providing validation, environment initialization,
/// and preset management functionality.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, `Err` with details if invalid.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables.
    ///
    /// Environment variables use the format `CHAINMAP_{COMPONENT}_{FIELD}`,
    /// e.g. `CHAINMAP_MAP_LONG_CHAIN_THRESHOLD=16`.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix("CHAINMAP_")
    }

    /// Initialize configuration from environment variables with a custom prefix.
    ///
    /// # Arguments
    ///
    /// * `prefix` - The environment variable prefix to use
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Get a performance-optimized preset configuration.
    fn performance_preset() -> Self;

    /// Get a memory-optimized preset configuration.
    fn memory_preset() -> Self;

    /// Get a real-time preset configuration with predictable per-operation cost.
    fn realtime_preset() -> Self;

    /// Get a balanced preset configuration.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a file as pretty-printed JSON.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Utility function to parse environment variable with fallback to default.
///
/// # Arguments
///
/// * `var_name` - The environment variable name
/// * `default` - The default value if the environment variable is not set
///   or does not parse
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Utility function to parse boolean environment variable.
///
/// Accepts: "true", "1", "yes", "on" (case-insensitive) as true,
/// everything else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}
