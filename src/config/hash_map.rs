//! Configuration for chained hash maps.

use super::{parse_env_bool, parse_env_var, Config};
use crate::error::{ChainMapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for [`ChainedHashMap`](crate::hash_map::ChainedHashMap).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainedHashMapConfig {
    /// Keep a digest in the occupied set after its last entry is removed.
    ///
    /// Vacated digests are skipped during iteration either way; keeping them
    /// trades index-set space for never shifting the set on removal.
    pub retain_vacated_digests: bool,
    /// Capacity reserved for a freshly created chain
    pub initial_chain_capacity: usize,
    /// Chain length at which a debug message is logged
    pub long_chain_threshold: usize,
}

impl Default for ChainedHashMapConfig {
    fn default() -> Self {
        Self {
            retain_vacated_digests: true,
            initial_chain_capacity: 1,
            long_chain_threshold: 8,
        }
    }
}

impl Config for ChainedHashMapConfig {
    fn validate(&self) -> Result<()> {
        if self.initial_chain_capacity == 0 {
            return Err(ChainMapError::configuration(
                "initial_chain_capacity must be at least 1".to_string(),
            ));
        }
        if self.long_chain_threshold < 2 {
            return Err(ChainMapError::configuration(format!(
                "long_chain_threshold must be at least 2, got {}",
                self.long_chain_threshold
            )));
        }
        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.retain_vacated_digests = parse_env_bool(
            &format!("{}MAP_RETAIN_VACATED_DIGESTS", prefix),
            config.retain_vacated_digests,
        );
        config.initial_chain_capacity = parse_env_var(
            &format!("{}MAP_INITIAL_CHAIN_CAPACITY", prefix),
            config.initial_chain_capacity,
        );
        config.long_chain_threshold = parse_env_var(
            &format!("{}MAP_LONG_CHAIN_THRESHOLD", prefix),
            config.long_chain_threshold,
        );
        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self { retain_vacated_digests: true, initial_chain_capacity: 4, long_chain_threshold: 16 }
    }

    fn memory_preset() -> Self {
        Self { retain_vacated_digests: false, initial_chain_capacity: 1, long_chain_threshold: 8 }
    }

    fn realtime_preset() -> Self {
        Self { retain_vacated_digests: true, initial_chain_capacity: 2, long_chain_threshold: 4 }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            ChainMapError::configuration(format!("Failed to serialize hash map config: {}", e))
        })?;
        std::fs::write(path, serialized).map_err(|e| {
            ChainMapError::configuration(format!("Failed to write hash map config file: {}", e))
        })?;
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChainMapError::configuration(format!("Failed to read hash map config file: {}", e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ChainMapError::configuration(format!("Failed to parse hash map config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}
