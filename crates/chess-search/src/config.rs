//! Search configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a search configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Weights of the static evaluation terms, in centipawns.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Bonus for the side to move. Defaults to 15.
    #[serde(default = "default_tempo")]
    pub tempo: i32,
    /// Centipawns per pseudo-legal move of difference. Defaults to 1.
    #[serde(default = "default_mobility_weight")]
    pub mobility_weight: i32,
}

fn default_tempo() -> i32 {
    15
}

fn default_mobility_weight() -> i32 {
    1
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            tempo: default_tempo(),
            mobility_weight: default_mobility_weight(),
        }
    }
}

/// Search settings.
///
/// Every field has a default, so an empty file (or no file at all) yields
/// a usable configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies to search. Defaults to 4.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Whether to reuse results of transposed positions. Defaults to true.
    #[serde(default = "default_true")]
    pub transposition_cache: bool,
    /// Entries kept before the cache is cleared. Defaults to 2^20.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Nodes between progress reports. Defaults to 4096.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
    /// Search depth 1, 2, ... up to `depth` instead of `depth` directly.
    /// Defaults to true.
    #[serde(default = "default_true")]
    pub iterative: bool,
    #[serde(default)]
    pub eval: EvalConfig,
}

fn default_depth() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    1 << 20
}

fn default_progress_interval() -> u64 {
    4096
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: default_depth(),
            transposition_cache: true,
            cache_capacity: default_cache_capacity(),
            progress_interval: default_progress_interval(),
            iterative: true,
            eval: EvalConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Loads a configuration from `path`.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns a copy searching to `depth` plies.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: SearchConfig = toml::from_str("").unwrap();
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.depth, 4);
        assert_eq!(config.cache_capacity, 1 << 20);
        assert_eq!(config.eval.tempo, 15);
    }

    #[test]
    fn test_partial_eval_table() {
        let toml_str = r#"
depth = 6
iterative = false

[eval]
mobility_weight = 3
"#;
        let config: SearchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.depth, 6);
        assert!(!config.iterative);
        assert!(config.transposition_cache);
        assert_eq!(config.eval.mobility_weight, 3);
        assert_eq!(config.eval.tempo, 15);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = SearchConfig::load(dir.path().join("search.toml")).unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "depth = 2\ntransposition_cache = false").unwrap();
        let config = SearchConfig::load(file.path()).unwrap();
        assert_eq!(config.depth, 2);
        assert!(!config.transposition_cache);
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "depth = \"deep\"").unwrap();
        assert!(matches!(
            SearchConfig::load(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_nested_table() {
        let config = SearchConfig::default().with_depth(3);
        let json = serde_json::to_string(&config).unwrap();
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
