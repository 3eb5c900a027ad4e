//! Extraction configuration
//!
//! The only knob is the row limit, shared by both output modes and both
//! source kinds. It can be set in code, read from the process environment,
//! or read from a dotenv file without touching the environment.

use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the row limit
pub const ROW_LIMIT_VAR: &str = "TABULAR_ROW_LIMIT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Maximum data rows to read per table or record sequence; 0 is unbounded
    #[serde(default)]
    pub limit: usize,
}

impl ExtractConfig {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_bounded(&self) -> bool {
        self.limit > 0
    }

    /// Read `TABULAR_ROW_LIMIT` from the process environment
    ///
    /// An unset or empty variable means unbounded.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read `TABULAR_ROW_LIMIT` from a dotenv file
    ///
    /// The file is parsed with `dotenvy` but nothing is exported into the
    /// process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let entries = dotenvy::from_path_iter(path).map_err(|e| {
            IngestError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        let mut found = None;
        for entry in entries {
            let (key, value) = entry.map_err(|e| {
                IngestError::Config(format!("Failed to parse env file {}: {}", path.display(), e))
            })?;
            if key == ROW_LIMIT_VAR {
                found = Some(value);
            }
        }

        log::debug!("Loaded extraction config from {}", path.display());
        Self::from_lookup(|_| found.clone())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let Some(raw) = lookup(ROW_LIMIT_VAR) else {
            return Ok(Self::default());
        };

        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }

        let limit = raw.parse::<usize>().map_err(|_| {
            IngestError::Config(format!(
                "{} must be a non-negative integer, got '{}'",
                ROW_LIMIT_VAR, raw
            ))
        })?;
        Ok(Self { limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_unbounded() {
        let config = ExtractConfig::default();
        assert_eq!(config.limit, 0);
        assert!(!config.is_bounded());
        assert!(ExtractConfig::new(5).is_bounded());
    }

    #[test]
    fn test_lookup_parses_limit() {
        let config = ExtractConfig::from_lookup(|_| Some(" 250 ".to_string())).unwrap();
        assert_eq!(config, ExtractConfig::new(250));
    }

    #[test]
    fn test_lookup_missing_or_empty() {
        assert_eq!(ExtractConfig::from_lookup(|_| None).unwrap(), ExtractConfig::default());
        assert_eq!(
            ExtractConfig::from_lookup(|_| Some(String::new())).unwrap(),
            ExtractConfig::default()
        );
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = ExtractConfig::from_lookup(|_| Some("-3".to_string())).unwrap_err();
        assert!(matches!(err, IngestError::Config(_)));
    }

    #[test]
    fn test_from_env_without_variable() {
        if std::env::var_os(ROW_LIMIT_VAR).is_none() {
            assert_eq!(ExtractConfig::from_env().unwrap(), ExtractConfig::default());
        }
    }

    #[test]
    fn test_env_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "# extraction settings\nOTHER=1\nTABULAR_ROW_LIMIT=10").unwrap();

        let config = ExtractConfig::from_env_file(temp_file.path()).unwrap();
        assert_eq!(config.limit, 10);
    }

    #[test]
    fn test_env_file_without_key() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "OTHER=1").unwrap();

        let config = ExtractConfig::from_env_file(temp_file.path()).unwrap();
        assert_eq!(config, ExtractConfig::default());
    }

    #[test]
    fn test_missing_env_file() {
        let err = ExtractConfig::from_env_file("/definitely/not/here/.env").unwrap_err();
        assert!(matches!(err, IngestError::Config(_)));
    }

    #[test]
    fn test_deserialize_with_default() {
        let config: ExtractConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.limit, 0);
        let config: ExtractConfig = serde_json::from_str(r#"{"limit": 3}"#).unwrap();
        assert_eq!(config.limit, 3);
    }
}
