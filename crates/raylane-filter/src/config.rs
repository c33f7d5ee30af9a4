//! Filter configuration.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// Settings that shape how filters are invoked.
///
/// Loaded from TOML; every key is optional.
///
/// ```toml
/// verify_lane_isolation = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Snapshot packets around each callback and log lanes outside the
    /// validity mask that the callback modified. Costs two packet copies per
    /// invocation; defaults to on in debug builds only.
    pub verify_lane_isolation: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            verify_lane_isolation: cfg!(debug_assertions),
        }
    }
}

impl FilterConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        debug!("filter config: {config:?}");
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FilterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FilterConfig::from_toml_str("").unwrap();
        assert_eq!(config, FilterConfig::default());
        assert_eq!(config.verify_lane_isolation, cfg!(debug_assertions));
    }

    #[test]
    fn test_explicit_setting() {
        let config = FilterConfig::from_toml_str("verify_lane_isolation = false").unwrap();
        assert!(!config.verify_lane_isolation);
        let config = FilterConfig::from_toml_str("verify_lane_isolation = true").unwrap();
        assert!(config.verify_lane_isolation);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = FilterConfig::from_toml_str("verify_lanes = true").unwrap_err();
        assert!(matches!(err, FilterError::Parse(_)));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = FilterConfig::from_toml_str("verify_lane_isolation = 3").unwrap_err();
        assert!(err.to_string().starts_with("invalid filter config"));
    }

    #[test]
    fn test_missing_file() {
        let err = FilterConfig::load("/nonexistent/raylane/filter.toml").unwrap_err();
        match err {
            FilterError::Io { path, .. } => {
                assert!(path.ends_with("filter.toml"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("raylane-filter-{}.toml", std::process::id()));
        std::fs::write(&path, "verify_lane_isolation = true\n").unwrap();
        let config = FilterConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(config.verify_lane_isolation);
    }
}
