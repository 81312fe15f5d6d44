//! Configuration types for batch-dl

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Download behavior configuration
///
/// Constructed once before a batch and never mutated while it runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Chunk size handed to the transfer engine, in bytes (default: 512 KiB)
    #[serde(default = "default_part_size")]
    pub part_size: usize,

    /// Maximum threads a single item may use (default: 4)
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Maximum items downloading at the same time (default: 2)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            part_size: default_part_size(),
            threads: default_threads(),
            limit: default_limit(),
        }
    }
}

impl DownloadConfig {
    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        self.validate_transfer()?;
        validate_limit(self.limit)
    }

    /// Check the per-item settings only, for callers that pass their own limit.
    pub(crate) fn validate_transfer(&self) -> Result<()> {
        if self.part_size == 0 {
            return Err(Error::config("part_size", "part size must be greater than 0"));
        }
        if self.threads == 0 {
            return Err(Error::config("threads", "threads must be at least 1"));
        }
        Ok(())
    }
}

pub(crate) fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(Error::config("limit", "concurrency limit must be at least 1"));
    }
    Ok(())
}

fn default_part_size() -> usize {
    512 * 1024
}

fn default_threads() -> usize {
    4
}

fn default_limit() -> usize {
    2
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DownloadConfig::default();
        assert_eq!(config.part_size, 512 * 1024);
        assert_eq!(config.threads, 4);
        assert_eq!(config.limit, 2);
        config.validate().unwrap();
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: DownloadConfig = serde_json::from_str(r#"{"threads": 8}"#).unwrap();
        assert_eq!(config.threads, 8);
        assert_eq!(config.part_size, 512 * 1024);
        assert_eq!(config.limit, 2);
    }

    #[test]
    fn zero_part_size_is_rejected() {
        let config = DownloadConfig {
            part_size: 0,
            ..Default::default()
        };
        match config.validate() {
            Err(Error::Config { key, .. }) => assert_eq!(key.as_deref(), Some("part_size")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn zero_threads_is_rejected() {
        let config = DownloadConfig {
            threads: 0,
            ..Default::default()
        };
        match config.validate() {
            Err(Error::Config { key, .. }) => assert_eq!(key.as_deref(), Some("threads")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn zero_limit_is_rejected() {
        let config = DownloadConfig {
            limit: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
        config.validate_transfer().unwrap();
    }
}
