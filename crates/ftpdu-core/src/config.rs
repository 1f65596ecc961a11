//! Scan configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for scanning a remote tree.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Remote path to scan (empty = the login directory).
    #[builder(default)]
    #[serde(default)]
    pub root: String,

    /// Display name of the root folder.
    #[builder(default = "default_root_name()")]
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Ignore `.` and `..` in listings.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub skip_dot_entries: bool,
}

fn default_true() -> bool {
    true
}

fn default_root_name() -> String {
    "root".to_string()
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref name) = self.root_name {
            if name.is_empty() {
                return Err("Root name cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a remote path.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            root_name: default_root_name(),
            skip_dot_entries: true,
        }
    }

    /// Check if a listed name should be left out of the tree.
    pub fn should_skip(&self, name: &str) -> bool {
        name.is_empty() || (self.skip_dot_entries && crate::path::is_dot_entry(name))
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .root("/pub")
            .root_name("ftp.example.org")
            .build()
            .unwrap();

        assert_eq!(config.root, "/pub");
        assert_eq!(config.root_name, "ftp.example.org");
        assert!(config.skip_dot_entries);
    }

    #[test]
    fn test_config_builder_rejects_empty_name() {
        let result = ScanConfig::builder().root_name("").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_default() {
        let config = ScanConfig::default();
        assert!(config.root.is_empty());
        assert_eq!(config.root_name, "root");
    }

    #[test]
    fn test_should_skip() {
        let mut config = ScanConfig::default();
        assert!(config.should_skip("."));
        assert!(config.should_skip(".."));
        assert!(config.should_skip(""));
        assert!(!config.should_skip(".profile"));

        config.skip_dot_entries = false;
        assert!(!config.should_skip(".."));
    }
}
