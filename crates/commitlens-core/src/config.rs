use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CommitlensError;

/// Top-level configuration loaded from `.commitlens.toml`.
///
/// Supports layered resolution: CLI flags > local config > defaults.
///
/// # Examples
///
/// ```
/// use commitlens_core::CommitlensConfig;
///
/// let config = CommitlensConfig::default();
/// assert_eq!(config.analysis.limit, 100);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitlensConfig {
    /// Analysis behavior settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl CommitlensConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CommitlensError::Io`] if the file cannot be read, or
    /// [`CommitlensError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use commitlens_core::CommitlensConfig;
    /// use std::path::Path;
    ///
    /// let config = CommitlensConfig::from_file(Path::new(".commitlens.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, CommitlensError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`CommitlensError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use commitlens_core::CommitlensConfig;
    ///
    /// let toml = r#"
    /// [analysis]
    /// limit = 50
    /// "#;
    /// let config = CommitlensConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.analysis.limit, 50);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, CommitlensError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Analysis behavior configuration.
///
/// # Examples
///
/// ```
/// use commitlens_core::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.limit, 100);
/// assert_eq!(config.max_parse_bytes, 524_288);
/// assert!(config.parallel);
/// assert!(config.branch.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum number of commits analyzed per run (default: 100).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Cap on source text fed to the structural parser, in bytes
    /// (default: 512 KiB). Larger snapshots degrade to a zero signal.
    #[serde(default = "default_max_parse_bytes")]
    pub max_parse_bytes: usize,
    /// Analyze commits across a worker pool (default: true).
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Branch to walk instead of HEAD.
    pub branch: Option<String>,
}

fn default_limit() -> usize {
    100
}

fn default_max_parse_bytes() -> usize {
    524_288
}

fn default_parallel() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            max_parse_bytes: default_max_parse_bytes(),
            parallel: default_parallel(),
            branch: None,
        }
    }
}
