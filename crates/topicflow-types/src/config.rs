//! Configuration loading for the TopicFlow builder.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/topicflow/config.toml.

use config::{Config, Environment, File};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::TopicFlowError;

/// How similarity-graph nodes get their sizing value.
///
/// The topic model carries no per-topic prevalence that the renderer could
/// use, so the value is a policy rather than a derived quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NodeValue {
    /// Every node gets the same value.
    Fixed { value: u32 },
    /// Values drawn uniformly from 1..100 with a seeded generator.
    Random { seed: u64 },
}

impl Default for NodeValue {
    fn default() -> Self {
        NodeValue::Random {
            seed: default_node_seed(),
        }
    }
}

fn default_node_seed() -> u64 {
    0
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// TopicFlow front-end root (contains `data/`, `index.html`, `scripts/`)
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// File name prefix of the per-month metadata tables
    #[serde(default = "default_metadata_prefix")]
    pub metadata_prefix: String,

    /// Corpus year; detected from the document file names when unset
    #[serde(default)]
    pub year: Option<i32>,

    /// Decimal places kept for every serialized weight
    #[serde(default = "default_weight_precision")]
    pub weight_precision: u32,

    /// Multiplier applied to similarity scores to get link widths
    #[serde(default = "default_similarity_scale")]
    pub similarity_scale: f64,

    /// Number of words kept per topic
    #[serde(default = "default_top_words")]
    pub top_words: usize,

    /// Node sizing policy for the similarity graph
    #[serde(default)]
    pub node_value: NodeValue,
}

fn default_frontend_dir() -> String {
    ".".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metadata_prefix() -> String {
    "Full_Disclosure_Mailing_List_".to_string()
}

fn default_weight_precision() -> u32 {
    17
}

fn default_similarity_scale() -> f64 {
    200.0
}

fn default_top_words() -> usize {
    10
}

/// Upper bound for `weight_precision`; an f64 carries no more decimal digits.
pub const MAX_WEIGHT_PRECISION: u32 = 17;

impl Default for Settings {
    fn default() -> Self {
        Self {
            frontend_dir: default_frontend_dir(),
            log_level: default_log_level(),
            metadata_prefix: default_metadata_prefix(),
            year: None,
            weight_precision: default_weight_precision(),
            similarity_scale: default_similarity_scale(),
            top_words: default_top_words(),
            node_value: NodeValue::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/topicflow/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (TOPICFLOW_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, TopicFlowError> {
        let config_dir = ProjectDirs::from("", "", "topicflow")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        Self::load_layers(&config_dir.join("config"), cli_config_path, "TOPICFLOW")
    }

    fn load_layers(
        default_config_path: &Path,
        cli_config_path: Option<&str>,
        env_prefix: &str,
    ) -> Result<Self, TopicFlowError> {
        let mut builder = Config::builder()
            .set_default("frontend_dir", default_frontend_dir())
            .map_err(|e| TopicFlowError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| TopicFlowError::Config(e.to_string()))?
            .set_default("metadata_prefix", default_metadata_prefix())
            .map_err(|e| TopicFlowError::Config(e.to_string()))?
            .set_default("weight_precision", default_weight_precision() as i64)
            .map_err(|e| TopicFlowError::Config(e.to_string()))?
            .set_default("similarity_scale", default_similarity_scale())
            .map_err(|e| TopicFlowError::Config(e.to_string()))?
            .set_default("top_words", default_top_words() as i64)
            .map_err(|e| TopicFlowError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: TOPICFLOW_FRONTEND_DIR, TOPICFLOW_WEIGHT_PRECISION, ...
        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| TopicFlowError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| TopicFlowError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), TopicFlowError> {
        if self.weight_precision > MAX_WEIGHT_PRECISION {
            return Err(TopicFlowError::Config(format!(
                "weight_precision must be 0-{}, got {}",
                MAX_WEIGHT_PRECISION, self.weight_precision
            )));
        }
        if !self.similarity_scale.is_finite() || self.similarity_scale <= 0.0 {
            return Err(TopicFlowError::Config(format!(
                "similarity_scale must be a positive number, got {}",
                self.similarity_scale
            )));
        }
        if self.top_words == 0 {
            return Err(TopicFlowError::Config("top_words must be > 0".to_string()));
        }
        if let Some(year) = self.year {
            if !(1000..=9999).contains(&year) {
                return Err(TopicFlowError::Config(format!(
                    "year must have four digits, got {year}"
                )));
            }
        }
        Ok(())
    }

    /// Expand ~ in frontend_dir to the home directory
    pub fn expanded_frontend_dir(&self) -> PathBuf {
        if let Some(rest) = self.frontend_dir.strip_prefix("~/") {
            if let Some(dirs) = BaseDirs::new() {
                return dirs.home_dir().join(rest);
            }
        }
        PathBuf::from(&self.frontend_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.weight_precision, 17);
        assert_eq!(settings.top_words, 10);
        assert!((settings.similarity_scale - 200.0).abs() < f64::EPSILON);
        assert_eq!(settings.metadata_prefix, "Full_Disclosure_Mailing_List_");
        assert!(settings.year.is_none());
        assert!(settings.validate().is_ok());
    }

    const TEST_ENV_PREFIX: &str = "TOPICFLOW_SETTINGS_TEST";

    #[test]
    fn test_load_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings =
            Settings::load_layers(&dir.path().join("config"), None, TEST_ENV_PREFIX).unwrap();
        assert_eq!(settings.top_words, 10);
        assert_eq!(settings.weight_precision, 17);
        assert_eq!(settings.frontend_dir, ".");
        assert_eq!(settings.node_value, NodeValue::Random { seed: 0 });
    }

    #[test]
    fn test_user_config_file_is_layered_under_cli_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "top_words = 5\nyear = 2006\n").unwrap();
        let cli_path = dir.path().join("cli.toml");
        std::fs::write(&cli_path, "year = 2009\n").unwrap();

        let settings = Settings::load_layers(
            &dir.path().join("config"),
            Some(cli_path.to_str().unwrap()),
            TEST_ENV_PREFIX,
        )
        .unwrap();
        assert_eq!(settings.top_words, 5);
        assert_eq!(settings.year, Some(2009));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topicflow.toml");
        std::fs::write(
            &path,
            "weight_precision = 6\nyear = 2008\n\n[node_value]\nmode = \"fixed\"\nvalue = 25\n",
        )
        .unwrap();

        let settings = Settings::load_layers(
            &dir.path().join("config"),
            Some(path.to_str().unwrap()),
            TEST_ENV_PREFIX,
        )
        .unwrap();
        assert_eq!(settings.weight_precision, 6);
        assert_eq!(settings.year, Some(2008));
        assert_eq!(settings.node_value, NodeValue::Fixed { value: 25 });
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        settings.weight_precision = 18;
        assert!(settings.validate().is_err());

        settings = Settings::default();
        settings.similarity_scale = 0.0;
        assert!(settings.validate().is_err());

        settings = Settings::default();
        settings.top_words = 0;
        assert!(settings.validate().is_err());

        settings = Settings::default();
        settings.year = Some(7);
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, TopicFlowError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_node_value_default_is_seeded_random() {
        assert_eq!(NodeValue::default(), NodeValue::Random { seed: 0 });
    }

    #[test]
    fn test_expanded_frontend_dir_plain() {
        let settings = Settings {
            frontend_dir: "/srv/topicflow".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.expanded_frontend_dir(), PathBuf::from("/srv/topicflow"));
    }
}
