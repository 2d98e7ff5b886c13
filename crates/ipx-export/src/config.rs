//! Configuration management

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::filter::{DetectionMethodStrategy, ExportStrategy, ScoreThresholdStrategy};
use crate::policy::ExportPolicy;

// ============================================================================
// Export Configuration Constants
// ============================================================================

/// Prefix of environment variables overriding the configuration
pub const ENV_PREFIX: &str = "IPX_";

/// Separator of nested keys in environment variables (`IPX_POLICY__MIN_SCORE`)
pub const ENV_NESTING_SEPARATOR: &str = "__";

/// Default DR output file name
pub const DEFAULT_DR_FILE: &str = "dr.txt";

/// Default CC output file name
pub const DEFAULT_CC_FILE: &str = "cc.tsv";

/// Default GO output file name
pub const DEFAULT_GO_FILE: &str = "go.tsv";

/// Selection strategy of an export run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// All-or-nothing per pair on the MI score
    Score,
    /// Per interaction on the curated detection-method status
    #[default]
    Method,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn ExportStrategy> {
        match self {
            StrategyKind::Score => Box::new(ScoreThresholdStrategy),
            StrategyKind::Method => Box::new(DetectionMethodStrategy),
        }
    }
}

/// Output file names, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dr_file: String,
    pub cc_file: String,
    pub go_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dr_file: DEFAULT_DR_FILE.to_string(),
            cc_file: DEFAULT_CC_FILE.to_string(),
            go_file: DEFAULT_GO_FILE.to_string(),
        }
    }
}

impl OutputConfig {
    pub fn dr_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.dr_file)
    }

    pub fn cc_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.cc_file)
    }

    pub fn go_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.go_file)
    }
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub policy: ExportPolicy,
    pub strategy: StrategyKind,
    /// Convert entries on the rayon pool
    pub parallel: bool,
    pub output: OutputConfig,
}

impl ExportConfig {
    /// Load configuration from defaults, an optional TOML file and `IPX_`
    /// environment variables, in increasing precedence
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut figment = Figment::from(Serialized::defaults(ExportConfig::default()));
        if let Some(path) = path {
            if !path.exists() {
                return Err(ExportError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split(ENV_NESTING_SEPARATOR));

        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: ExportConfig = figment.extract()?;
        config.validate()?;

        debug!(
            strategy = ?config.strategy,
            parallel = config.parallel,
            min_score = config.policy.min_score,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.policy.validate()?;

        for (name, file) in [
            ("dr_file", &self.output.dr_file),
            ("cc_file", &self.output.cc_file),
            ("go_file", &self.output.go_file),
        ] {
            if file.trim().is_empty() {
                return Err(ExportError::Config(format!("output.{} cannot be empty", name)));
            }
        }

        let files = [&self.output.dr_file, &self.output.cc_file, &self.output.go_file];
        if files[0] == files[1] || files[0] == files[2] || files[1] == files[2] {
            return Err(ExportError::Config(
                "output files must have distinct names".to_string(),
            ));
        }

        Ok(())
    }
}
