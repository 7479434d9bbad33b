use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use vibeos::CrashLoopConfig;
use vibeos::domain::is_valid_stagnation_threshold;
use vibeos::llm::{AnthropicClient, AnthropicConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub llm: LlmConfig,
    pub reconcile: ReconcileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            timeout_ms: 60000,
        }
    }
}

impl LlmConfig {
    pub fn to_anthropic(&self) -> AnthropicConfig {
        AnthropicConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    /// Anthropic client for these settings, keyed from the environment
    pub fn build_client(&self) -> vibeos::Result<AnthropicClient> {
        Ok(AnthropicClient::new(self.to_anthropic())?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub max_total_loops: u32,
    pub max_stagnation_count: usize,
    pub stagnation_threshold: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        let defaults = CrashLoopConfig::default();
        Self {
            max_total_loops: defaults.max_total_loops,
            max_stagnation_count: defaults.max_stagnation_count,
            stagnation_threshold: defaults.stagnation_threshold,
        }
    }
}

impl ReconcileConfig {
    fn validate(&self) -> Result<()> {
        if !is_valid_stagnation_threshold(self.stagnation_threshold) {
            return Err(eyre!(
                "reconcile.stagnation_threshold must be between 0.0 and 1.0, got {}",
                self.stagnation_threshold
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn to_crash_loop_config(
        &self,
        max_loops: Option<u32>,
        max_stagnation: Option<usize>,
        threshold: Option<f64>,
    ) -> CrashLoopConfig {
        CrashLoopConfig {
            max_total_loops: max_loops.unwrap_or(self.max_total_loops),
            max_stagnation_count: max_stagnation.unwrap_or(self.max_stagnation_count),
            stagnation_threshold: threshold.unwrap_or(self.stagnation_threshold),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            llm: LlmConfig::default(),
            reconcile: ReconcileConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.reconcile.validate().context("Invalid config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.reconcile.max_total_loops, 10);
        assert_eq!(config.reconcile.max_stagnation_count, 5);
    }

    #[test]
    fn test_load_explicit_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vibeos.yml");
        fs::write(&path, "reconcile:\n  max_total_loops: 3\nllm:\n  model: claude-3-haiku-20240307\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.reconcile.max_total_loops, 3);
        assert_eq!(config.reconcile.max_stagnation_count, 5);
        assert_eq!(config.llm.model, "claude-3-haiku-20240307");
        assert_eq!(config.llm.timeout_ms, 60000);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/vibeos.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_rejects_out_of_range_threshold() {
        let temp_dir = TempDir::new().unwrap();
        for bad in ["1.5", "-0.2", ".nan"] {
            let path = temp_dir.path().join("vibeos.yml");
            fs::write(&path, format!("reconcile:\n  stagnation_threshold: {}\n", bad)).unwrap();
            assert!(Config::load(Some(&path)).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_cli_overrides_win() {
        let reconcile = ReconcileConfig::default();
        let crash = reconcile.to_crash_loop_config(Some(4), None, Some(0.25));
        assert_eq!(crash.max_total_loops, 4);
        assert_eq!(crash.max_stagnation_count, 5);
        assert!((crash.stagnation_threshold - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_client_reports_missing_key_as_llm_error() {
        if std::env::var(vibeos::llm::anthropic::API_KEY_ENV).is_ok() {
            return;
        }
        let err = LlmConfig::default().build_client().unwrap_err();
        assert!(matches!(
            err,
            vibeos::VibeError::Llm(vibeos::llm::LlmError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn test_llm_config_to_anthropic() {
        let anthropic = LlmConfig::default().to_anthropic();
        assert_eq!(anthropic.timeout, Duration::from_secs(60));
        assert_eq!(anthropic.max_tokens, 4096);
    }
}
