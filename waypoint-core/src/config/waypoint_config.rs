//! Top-level Waypoint configuration with 4-layer resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{HealingConfig, LlkbConfig, MappingConfig, RunnerConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`WAYPOINT_*`)
/// 3. Project config (`waypoint.toml` in project root)
/// 4. User config (`~/.waypoint/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WaypointConfig {
    pub mapping: MappingConfig,
    pub llkb: LlkbConfig,
    pub healing: HealingConfig,
    pub runner: RunnerConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub llkb_min_confidence: Option<f64>,
    pub healing_enabled: Option<bool>,
    pub max_attempts: Option<u32>,
    pub test_timeout_ms: Option<u64>,
}

impl WaypointConfig {
    /// Load configuration with 4-layer resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(_) => {
                        // Non-parse errors from user config are warnings, not fatal.
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("waypoint.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &WaypointConfig) -> Result<(), ConfigError> {
        if let Some(threshold) = config.mapping.llkb_min_confidence {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ValidationFailed {
                    field: "mapping.llkb_min_confidence".to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        if let Some(threshold) = config.llkb.prune_min_confidence {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ValidationFailed {
                    field: "llkb.prune_min_confidence".to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        if let Some(attempts) = config.healing.max_attempts {
            if attempts == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "healing.max_attempts".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(timeout) = config.healing.test_timeout_ms {
            if timeout == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "healing.test_timeout_ms".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.waypoint/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        home_dir().map(|h| h.join(".waypoint").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut WaypointConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: WaypointConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` (or non-empty) value.
    fn merge(base: &mut WaypointConfig, other: &WaypointConfig) {
        // Mapping
        if other.mapping.use_llkb.is_some() {
            base.mapping.use_llkb = other.mapping.use_llkb;
        }
        if other.mapping.llkb_min_confidence.is_some() {
            base.mapping.llkb_min_confidence = other.mapping.llkb_min_confidence;
        }
        if !other.mapping.locator_priority.is_empty() {
            base.mapping.locator_priority = other.mapping.locator_priority.clone();
        }
        if !other.mapping.forbidden_selectors.is_empty() {
            base.mapping.forbidden_selectors = other.mapping.forbidden_selectors.clone();
        }

        // LLKB
        if other.llkb.store_root.is_some() {
            base.llkb.store_root = other.llkb.store_root.clone();
        }
        if other.llkb.prune_min_confidence.is_some() {
            base.llkb.prune_min_confidence = other.llkb.prune_min_confidence;
        }
        if other.llkb.prune_min_applications.is_some() {
            base.llkb.prune_min_applications = other.llkb.prune_min_applications;
        }
        if other.llkb.publish_threshold.is_some() {
            base.llkb.publish_threshold = other.llkb.publish_threshold;
        }
        if other.llkb.export_size.is_some() {
            base.llkb.export_size = other.llkb.export_size;
        }

        // Healing
        if other.healing.enabled.is_some() {
            base.healing.enabled = other.healing.enabled;
        }
        if other.healing.max_attempts.is_some() {
            base.healing.max_attempts = other.healing.max_attempts;
        }
        if !other.healing.allowed_fixes.is_empty() {
            base.healing.allowed_fixes = other.healing.allowed_fixes.clone();
        }
        if other.healing.test_timeout_ms.is_some() {
            base.healing.test_timeout_ms = other.healing.test_timeout_ms;
        }
        if other.healing.run_timeout_scale.is_some() {
            base.healing.run_timeout_scale = other.healing.run_timeout_scale;
        }
        if other.healing.log_root.is_some() {
            base.healing.log_root = other.healing.log_root.clone();
        }

        // Runner
        if !other.runner.command.is_empty() {
            base.runner.command = other.runner.command.clone();
        }
        if other.runner.workers.is_some() {
            base.runner.workers = other.runner.workers;
        }
        if other.runner.retries.is_some() {
            base.runner.retries = other.runner.retries;
        }
        if other.runner.reporter.is_some() {
            base.runner.reporter = other.runner.reporter.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `WAYPOINT_LLKB_MIN_CONFIDENCE`, `WAYPOINT_HEALING_MAX_ATTEMPTS`, etc.
    fn apply_env_overrides(config: &mut WaypointConfig) {
        if let Ok(val) = std::env::var("WAYPOINT_LLKB_MIN_CONFIDENCE") {
            if let Ok(v) = val.parse::<f64>() {
                config.mapping.llkb_min_confidence = Some(v);
            }
        }
        if let Ok(val) = std::env::var("WAYPOINT_MAPPING_USE_LLKB") {
            if let Ok(v) = val.parse::<bool>() {
                config.mapping.use_llkb = Some(v);
            }
        }
        if let Ok(val) = std::env::var("WAYPOINT_HEALING_ENABLED") {
            if let Ok(v) = val.parse::<bool>() {
                config.healing.enabled = Some(v);
            }
        }
        if let Ok(val) = std::env::var("WAYPOINT_HEALING_MAX_ATTEMPTS") {
            if let Ok(v) = val.parse::<u32>() {
                config.healing.max_attempts = Some(v);
            }
        }
        if let Ok(val) = std::env::var("WAYPOINT_TEST_TIMEOUT_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.healing.test_timeout_ms = Some(v);
            }
        }
        if let Ok(val) = std::env::var("WAYPOINT_LLKB_STORE_ROOT") {
            config.llkb.store_root = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut WaypointConfig, cli: &CliOverrides) {
        if let Some(v) = cli.llkb_min_confidence {
            config.mapping.llkb_min_confidence = Some(v);
        }
        if let Some(v) = cli.healing_enabled {
            config.healing.enabled = Some(v);
        }
        if let Some(v) = cli.max_attempts {
            config.healing.max_attempts = Some(v);
        }
        if let Some(v) = cli.test_timeout_ms {
            config.healing.test_timeout_ms = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
