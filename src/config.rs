//! Tool configuration module.
//!
//! Handles loading and validating `color-key.toml`. Config files are
//! sparse — override just the values you want; everything else falls back
//! to the stock defaults shown below. Unknown keys are rejected to catch
//! typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [keying]
//! alpha_key = [0.0, 1.0, 1.0, 1.0]    # pixels near this color become transparent
//! alpha_tolerance = 0.1                # match radius, 0..1 channel space
//! shadow_key = [1.0, 0.0, 1.0, 1.0]   # pixels near this color become shadow
//! shadow_tolerance = 0.1
//! shadow_color = [0.0, 0.0, 0.0, 0.5] # flat fill written for shadow pixels
//!
//! [output]
//! format = "png"          # png | tga
//! generate_mips = false   # write name.mipN.ext sidecar levels
//! make_readable = false   # force the read-only flag off on outputs
//!
//! [processing]
//! max_workers = 4         # omit for auto = CPU cores
//! ```
//!
//! Tolerances are compared against 8-bit decoded channels, so values
//! below ~0.004 (1/255) are indistinguishable from zero in practice.

use crate::codec::OutputFormat;
use crate::keying::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config filename probed inside the source directory.
pub const CONFIG_FILE_NAME: &str = "color-key.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full tool configuration, constructed once per batch run and read-only
/// during processing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyConfig {
    /// Key colors and tolerances.
    pub keying: KeySettings,
    /// Output container and reconciliation flags.
    pub output: OutputSettings,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl KeyConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: KeyConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective config: an explicit path wins, otherwise
    /// `<source>/color-key.toml` when present, otherwise stock defaults.
    pub fn resolve(explicit: Option<&Path>, source: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let probe = source.join(CONFIG_FILE_NAME);
                if probe.exists() {
                    Self::load(&probe)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let k = &self.keying;
        for (name, value) in [
            ("keying.alpha_tolerance", k.alpha_tolerance),
            ("keying.shadow_tolerance", k.shadow_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a finite value >= 0"
                )));
            }
        }
        for (name, color) in [
            ("keying.alpha_key", k.alpha_key),
            ("keying.shadow_key", k.shadow_key),
            ("keying.shadow_color", k.shadow_color),
        ] {
            let channels: [f32; 4] = color.into();
            if channels.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(ConfigError::Validation(format!(
                    "{name} channels must be within 0..1"
                )));
            }
        }
        Ok(())
    }
}

/// Key colors and tolerances driving per-pixel classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeySettings {
    /// Pixels within `alpha_tolerance` of this color become transparent.
    pub alpha_key: Color,
    pub alpha_tolerance: f32,
    /// Pixels within `shadow_tolerance` of this color become shadow.
    pub shadow_key: Color,
    pub shadow_tolerance: f32,
    /// The flat fill written for shadow pixels (all four channels).
    pub shadow_color: Color,
}

impl Default for KeySettings {
    fn default() -> Self {
        // Cyan/magenta are the original tool's stock keys.
        Self {
            alpha_key: Color::new(0.0, 1.0, 1.0, 1.0),
            alpha_tolerance: 0.1,
            shadow_key: Color::new(1.0, 0.0, 1.0, 1.0),
            shadow_tolerance: 0.1,
            shadow_color: Color::new(0.0, 0.0, 0.0, 0.5),
        }
    }
}

/// Output container and on-disk reconciliation flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Container written for every output (and conversion target for BMP).
    pub format: OutputFormat,
    /// Write box-filtered `name.mipN.ext` sidecar levels next to outputs.
    pub generate_mips: bool,
    /// Leave outputs writable even when the source was read-only.
    pub make_readable: bool,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel batch workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_workers: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_workers.map(|n| n.min(cores)).unwrap_or(cores)
}

/// The stock config file printed by `color-key gen-config`.
pub fn stock_config_toml() -> &'static str {
    r#"# color-key configuration
# All options are optional - defaults shown below.

[keying]
# Pixels within alpha_tolerance of alpha_key become transparent.
# Colors are [r, g, b, a] with channels in 0..1.
alpha_key = [0.0, 1.0, 1.0, 1.0]
alpha_tolerance = 0.1

# Pixels within shadow_tolerance of shadow_key (or of shadow_color
# itself, alpha included) are rewritten to the flat shadow_color fill.
shadow_key = [1.0, 0.0, 1.0, 1.0]
shadow_tolerance = 0.1
shadow_color = [0.0, 0.0, 0.0, 0.5]

[output]
# Container for every output; BMP sources are converted to this format.
format = "png"          # png | tga

# Write box-filtered mip levels as name.mip1.ext, name.mip2.ext, ...
generate_mips = false

# Leave outputs writable even when the source was read-only.
make_readable = false

[processing]
# Max parallel workers, clamped to CPU cores. Omit for auto.
# max_workers = 4
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_tool() {
        let config = KeyConfig::default();
        let alpha: [f32; 4] = config.keying.alpha_key.into();
        let shadow: [f32; 4] = config.keying.shadow_key.into();
        assert_eq!(alpha, [0.0, 1.0, 1.0, 1.0]);
        assert_eq!(shadow, [1.0, 0.0, 1.0, 1.0]);
        assert_eq!(config.keying.alpha_tolerance, 0.1);
        assert_eq!(config.output.format, OutputFormat::Png);
        assert!(!config.output.generate_mips);
        assert!(!config.output.make_readable);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: KeyConfig = toml::from_str(
            r#"
            [keying]
            alpha_tolerance = 0.25

            [output]
            format = "tga"
            "#,
        )
        .unwrap();
        assert_eq!(config.keying.alpha_tolerance, 0.25);
        assert_eq!(config.output.format, OutputFormat::Tga);
        // Untouched sections fall back to stock values.
        assert_eq!(config.keying.shadow_tolerance, 0.1);
        assert!(!config.output.generate_mips);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<KeyConfig, _> = toml::from_str(
            r#"
            [keying]
            alpha_tollerance = 0.2
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn negative_tolerance_fails_validation() {
        let config = KeyConfig {
            keying: KeySettings {
                alpha_tolerance: -0.1,
                ..KeySettings::default()
            },
            ..KeyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("alpha_tolerance")
        ));
    }

    #[test]
    fn out_of_range_key_channel_fails_validation() {
        let config = KeyConfig {
            keying: KeySettings {
                shadow_color: Color::new(0.0, 0.0, 0.0, 1.5),
                ..KeySettings::default()
            },
            ..KeyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("shadow_color")
        ));
    }

    #[test]
    fn stock_config_parses_and_validates() {
        let config: KeyConfig = toml::from_str(stock_config_toml()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.output.format, OutputFormat::Png);
    }

    #[test]
    fn resolve_prefers_explicit_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.toml");
        std::fs::write(&explicit, "[output]\nformat = \"tga\"\n").unwrap();

        let config = KeyConfig::resolve(Some(&explicit), tmp.path()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Tga);
    }

    #[test]
    fn resolve_probes_source_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[keying]\nalpha_tolerance = 0.3\n",
        )
        .unwrap();

        let config = KeyConfig::resolve(None, tmp.path()).unwrap();
        assert_eq!(config.keying.alpha_tolerance, 0.3);
    }

    #[test]
    fn resolve_falls_back_to_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = KeyConfig::resolve(None, tmp.path()).unwrap();
        assert_eq!(config.keying.alpha_tolerance, 0.1);
    }

    #[test]
    fn effective_threads_clamps_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_workers: Some(10_000),
        };
        assert_eq!(effective_threads(&config), cores);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
        assert_eq!(
            effective_threads(&ProcessingConfig {
                max_workers: Some(1)
            }),
            1
        );
    }
}
