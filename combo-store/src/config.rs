//! TOML device configuration
//!
//! ```toml
//! sleep_timeout_s = 45
//!
//! [[counters]]
//! label = "Pushups"
//! preset = "reps"
//! max_multiplier = 3.0
//!
//! [[counters]]
//! preset = "hydration"
//! ```
//!
//! Every key is optional; an empty file gives an empty device with the
//! default sleep timeout.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use combo_core::config::DeviceConfig;

use crate::error::{Result, StoreError};

/// Parse and validate a TOML configuration
pub fn parse_config(text: &str) -> Result<DeviceConfig> {
    let config: DeviceConfig = toml::from_str(text)?;
    config.validate()?;
    debug!(
        "Parsed config: {} counters, sleep after {}s",
        config.counters.len(),
        config.sleep_timeout_s
    );
    Ok(config)
}

/// Load a TOML configuration file
pub fn load_config_file(path: impl AsRef<Path>) -> Result<DeviceConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
        _ => StoreError::Io(e),
    })?;
    let config = parse_config(&text)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Load a TOML configuration file, falling back to the defaults
pub fn load_config_or_default(path: impl AsRef<Path>) -> DeviceConfig {
    let path = path.as_ref();
    match load_config_file(path) {
        Ok(config) => config,
        Err(StoreError::NotFound(_)) => {
            debug!("No config at {}, using defaults", path.display());
            DeviceConfig::default()
        }
        Err(e) => {
            warn!("Failed to load {}: {}, using defaults", path.display(), e);
            DeviceConfig::default()
        }
    }
}

/// Render a configuration as TOML
pub fn to_toml(config: &DeviceConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use combo_core::config::{ConfigError, Preset, DEFAULT_SLEEP_TIMEOUT_S};
    use combo_core::CounterType;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full() {
        let config = parse_config(
            r#"
            sleep_timeout_s = 45

            [[counters]]
            label = "Pushups"
            preset = "reps"
            max_multiplier = 3.0

            [[counters]]
            preset = "hydration"
            "#,
        )
        .unwrap();

        assert_eq!(config.sleep_timeout_ms(), 45_000);
        assert_eq!(config.counters.len(), 2);

        let device = config.build_device();
        let pushups = device.counter(0).unwrap();
        assert_eq!(pushups.label.as_str(), "Pushups");
        assert_eq!(pushups.counter_type, CounterType::Combo);
        assert_eq!(pushups.max_multiplier, 3.0);

        let water = device.counter(1).unwrap();
        assert_eq!(water.counter_type, CounterType::Accumulator);
        assert_eq!(water.label.as_str(), Preset::Hydration.default_label());
    }

    #[test]
    fn test_parse_empty() {
        let config = parse_config("").unwrap();
        assert!(config.counters.is_empty());
        assert_eq!(config.sleep_timeout_s, DEFAULT_SLEEP_TIMEOUT_S);
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        let err = parse_config("sleep_timeout_s = 0").unwrap_err();
        assert!(matches!(err, StoreError::Config(ConfigError::InvalidSleepTimeout)));

        let err = parse_config("[[counters]]\npreset = \"juggling\"").unwrap_err();
        assert!(matches!(err, StoreError::Toml(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = DeviceConfig::default();
        let text = to_toml(&config).unwrap();
        assert_eq!(parse_config(&text).unwrap(), config);
    }

    #[test]
    fn test_file_fallback() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("combo.toml");
        assert_eq!(load_config_or_default(&path), DeviceConfig::default());

        fs::write(&path, "sleep_timeout_s = 120").unwrap();
        assert_eq!(load_config_file(&path).unwrap().sleep_timeout_s, 120);

        fs::write(&path, "sleep_timeout_s = \"soon\"").unwrap();
        assert_eq!(load_config_or_default(&path), DeviceConfig::default());
    }
}
