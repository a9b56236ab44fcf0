use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::path::{Path, PathBuf};

use crate::domain::csv::MapperConfig;
use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "epu-csv.toml";
pub const ENV_PREFIX: &str = "EPU_CSV_";

/// Loads `MapperConfig` from defaults, an optional TOML file, then `EPU_CSV_*` env vars
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_CONFIG_FILE)
    }

    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn figment(&self) -> Figment {
        Figment::from(Serialized::defaults(MapperConfig::default()))
            .merge(Toml::file(&self.path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(&self) -> Result<MapperConfig> {
        let config: MapperConfig = self.figment().extract()?;
        config
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid mapper config: {}", e)))?;

        tracing::debug!("Loaded mapper config from {}", self.path.display());
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::{DecimalSeparator, OutOfRangePolicy};
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = ConfigService::new().load().unwrap();
            assert_eq!(config, MapperConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                    out_of_range = "clamp"
                    flat_export_decimal = "comma"
                    split_blocks = true
                "#,
            )?;
            jail.set_env("EPU_CSV_SPLIT_BLOCKS", "false");
            jail.set_env("EPU_CSV_BLOCK_MARKER", "Secagem");

            let config = ConfigService::new().load().unwrap();
            assert_eq!(config.out_of_range, OutOfRangePolicy::Clamp);
            assert_eq!(config.flat_export_decimal, DecimalSeparator::Comma);
            assert!(!config.split_blocks);
            assert_eq!(config.block_marker, "Secagem");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", r#"dashboard_marker = " ""#)?;
            let err = ConfigService::with_path("custom.toml").load().unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
            Ok(())
        });
    }

    #[test]
    fn test_unknown_enum_value_is_config_error() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, r#"encoding = "ebcdic""#)?;
            let err = ConfigService::new().load().unwrap_err();
            assert!(matches!(err, AppError::ConfigError(_)));
            Ok(())
        });
    }
}
