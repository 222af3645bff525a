use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    delegates::lazy::LazyMode,
    magic::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_CONFIG_PATH},
    utils::error::{ConfigError, ConfigResult},
};

const INLINE_SOURCE_NAME: &str = "<string>"; // Source name reported for in-memory documents

/// Settings for lazy caches built through [`LazyCache::with_config`](crate::LazyCache::with_config).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyConfig {
    pub mode: LazyMode,
}

/// Runtime configuration.
///
/// Never read implicitly: load it once and pass it to the constructors that accept it.
///
/// ```toml
/// [lazy]
/// mode = "publication" # or "synchronized" (default), "none"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateConfig {
    pub lazy: LazyConfig,
}

impl DelegateConfig {
    /// Get the default path to the configuration file.
    pub fn default_path() -> PathBuf {
        // Check if the environment variable is set
        if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
            return config_path.into();
        }

        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            } else {
                // Fallback to current directory if HOME is not set
            }
        }

        path.push(CONFIG_DIR_NAME);
        path.push(CONFIG_FILE_NAME);
        path
    }

    /// Parse a configuration held in memory. Parse errors name the source `<string>`.
    pub fn from_toml_str(toml_str: &str) -> ConfigResult<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            source: e,
            file: INLINE_SOURCE_NAME.to_string(),
        })
    }

    /// Load the configuration from a TOML file.
    pub fn load_from_toml(path: &Path) -> ConfigResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;
        toml::from_str(&toml_str).map_err(|e| ConfigError::ParseError {
            source: e,
            file: path.display().to_string(),
        })
    }

    /// Load from [`DelegateConfig::default_path`], falling back to defaults if the file does
    /// not exist.
    pub fn load_or_default() -> ConfigResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from_toml(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the configuration to a TOML file, creating missing parent directories.
    pub fn save_to_toml(&self, path: &Path) -> ConfigResult<()> {
        let toml_str = toml::to_string(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = DelegateConfig::from_toml_str("").unwrap();
        assert_eq!(config, DelegateConfig::default());
        assert_eq!(config.lazy.mode, LazyMode::Synchronized);
    }

    #[test]
    fn every_mode_parses() {
        for (text, mode) in [
            ("synchronized", LazyMode::Synchronized),
            ("publication", LazyMode::PublicationSafe),
            ("none", LazyMode::None),
        ] {
            let config =
                DelegateConfig::from_toml_str(&format!("[lazy]\nmode = \"{text}\"\n")).unwrap();
            assert_eq!(config.lazy.mode, mode);
        }
    }

    #[test]
    fn unknown_mode_is_a_parse_error() {
        let err = DelegateConfig::from_toml_str("[lazy]\nmode = \"eager\"\n").unwrap_err();
        match &err {
            ConfigError::ParseError { file, .. } => assert_eq!(file, "<string>"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.to_string().contains("mode ="));
    }

    #[test]
    fn save_creates_missing_directories() {
        let root = std::env::temp_dir().join(format!(
            "hydelegate-nested-{}",
            std::process::id()
        ));
        let path = root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        let _ = std::fs::remove_dir_all(&root);
        assert!(!path.parent().unwrap().exists());

        let config = DelegateConfig {
            lazy: LazyConfig {
                mode: LazyMode::PublicationSafe,
            },
        };
        config.save_to_toml(&path).unwrap();
        let reloaded = DelegateConfig::load_from_toml(&path).unwrap();
        std::fs::remove_dir_all(&root).unwrap();

        assert_eq!(reloaded, config);
    }

    #[test]
    fn save_and_reload() {
        let path = std::env::temp_dir().join(format!(
            "hydelegate-config-{}.toml",
            std::process::id()
        ));
        let config = DelegateConfig {
            lazy: LazyConfig {
                mode: LazyMode::None,
            },
        };

        config.save_to_toml(&path).unwrap();
        let reloaded = DelegateConfig::load_from_toml(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(reloaded, config);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DelegateConfig::load_from_toml(Path::new("/nonexistent/hydelegate.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
