//! Configuration management with layered hierarchy
//!
//! Defaults, then the user file (`~/.config/dm329/config.yaml` on Linux),
//! then environment variables. Command-line flags override all of them.

use serde::Deserialize;
use std::path::PathBuf;

pub const OUTPUT_DIR_ENV: &str = "DM329_OUTPUT_DIR";
pub const TECHNICIAN_ENV: &str = "DM329_TECHNICIAN";

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory generated reports are written to
    pub output_dir: Option<PathBuf>,

    /// Technician printed on the cover when the input names none
    pub technician: Option<String>,

    /// Default output format for `classify`
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&path) {
                config.merge(global);
            }
        }

        config.merge(Self::from_env(|key| std::env::var(key).ok()));
        config
    }

    fn read_file(path: &std::path::Path) -> Option<Config> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    fn from_env(var: impl Fn(&str) -> Option<String>) -> Config {
        Config {
            output_dir: var(OUTPUT_DIR_ENV).filter(|v| !v.is_empty()).map(PathBuf::from),
            technician: var(TECHNICIAN_ENV).filter(|v| !v.is_empty()),
            default_format: None,
        }
    }

    /// Path of the user config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dm329")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir;
        }
        if other.technician.is_some() {
            self.technician = other.technician;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Output directory, falling back to the current directory
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_layers() {
        let mut config = Config {
            output_dir: Some(PathBuf::from("/reports")),
            technician: Some("Ing. Bianchi".to_string()),
            default_format: Some("csv".to_string()),
        };
        config.merge(Config {
            output_dir: Some(PathBuf::from("/tmp")),
            ..Default::default()
        });

        assert_eq!(config.output_dir(), PathBuf::from("/tmp"));
        assert_eq!(config.technician.as_deref(), Some("Ing. Bianchi"));
        assert_eq!(config.default_format.as_deref(), Some("csv"));
    }

    #[test]
    fn test_env_layer() {
        let env = Config::from_env(|key| match key {
            OUTPUT_DIR_ENV => Some("/srv/out".to_string()),
            TECHNICIAN_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(env.output_dir, Some(PathBuf::from("/srv/out")));
        assert_eq!(env.technician, None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Config::default().output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_parse_file() {
        let config: Config = serde_yml::from_str("output_dir: /data/relazioni\ndefault_format: json\n").unwrap();
        assert_eq!(config.output_dir, Some(PathBuf::from("/data/relazioni")));
        assert_eq!(config.default_format.as_deref(), Some("json"));
    }
}
