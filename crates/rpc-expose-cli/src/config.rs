// crates/rpc-expose-cli/src/config.rs
//
// CLI configuration, loaded from a TOML file or populated with defaults.

use serde::Deserialize;
use std::fs;

use crate::output::OutputFormat;

/// Default location of the CLI config file.
pub const DEFAULT_CONFIG_PATH: &str = "~/.rpc-expose/config.toml";

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Path to the resource manifest.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format when `--format` is not given.
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_manifest() -> String {
    "~/.rpc-expose/resources.toml".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            log_level: default_log_level(),
            format: OutputFormat::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(expand_tilde(path))?;
        let config: CliConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).display().to_string();
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.manifest, "~/.rpc-expose/resources.toml");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_full_config() {
        let config: CliConfig = toml::from_str(
            "manifest = \"/etc/app/resources.toml\"\nlog_level = \"debug\"\nformat = \"json\"\n",
        )
        .unwrap();
        assert_eq!(config.manifest, "/etc/app/resources.toml");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "rpc_expose_cli_config_{}.toml",
            uuid::Uuid::now_v7()
        ));
        std::fs::write(&path, "log_level = \"info\"\n").unwrap();

        let config = CliConfig::load(&path.to_string_lossy()).unwrap();
        assert_eq!(config.log_level, "info");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/tmp/resources.toml"), "/tmp/resources.toml");
    }
}
