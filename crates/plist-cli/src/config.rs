//! Command line configuration for `plist2json`.
//!
//! Every option can also be set through the environment.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PLIST2JSON_COMPACT` | false | Print JSON on a single line |
//! | `PLIST2JSON_MAX_DEPTH` | 512 | Maximum element nesting |
//! | `PLIST2JSON_LOG_LEVEL` | warn | Log level |

use std::path::{Path, PathBuf};

use clap::Parser;
use darwin_plist::DecodeOptions;
use darwin_plist::options::DEFAULT_MAX_DEPTH;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Configuration for converting a property list to JSON.
#[derive(Debug, Clone, Parser)]
#[command(name = "plist2json")]
#[command(about = "Convert an Apple XML property list to JSON")]
pub struct CliConfig {
    /// Property list to read; `-` or no argument reads stdin.
    pub input: Option<PathBuf>,

    /// Print JSON on a single line instead of pretty-printing it.
    #[arg(long, env = "PLIST2JSON_COMPACT")]
    pub compact: bool,

    /// Maximum nesting of plist elements.
    #[arg(long, env = "PLIST2JSON_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "PLIST2JSON_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            input: None,
            compact: false,
            max_depth: DEFAULT_MAX_DEPTH,
            log_level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// The file to read, or `None` for stdin.
    pub fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }

    /// Decoder options derived from the command line.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::default().max_depth(self.max_depth)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.max_depth == 0 {
            errors.push("Max depth cannot be 0".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "Unknown log level '{}', expected one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        if let Some(path) = self.input_path()
            && !path.is_file()
        {
            errors.push(format!("Input file not found: {}", path.display()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.max_depth, 512);
        assert_eq!(config.log_level, "warn");
        assert!(!config.compact);
        assert!(config.input_path().is_none());
    }

    #[test]
    fn test_parse_flags() {
        let config = CliConfig::try_parse_from([
            "plist2json",
            "--compact",
            "--max-depth",
            "8",
            "--log-level",
            "debug",
            "Info.plist",
        ])
        .unwrap();
        assert!(config.compact);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.input_path(), Some(Path::new("Info.plist")));
        assert_eq!(config.decode_options().max_depth, 8);
    }

    #[test]
    fn test_dash_means_stdin() {
        let config = CliConfig::try_parse_from(["plist2json", "-"]).unwrap();
        assert!(config.input_path().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_valid() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_values() {
        let config = CliConfig {
            max_depth: 0,
            log_level: "loud".to_string(),
            input: Some(PathBuf::from("/nonexistent/Info.plist")),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("Max depth")));
        assert!(errors.iter().any(|e| e.contains("loud")));
        assert!(errors.iter().any(|e| e.contains("Info.plist")));
    }
}
