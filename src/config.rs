use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::input::InputFormat;

const DEFAULT_CONFIG_PATH: &str = "/etc/lantern.conf";
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Runtime settings for the `lantern` command.
///
/// Sources, lowest precedence first: built-in defaults, the config file
/// (`LANTERN_CONFIG`, default `/etc/lantern.conf`), `LANTERN_*` environment
/// variables, then command line flags applied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_format: InputFormat,
    pub option_overload: bool,
    pub verbose: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_format: InputFormat::Auto,
            option_overload: false,
            verbose: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Like [`Config::load`], but with an explicit config file that must exist.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        std::env::var("LANTERN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Read a config file from an explicit path, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Config::default();
        config.apply_file(&content)?;
        Ok(config)
    }

    /// Apply `key = value` lines. Blank lines and `#` comments are skipped,
    /// unknown keys are ignored.
    pub fn apply_file(&mut self, content: &str) -> Result<(), Error> {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                self.set(key.trim(), value.trim())?;
            }
        }
        Ok(())
    }

    /// Apply `LANTERN_*` overrides looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in [
            ("LANTERN_INPUT_FORMAT", "input_format"),
            ("LANTERN_OPTION_OVERLOAD", "option_overload"),
            ("LANTERN_VERBOSE", "verbose"),
            ("LANTERN_LOG_LEVEL", "log_level"),
        ] {
            if let Some(value) = lookup(var) {
                self.set(key, value.trim()).map_err(|e| match e {
                    Error::Config(msg) => Error::Config(format!("{var}: {msg}")),
                    other => other,
                })?;
            }
        }
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        match key {
            "input_format" => self.input_format = value.parse()?,
            "option_overload" => self.option_overload = parse_bool(key, value)?,
            "verbose" => self.verbose = parse_bool(key, value)?,
            "log_level" => {
                if value.is_empty() {
                    return Err(Error::Config("Empty log_level".to_string()));
                }
                self.log_level = value.to_string();
            }
            _ => {}
        }
        Ok(())
    }

    /// Filter directive used when `RUST_LOG` is not set.
    pub fn tracing_filter(&self) -> &str {
        if self.verbose && self.log_level == DEFAULT_LOG_LEVEL {
            "debug"
        } else {
            self.log_level.as_str()
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Error> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::Config(format!("Invalid {key}: {value}"))),
    }
}
