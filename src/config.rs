//! User configuration.
//!
//! Settings come from, lowest precedence first: built-in defaults, the JSON
//! file at `<config dir>/ssed/config.json`, environment variables, then
//! command-line flags (applied by the binary).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Diagnostics, Error};

/// Environment variable carrying the previous command's exit status.
pub const STATUS_ENV: &str = "SSED_STATUS";

/// When to color output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Decide whether to color, given `NO_COLOR` and whether stdout is a terminal.
    pub fn enabled(self, no_color: bool, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => !no_color && is_terminal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub color: ColorChoice,
    pub json: bool,
}

impl Config {
    /// Location of the config file, if the platform has a config directory.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ssed").join("config.json"))
    }

    /// Load the user's config file. A missing file yields the defaults; an
    /// unreadable or malformed one is reported and also yields the defaults.
    pub fn load(diagnostics: &mut dyn Diagnostics) -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path, diagnostics),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path, diagnostics: &mut dyn Diagnostics) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                diagnostics.warn(Error::new(format!(
                    "cannot read config '{}': {}",
                    path.display(),
                    e
                )));
                return Self::default();
            }
        };
        match Self::from_json(&text) {
            Ok(config) => config,
            Err(e) => {
                diagnostics.warn(Error::new(format!(
                    "invalid config '{}': {}",
                    path.display(),
                    e
                )));
                Self::default()
            }
        }
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
