//! Optional user settings, read from `<config dir>/chipbox/config.toml`.
//!
//! ```toml
//! [timing]
//! steps_per_second = 60
//! ticks_per_second = 60
//!
//! [palette]
//! off = "#111"
//! on = "#0a0"
//! ```
//!
//! Every field is optional. A missing file means defaults; a file that
//! cannot be read or does not validate is reported and then ignored.

use std::fmt;
use std::path::{Path, PathBuf};

use chipbox_core::scheduler::{DEFAULT_RATE_HZ, Scheduler, ZeroRate};
use chipbox_core::video::{Palette, ParseColorError, Rgb};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Color(ParseColorError),
    Timing(ZeroRate),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse(e) => write!(f, "parse error: {e}"),
            Self::Color(e) => write!(f, "palette: {e}"),
            Self::Timing(e) => write!(f, "timing: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Color(e) => Some(e),
            Self::Timing(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<ParseColorError> for ConfigError {
    fn from(e: ParseColorError) -> Self {
        Self::Color(e)
    }
}

impl From<ZeroRate> for ConfigError {
    fn from(e: ZeroRate) -> Self {
        Self::Timing(e)
    }
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub timing: TimingConfig,
    pub palette: PaletteConfig,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub steps_per_second: u32,
    pub ticks_per_second: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            steps_per_second: DEFAULT_RATE_HZ,
            ticks_per_second: DEFAULT_RATE_HZ,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PaletteConfig {
    pub off: String,
    pub on: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            off: "#111".to_string(),
            on: "#0a0".to_string(),
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

// ---------------------------------------------------------------------------
// Validated settings
// ---------------------------------------------------------------------------

/// Settings the host is built from.
#[derive(Default)]
pub struct Settings {
    pub scheduler: Scheduler,
    pub palette: Palette,
}

impl TryFrom<&Config> for Settings {
    type Error = ConfigError;

    fn try_from(config: &Config) -> Result<Self, ConfigError> {
        let scheduler = Scheduler::from_rates(
            config.timing.steps_per_second,
            config.timing.ticks_per_second,
        )?;
        let palette = Palette {
            off: Rgb::from_hex(&config.palette.off)?,
            on: Rgb::from_hex(&config.palette.on)?,
        };
        Ok(Self { scheduler, palette })
    }
}

/// `<config dir>/chipbox/config.toml`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chipbox").join("config.toml"))
}

/// Read settings from `path`, falling back to defaults on any problem.
pub fn load(path: Option<&Path>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };
    match read(path) {
        Ok(Some(settings)) => {
            debug!(path = %path.display(), "config loaded");
            settings
        }
        Ok(None) => {
            debug!(path = %path.display(), "no config file, using defaults");
            Settings::default()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring config file");
            Settings::default()
        }
    }
}

fn read(path: &Path) -> Result<Option<Settings>, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let config = Config::parse(&text)?;
    Settings::try_from(&config).map(Some)
}
