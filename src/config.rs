use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{HolidayCalendar, TradingSession};
use crate::duration::{deserialize_duration, serialize_duration};
use crate::update::DEFAULT_CHART_WINDOW_DAYS;

const CONFIG_FILE_NAME: &str = "stockecho.toml";

fn default_base_url() -> String {
    "https://api.boerse-frankfurt.de/data".to_string()
}

fn default_mic() -> String {
    "XETR".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Market-data service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Base URL of the price-history API.
    pub base_url: String,

    /// Market identifier code of the exchange to quote (e.g. "XETR").
    pub mic: String,

    /// How long a single history request may take.
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub request_timeout: Duration,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            mic: default_mic(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Exchange session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// IANA timezone of the exchange.
    pub timezone: String,

    /// Local hour before which the current day's close is not yet available.
    pub market_open_hour: u32,

    /// Length of the chart window in calendar days.
    pub chart_window_days: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/Berlin".to_string(),
            market_open_hour: 9,
            chart_window_days: DEFAULT_CHART_WINDOW_DAYS,
        }
    }
}

impl SessionConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid timezone {:?}: {e}", self.timezone))
    }
}

/// Holidays for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayYear {
    pub year: i32,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

/// Holiday calendar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Start from the built-in exchange calendar.
    pub include_defaults: bool,

    /// Additional years; a listed year replaces the built-in one.
    pub years: Vec<HolidayYear>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            years: Vec::new(),
        }
    }
}

impl CalendarConfig {
    pub fn build(&self) -> HolidayCalendar {
        let base = if self.include_defaults {
            HolidayCalendar::default()
        } else {
            HolidayCalendar::empty()
        };
        self.years.iter().fold(base, |calendar, entry| {
            calendar.with_year(entry.year, entry.holidays.iter().copied())
        })
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to data directory. If relative, resolved from config file location.
    /// If not specified, defaults to the config file's directory.
    pub data_dir: Option<PathBuf>,

    pub market_data: MarketDataConfig,

    pub session: SessionConfig,

    pub calendar: CalendarConfig,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the data directory path.
    ///
    /// If `data_dir` is set and relative, it's resolved relative to `config_dir`.
    /// If `data_dir` is not set, returns `config_dir`.
    pub fn resolve_data_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(data_dir) if data_dir.is_absolute() => data_dir.clone(),
            Some(data_dir) => config_dir.join(data_dir),
            None => config_dir.to_path_buf(),
        }
    }

    /// Build the exchange session from the session and calendar sections.
    pub fn trading_session(&self) -> Result<TradingSession> {
        Ok(TradingSession {
            calendar: self.calendar.build(),
            timezone: self.session.timezone()?,
            open_hour: self.session.market_open_hour,
        })
    }
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The resolved data directory path.
    pub data_dir: PathBuf,

    pub market_data: MarketDataConfig,

    pub session: TradingSession,

    pub chart_window_days: u32,
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./stockecho.toml` if it exists in current directory
/// 2. `~/.local/share/stockecho/stockecho.toml` (XDG data directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from(CONFIG_FILE_NAME);
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("stockecho").join(CONFIG_FILE_NAME);
    }

    local_config
}

impl ResolvedConfig {
    fn from_config(config: Config, config_dir: &Path) -> Result<Self> {
        let data_dir = config.resolve_data_dir(config_dir);
        let session = config.trading_session()?;
        Ok(Self {
            data_dir,
            chart_window_days: config.session.chart_window_days,
            market_data: config.market_data,
            session,
        })
    }

    /// Load and resolve config from a file path.
    ///
    /// The data directory is resolved relative to the config file's parent directory.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Config file not found: {}", config_path.display()))?;

        let config_dir = config_path
            .parent()
            .context("Config file has no parent directory")?;

        let config = Config::load(&config_path)?;
        Self::from_config(config, config_dir)
            .with_context(|| format!("Invalid config file: {}", config_path.display()))
    }

    /// Load config, falling back to defaults if the file doesn't exist.
    ///
    /// Without a file, the config file's intended parent directory is the
    /// data directory.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load(config_path);
        }

        let config_path = if config_path.is_relative() {
            std::env::current_dir()
                .context("Failed to get current directory")?
                .join(config_path)
        } else {
            config_path.to_path_buf()
        };

        let config_dir = config_path
            .parent()
            .context("Config path has no parent directory")?;

        Self::from_config(Config::default(), config_dir)
    }
}
