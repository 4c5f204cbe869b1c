use crate::error::ConfigError;
use crate::model::FieldSet;
use crate::report::DirectoryPolicy;
use crate::scheduler::{Interval, Schedule, TimeUnit};
use serde_derive::Deserialize;
use std::str::FromStr;
use std::time::Duration;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    // log to this file instead of stdout
    pub log_file: Option<String>,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub(crate) fn load_app_config() -> Result<AppConfig, ConfigError> {
    match envy::from_env::<AppConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(ConfigError::env_parse(format!("AppConfig: {}", err))),
    }
}

fn default_url() -> String {
    "https://fantasy-api.formula1.com/f1/2022/players".to_string()
}

fn default_unit_time() -> String {
    "minutes".to_string()
}

fn default_poll_increment_ms() -> u64 {
    1000
}

fn default_period_id() -> i64 {
    1
}

#[derive(Deserialize, Debug)]
pub struct ScraperConfig {
    #[serde(default = "default_url")]
    pub url: String,
    // absent runs a single cycle and exits
    pub delta_time: Option<i64>,
    #[serde(default = "default_unit_time")]
    pub unit_time: String,
    #[serde(default = "default_poll_increment_ms")]
    pub poll_increment_ms: u64,
    #[serde(default)]
    pub allow_duplicates: bool,
    #[serde(default)]
    pub embed_metadata: bool,
    // comma separated derived field keys
    #[serde(default)]
    pub fields: String,
    #[serde(default = "default_period_id")]
    pub period_id: i64,
    pub baseline_file: Option<String>,
}

impl ScraperConfig {
    pub fn schedule(&self) -> Result<Schedule, ConfigError> {
        match self.delta_time {
            Some(value) => {
                let unit = TimeUnit::from_str(&self.unit_time)?;
                Ok(Schedule::Every(Interval::new(value, unit)?))
            }
            // the unit only matters for recurring runs
            None => Ok(Schedule::Once),
        }
    }

    pub fn poll_increment(&self) -> Result<Duration, ConfigError> {
        if self.poll_increment_ms == 0 {
            return Err(ConfigError::invalid("poll_increment_ms", "must be > 0"));
        }
        Ok(Duration::from_millis(self.poll_increment_ms))
    }

    pub fn field_set(&self) -> Result<FieldSet, ConfigError> {
        FieldSet::parse(&self.fields)
    }
}

pub fn load_scraper_config() -> Result<ScraperConfig, ConfigError> {
    match envy::prefixed("SCRAPER_").from_env::<ScraperConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(ConfigError::env_parse(format!("ScraperConfig: {}", err))),
    }
}

fn default_csv_file() -> String {
    "prices.csv".to_string()
}

fn default_checksum_file() -> String {
    "checksum.txt".to_string()
}

fn default_archive_create_dir() -> bool {
    true
}

fn default_archive_prefix() -> String {
    "prices".to_string()
}

#[derive(Deserialize, Debug)]
pub struct ReportConfig {
    #[serde(default = "default_csv_file")]
    pub csv_file: String,
    #[serde(default = "default_checksum_file")]
    pub checksum_file: String,
    pub archive_dir: Option<String>,
    #[serde(default = "default_archive_create_dir")]
    pub archive_create_dir: bool,
    pub zip_file: Option<String>,
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,
}

impl ReportConfig {
    pub fn directory_policy(&self) -> DirectoryPolicy {
        DirectoryPolicy::from_create_flag(self.archive_create_dir)
    }
}

pub fn load_report_config() -> Result<ReportConfig, ConfigError> {
    match envy::prefixed("REPORT_").from_env::<ReportConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(ConfigError::env_parse(format!("ReportConfig: {}", err))),
    }
}
