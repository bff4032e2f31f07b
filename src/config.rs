use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use std::fmt;

use crate::constants::{
    DEBUG_MARKER_ENV, DEFAULT_LOG_GROUP, DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_MAX_ATTEMPTS,
    DEFAULT_REGION, DEFAULT_UTC_OFFSET_HOURS,
};

#[derive(Clone)]
pub struct Config {
    pub debug_inputs: bool,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub aws: AwsConfig,
    pub poll: PollConfig,
    pub upload_utc_offset_hours: i32,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: String,
    pub log_group: String,
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

/// Bounded fixed-interval retry applied while a query is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
        }
    }
}

impl From<&PollConfig> for PollPolicy {
    fn from(config: &PollConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            max_attempts: config.max_attempts.max(1),
        }
    }
}

/// What the extractor needs beyond the client and the inputs.
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    pub log_group: String,
    pub poll: PollPolicy,
    pub output_dir: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("debug_inputs", &self.debug_inputs)
            .field("log_level", &self.log_level)
            .field("enable_file_logs", &self.enable_file_logs)
            .field("log_dir", &self.log_dir)
            .field("aws", &self.aws)
            .field("poll", &self.poll)
            .field("upload_utc_offset_hours", &self.upload_utc_offset_hours)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            debug_inputs: env::var_os(DEBUG_MARKER_ENV).is_some(),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            aws: AwsConfig {
                region: env_or("AWS_REGION", DEFAULT_REGION),
                log_group: env_or("LOG_GROUP_NAME", DEFAULT_LOG_GROUP),
            },
            poll: PollConfig {
                interval_ms: env_or_parse("POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS),
                max_attempts: env_or_parse("POLL_MAX_ATTEMPTS", DEFAULT_POLL_MAX_ATTEMPTS),
            },
            upload_utc_offset_hours: env_or_parse(
                "UPLOAD_UTC_OFFSET_HOURS",
                DEFAULT_UTC_OFFSET_HOURS,
            ),
            output_dir: PathBuf::from(env_or("OUTPUT_DIR", ".")),
        }
    }

    pub fn extractor_settings(&self) -> ExtractorSettings {
        ExtractorSettings {
            log_group: self.aws.log_group.clone(),
            poll: PollPolicy::from(&self.poll),
            output_dir: self.output_dir.clone(),
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
