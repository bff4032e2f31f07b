use std::sync::Once;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
        }
    }
}

/// Logs go to stderr; stdout only carries the final result line.
///
/// Only the first call installs a subscriber. A log directory that cannot
/// be opened disables file logs instead of aborting the run.
pub fn init_tracing(config: &LogConfig) {
    static INIT: Once = Once::new();
    INIT.call_once(|| install(config));
}

fn install(config: &LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    let file_layer = config
        .enable_file_logs
        .then(|| file_appender(&config.log_dir))
        .flatten()
        .map(|appender| fmt::layer().with_writer(appender).with_ansi(false).json());

    let result = Registry::default()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    if let Err(e) = result {
        eprintln!("failed to initialize tracing: {e}");
    }
}

fn file_appender(log_dir: &str) -> Option<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("cert-extractor")
        .filename_suffix("log")
        .max_log_files(30)
        .build(log_dir)
        .map_err(|e| eprintln!("file logs disabled, cannot open {log_dir}: {e}"))
        .ok()
}
