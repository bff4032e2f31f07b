use std::path::Path;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::json;

use cert_extractor::client::ResultRow;
use cert_extractor::config::{AwsConfig, Config, ExtractorSettings, PollConfig, PollPolicy};

#[allow(dead_code)]
pub const STORE_ID: &str = "c28dc764-aea5-4bea-acc3-f3fc7a8fb59b";

/// Raw Lambda log line carrying an upload request for `content`.
#[allow(dead_code)]
pub fn upload_log_line(content: &[u8], password: &str) -> String {
    let body = json!({
        "arquivo": BASE64.encode(content),
        "senha": password,
        "nome": "certificado.pfx",
    });
    let request = json!({
        "httpMethod": "POST",
        "path": format!("/lojas/{STORE_ID}/certificado"),
        "body": body.to_string(),
    });
    format!("2025-02-18T01:39:21.004Z\t8f1c2a\tINFO\tevent request: {request}")
}

pub fn message_row(message: &str) -> ResultRow {
    ResultRow::new([
        ("@timestamp", "2025-02-18 01:39:21.004"),
        ("@message", message),
    ])
}

#[allow(dead_code)]
pub fn settings(output_dir: &Path) -> ExtractorSettings {
    ExtractorSettings {
        log_group: "/aws/lambda/NWT-Core".to_string(),
        poll: PollPolicy {
            interval: Duration::from_secs(1),
            max_attempts: 30,
        },
        output_dir: output_dir.to_path_buf(),
    }
}

// Built directly instead of from_env to keep tests free of env var races.
#[allow(dead_code)]
pub fn config(output_dir: &Path, debug_inputs: bool) -> Config {
    Config {
        debug_inputs,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        aws: AwsConfig {
            region: "us-east-1".to_string(),
            log_group: "/aws/lambda/NWT-Core".to_string(),
        },
        poll: PollConfig {
            interval_ms: 1_000,
            max_attempts: 30,
        },
        upload_utc_offset_hours: -3,
        output_dir: output_dir.to_path_buf(),
    }
}
