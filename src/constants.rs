/// Text that precedes the embedded request object inside a log line
pub const REQUEST_MARKER: &str = "event request: ";

/// Half width of the query window around the upload instant (seconds)
pub const WINDOW_HALF_WIDTH_SECS: i64 = 60;

/// Default log group holding the upload requests
pub const DEFAULT_LOG_GROUP: &str = "/aws/lambda/NWT-Core";

/// Default AWS region of the log group
pub const DEFAULT_REGION: &str = "us-east-1";

/// Offset applied to upload timestamps written without one (hours east of UTC)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -3;

/// Default delay between two result fetches
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Incomplete fetches tolerated before giving up
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 600;

/// Field of a result row carrying the raw log line
pub const MESSAGE_FIELD: &str = "@message";

/// Environment variable whose presence selects the debug inputs
pub const DEBUG_MARKER_ENV: &str = "CERT_EXTRACTOR_DEBUG";

/// Inputs used when the debug marker is set
pub const DEBUG_STORE_ID: &str = "c28dc764-aea5-4bea-acc3-f3fc7a8fb59b";
pub const DEBUG_UPLOAD_DATE_TIME: &str = "2025-02-17T22:39:20";

/// Output file name is `{CERT_FILE_PREFIX}{senha}{CERT_FILE_SUFFIX}`
pub const CERT_FILE_PREFIX: &str = "cert-";
pub const CERT_FILE_SUFFIX: &str = ".pfx";
