//! Query parameters and the Logs Insights query built from them.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime};
use thiserror::Error;

use crate::constants::WINDOW_HALF_WIDTH_SECS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid upload timestamp '{value}': expected YYYY-MM-DDTHH:MM:SS")]
    InvalidTimestamp { value: String },
    #[error("invalid utc offset: {hours} hours")]
    InvalidOffset { hours: i32 },
}

/// Store identifier plus the instant the certificate was uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub store_id: String,
    pub uploaded_at: DateTime<FixedOffset>,
}

impl QueryParams {
    pub fn new(
        store_id: impl Into<String>,
        upload_date_time: &str,
        default_offset_hours: i32,
    ) -> Result<Self, InputError> {
        Ok(Self {
            store_id: store_id.into(),
            uploaded_at: parse_upload_time(upload_date_time, default_offset_hours)?,
        })
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::around(self.uploaded_at)
    }
}

/// Parses an upload timestamp. A string carrying its own offset keeps it;
/// a naive wall-clock string is read at `default_offset_hours`.
pub fn parse_upload_time(
    raw: &str,
    default_offset_hours: i32,
) -> Result<DateTime<FixedOffset>, InputError> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset);
    }

    let offset = default_offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or(InputError::InvalidOffset {
            hours: default_offset_hours,
        })?;
    let naive = raw
        .parse::<NaiveDateTime>()
        .map_err(|_| InputError::InvalidTimestamp {
            value: raw.to_string(),
        })?;
    naive
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| InputError::InvalidTimestamp {
            value: raw.to_string(),
        })
}

/// Query window in Unix epoch seconds, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn around<Tz: chrono::TimeZone>(instant: DateTime<Tz>) -> Self {
        let half = Duration::seconds(WINDOW_HALF_WIDTH_SECS);
        Self {
            start: (instant.clone() - half).timestamp(),
            end: (instant + half).timestamp(),
        }
    }
}

pub fn build_query_string(store_id: &str) -> String {
    format!(
        "fields @timestamp, @message \
         | filter httpMethod = 'POST' and path like /{store_id}\\/certificado/ \
         and @message like /event request/ \
         | sort @timestamp desc"
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub log_group: String,
    pub window: TimeWindow,
    pub query_string: String,
}

impl QueryRequest {
    pub fn new(log_group: impl Into<String>, params: &QueryParams) -> Self {
        Self {
            log_group: log_group.into(),
            window: params.window(),
            query_string: build_query_string(&params.store_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn naive_timestamp_uses_default_offset() {
        let parsed = parse_upload_time("2025-02-17T22:39:20", -3).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-02-17T22:39:20-03:00");
        assert_eq!(
            parsed.with_timezone(&Utc).to_rfc3339(),
            "2025-02-18T01:39:20+00:00"
        );
    }

    #[test]
    fn explicit_offset_wins() {
        let parsed = parse_upload_time("2025-02-18T01:39:20Z", -3).unwrap();
        let naive = parse_upload_time("2025-02-17T22:39:20", -3).unwrap();
        assert_eq!(parsed, naive);
    }

    #[test]
    fn fractional_seconds_are_accepted() {
        let parsed = parse_upload_time("2025-02-17T22:39:20.750", -3).unwrap();
        assert_eq!(TimeWindow::around(parsed).start, 1_739_842_700);
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        let err = parse_upload_time("yesterday", -3).unwrap_err();
        assert_eq!(
            err,
            InputError::InvalidTimestamp {
                value: "yesterday".to_string()
            }
        );
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let err = parse_upload_time("2025-02-17T22:39:20", 30).unwrap_err();
        assert_eq!(err, InputError::InvalidOffset { hours: 30 });
    }

    #[test]
    fn overflowing_offset_is_rejected() {
        for hours in [1_000_000, -1_000_000, i32::MAX, i32::MIN] {
            let err = parse_upload_time("2025-02-17T22:39:20", hours).unwrap_err();
            assert_eq!(err, InputError::InvalidOffset { hours });
        }
    }

    #[test]
    fn window_spans_one_minute_each_side() {
        let params = QueryParams::new("loja", "2025-02-17T22:39:20", -3).unwrap();
        let window = params.window();
        // 2025-02-18T01:39:20Z
        assert_eq!(window.start, 1_739_842_760 - 60);
        assert_eq!(window.end, 1_739_842_760 + 60);
    }

    #[test]
    fn query_string_filters_on_store_path() {
        let query = build_query_string("c28dc764-aea5-4bea-acc3-f3fc7a8fb59b");
        assert_eq!(
            query,
            "fields @timestamp, @message | filter httpMethod = 'POST' and path like \
             /c28dc764-aea5-4bea-acc3-f3fc7a8fb59b\\/certificado/ and @message like \
             /event request/ | sort @timestamp desc"
        );
    }

    #[test]
    fn request_carries_log_group_and_window() {
        let params = QueryParams::new("abc", "2024-01-01T00:00:00Z", -3).unwrap();
        let request = QueryRequest::new("/aws/lambda/test", &params);
        assert_eq!(request.log_group, "/aws/lambda/test");
        assert_eq!(request.window, params.window());
        assert!(request.query_string.contains("path like /abc\\/certificado/"));
    }

    proptest! {
        #[test]
        fn pt_window_is_centered_regardless_of_offset(
            secs in 0_i64..4_000_000_000,
            offset_hours in -12_i32..=14,
        ) {
            let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
            let instant = DateTime::from_timestamp(secs, 0).unwrap().with_timezone(&offset);
            let window = TimeWindow::around(instant);
            prop_assert_eq!(window.start, secs - 60);
            prop_assert_eq!(window.end, secs + 60);
        }

        #[test]
        fn pt_naive_and_explicit_forms_agree(
            secs in 0_i64..4_000_000_000,
            offset_hours in -12_i32..=14,
        ) {
            let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
            let instant = DateTime::from_timestamp(secs, 0).unwrap().with_timezone(&offset);
            let naive = instant.naive_local().format("%Y-%m-%dT%H:%M:%S").to_string();
            let from_naive = parse_upload_time(&naive, offset_hours).unwrap();
            let from_rfc = parse_upload_time(&instant.to_rfc3339(), 0).unwrap();
            prop_assert_eq!(TimeWindow::around(from_naive), TimeWindow::around(from_rfc));
        }
    }
}
