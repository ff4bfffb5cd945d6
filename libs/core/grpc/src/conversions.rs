//! Wire conversions shared by services and clients
//!
//! - Timestamps travel as RFC 3339 strings with millisecond precision in UTC
//!   (`2024-05-01T09:30:00.123Z`)
//! - Deadlines arrive in the `grpc-timeout` request header
//!   (`<1-8 digits><unit>`, unit one of `H M S m u n`)

use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;
use tonic::metadata::MetadataMap;

pub const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

pub fn datetime_to_rfc3339(dt: &DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp, normalizing any offset to UTC
pub fn rfc3339_to_datetime(value: &str) -> Result<DateTime<Utc>, String> {
  DateTime::parse_from_rfc3339(value)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| format!("Invalid RFC 3339 timestamp '{value}': {e}"))
}

/// Parse a `grpc-timeout` header value. Returns `None` when malformed.
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
  if value.len() < 2 || value.len() > 9 {
    return None;
  }
  let (digits, unit) = value.split_at(value.len() - 1);
  if !digits.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  let amount: u64 = digits.parse().ok()?;

  let duration = match unit {
    "H" => Duration::from_secs(amount.checked_mul(3600)?),
    "M" => Duration::from_secs(amount.checked_mul(60)?),
    "S" => Duration::from_secs(amount),
    "m" => Duration::from_millis(amount),
    "u" => Duration::from_micros(amount),
    "n" => Duration::from_nanos(amount),
    _ => return None,
  };
  Some(duration)
}

/// Time budget the caller attached to this request, if any
pub fn request_deadline(metadata: &MetadataMap) -> Option<Duration> {
  metadata
    .get(GRPC_TIMEOUT_HEADER)
    .and_then(|value| value.to_str().ok())
    .and_then(parse_grpc_timeout)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn test_rfc3339_millis_utc() {
    let dt = Utc.timestamp_millis_opt(1_714_555_800_123).unwrap();
    assert_eq!(datetime_to_rfc3339(&dt), "2024-05-01T09:30:00.123Z");
  }

  #[test]
  fn test_rfc3339_parse_normalizes_offset() {
    let dt = rfc3339_to_datetime("2024-05-01T11:30:00.123+02:00").unwrap();
    assert_eq!(datetime_to_rfc3339(&dt), "2024-05-01T09:30:00.123Z");
  }

  #[test]
  fn test_rfc3339_parse_rejects_garbage() {
    let err = rfc3339_to_datetime("yesterday").unwrap_err();
    assert!(err.contains("yesterday"));
  }

  #[test]
  fn test_parse_grpc_timeout_units() {
    assert_eq!(parse_grpc_timeout("2H"), Some(Duration::from_secs(7200)));
    assert_eq!(parse_grpc_timeout("3M"), Some(Duration::from_secs(180)));
    assert_eq!(parse_grpc_timeout("10S"), Some(Duration::from_secs(10)));
    assert_eq!(parse_grpc_timeout("250m"), Some(Duration::from_millis(250)));
    assert_eq!(parse_grpc_timeout("99999999u"), Some(Duration::from_micros(99_999_999)));
    assert_eq!(parse_grpc_timeout("5n"), Some(Duration::from_nanos(5)));
  }

  #[test]
  fn test_parse_grpc_timeout_rejects_malformed() {
    assert_eq!(parse_grpc_timeout(""), None);
    assert_eq!(parse_grpc_timeout("m"), None);
    assert_eq!(parse_grpc_timeout("10"), None);
    assert_eq!(parse_grpc_timeout("10x"), None);
    assert_eq!(parse_grpc_timeout("-1S"), None);
    assert_eq!(parse_grpc_timeout("123456789S"), None);
  }

  #[test]
  fn test_request_deadline_from_metadata() {
    let mut metadata = MetadataMap::new();
    assert_eq!(request_deadline(&metadata), None);

    metadata.insert(GRPC_TIMEOUT_HEADER, "1500m".parse().unwrap());
    assert_eq!(request_deadline(&metadata), Some(Duration::from_millis(1500)));
  }
}
