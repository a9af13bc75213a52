//! Build timestamp, reproducible when `SOURCE_DATE_EPOCH` is set.

use chrono::{DateTime, Utc};

use crate::prelude::*;

/// Environment variable overriding the build time with a Unix timestamp.
pub const SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";

/// `YYYY-MM-DDTHH:MM:SSZ`, always UTC.
pub const BUILD_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format the build date from an optional epoch override.
///
/// An absent or blank override means "now".
///
/// # Examples
///
/// ```rust
/// use prow_version::build_date;
///
/// assert_eq!(build_date(Some("1500000000")).unwrap(), "2017-07-14T02:40:00Z");
/// ```
pub fn build_date(source_date_epoch: Option<&str>) -> Result<String> {
    let date = match source_date_epoch.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => {
            let seconds: i64 = value
                .parse()
                .map_err(|_| Error::InvalidSourceDateEpoch(String::from(value)))?;
            DateTime::from_timestamp(seconds, 0)
                .ok_or_else(|| Error::InvalidSourceDateEpoch(String::from(value)))?
        }
        None => Utc::now(),
    };
    Ok(date.format(BUILD_DATE_FORMAT).to_string())
}

/// [`build_date`] with the override read from `SOURCE_DATE_EPOCH`.
pub fn build_date_from_env() -> Result<String> {
    build_date(std::env::var(SOURCE_DATE_EPOCH).ok().as_deref())
}
