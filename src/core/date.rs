use crate::utils::error::{Result, UtilsError};
use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Formats the UTC calendar date of `instant` as `YYYY-MM-DD`.
///
/// The date is taken after conversion to UTC: `2023-07-04T23:30:00-05:00` is
/// `2023-07-05`. Years outside `0000..=9999` have no 10-character form and
/// are rejected with [`UtilsError::InvalidInstant`].
pub fn format_date<Tz: TimeZone>(instant: &DateTime<Tz>) -> Result<String> {
    let utc = instant.with_timezone(&Utc);
    let year = utc.year();
    if !(0..=9999).contains(&year) {
        return Err(UtilsError::invalid_instant(
            utc.to_string(),
            format!("year {} cannot be written as YYYY", year),
        ));
    }
    Ok(format!("{:04}-{:02}-{:02}", year, utc.month(), utc.day()))
}

/// Formats milliseconds since the Unix epoch.
pub fn format_date_millis(millis: i64) -> Result<String> {
    let instant = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        UtilsError::invalid_instant(millis, "milliseconds since epoch out of range")
    })?;
    format_date(&instant)
}

/// Parses RFC 3339 text such as `2023-07-04T15:30:00Z` into a UTC instant.
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| UtilsError::invalid_instant(text, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_date_utc() {
        let instant = parse_instant("2023-07-04T15:30:00Z").unwrap();
        assert_eq!(format_date(&instant).unwrap(), "2023-07-04");
    }

    #[test]
    fn test_format_date_uses_utc_day() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let evening = offset.with_ymd_and_hms(2023, 7, 4, 23, 30, 0).unwrap();
        assert_eq!(format_date(&evening).unwrap(), "2023-07-05");

        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let morning = offset.with_ymd_and_hms(2023, 7, 4, 2, 0, 0).unwrap();
        assert_eq!(format_date(&morning).unwrap(), "2023-07-03");
    }

    #[test]
    fn test_format_date_pads_fields() {
        let instant = Utc.with_ymd_and_hms(5, 1, 9, 0, 0, 0).unwrap();
        assert_eq!(format_date(&instant).unwrap(), "0005-01-09");
    }

    #[test]
    fn test_format_date_rejects_five_digit_year() {
        let instant = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        let err = format_date(&instant).unwrap_err();
        assert!(matches!(err, UtilsError::InvalidInstant { .. }));

        let instant = Utc.with_ymd_and_hms(-1, 12, 31, 0, 0, 0).unwrap();
        assert!(format_date(&instant).is_err());
    }

    #[test]
    fn test_format_date_millis() {
        assert_eq!(format_date_millis(0).unwrap(), "1970-01-01");
        assert_eq!(format_date_millis(-1).unwrap(), "1969-12-31");
        assert_eq!(format_date_millis(1_688_484_600_000).unwrap(), "2023-07-04");
        assert!(format_date_millis(i64::MAX).is_err());
    }

    #[test]
    fn test_format_date_is_deterministic() {
        let instant = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(format_date(&instant).unwrap(), format_date(&instant).unwrap());
    }

    #[test]
    fn test_parse_instant_rejects_garbage() {
        let err = parse_instant("2023-13-45").unwrap_err();
        assert!(matches!(err, UtilsError::InvalidInstant { .. }));
    }
}
