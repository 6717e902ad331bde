use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Source of "now" for time-stamped output.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Destination for finished text lines.
///
/// Implementations append the line terminator themselves and must write each
/// line as a single unit, so that concurrent callers never split a line.
pub trait LineSink: Send + Sync {
    fn write_line(&self, line: &str) -> Result<()>;
}
