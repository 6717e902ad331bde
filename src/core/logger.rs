use crate::adapters::clock::SystemClock;
use crate::adapters::sink::StdoutSink;
use crate::core::date::format_date;
use crate::domain::ports::{Clock, LineSink};
use crate::utils::error::Result;

pub fn format_log_line(date: &str, message: &str) -> String {
    format!("[{}] {}", date, message)
}

/// Writes `[YYYY-MM-DD] <message>` lines, dated by `clock`, to `sink`.
pub struct MessageLogger<C: Clock, S: LineSink> {
    clock: C,
    sink: S,
}

impl<C: Clock, S: LineSink> MessageLogger<C, S> {
    pub fn new(clock: C, sink: S) -> Self {
        Self { clock, sink }
    }

    /// Writes exactly one line. The message is not escaped or trimmed.
    pub fn log(&self, message: &str) -> Result<()> {
        let date = format_date(&self.clock.now())?;
        self.sink.write_line(&format_log_line(&date, message))
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl Default for MessageLogger<SystemClock, StdoutSink> {
    fn default() -> Self {
        Self::new(SystemClock, StdoutSink)
    }
}

/// Logs `message` to stdout with today's UTC date.
pub fn log_message(message: &str) -> Result<()> {
    MessageLogger::default().log(message)
}
