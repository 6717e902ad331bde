pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::UtilsConfig;

pub use adapters::{
    clock::{FixedClock, SystemClock},
    sink::{MemorySink, StdoutSink, WriterSink},
};
pub use crate::core::{
    clone::{deep_clone, deep_clone_serde, deep_clone_text, deep_clone_with},
    date::{format_date, format_date_millis, parse_instant},
    logger::{format_log_line, log_message, MessageLogger},
};
pub use domain::{
    model::{ClonePolicy, CloneOptions},
    ports::{Clock, LineSink},
    value::PlainValue,
};
pub use utils::error::{Result, UtilsError};
