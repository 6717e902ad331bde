pub mod clone;
pub mod date;
pub mod logger;

pub use crate::domain::model::{ClonePolicy, CloneOptions};
pub use crate::domain::ports::{Clock, LineSink};
pub use crate::domain::value::PlainValue;
pub use crate::utils::error::Result;
