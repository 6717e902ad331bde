// Adapters layer: concrete clocks and line sinks behind the domain ports.

pub mod clock;
pub mod sink;
