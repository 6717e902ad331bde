// Domain layer: value model, clone settings and ports. Concrete clocks and sinks live in adapters.

pub mod model;
pub mod ports;
pub mod value;
