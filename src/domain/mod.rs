// Domain layer: models and ports. Adapters implement the ports against the runner.

pub mod model;
pub mod ports;
