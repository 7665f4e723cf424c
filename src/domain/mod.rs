// Domain layer: models and ports shared by core and adapters.

pub mod model;
pub mod ports;
