// Domain layer: models, geography table and the ports the run loop depends on.

pub mod geo;
pub mod model;
pub mod ports;
pub mod services;
