// Domain layer: catalog model and the ports the store and service depend on.

pub mod model;
pub mod ports;
