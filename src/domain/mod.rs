// Domain layer: binding models and the ports to the broker and the runtime error handler.

pub mod model;
pub mod ports;
