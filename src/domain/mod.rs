// Domain layer: membership model, wire payloads and the HTTP port.

pub mod model;
pub mod ports;
pub mod wire;
