// Domain layer: core models and ports (interfaces). No network or markup code here.

pub mod model;
pub mod ports;
pub mod roster;
