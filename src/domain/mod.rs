// Domain layer: the portal data model and the ports the core needs from its surroundings.

pub mod model;
pub mod ports;
