// Domain layer: specimen model, ports and the pure view-state machines.

pub mod carousel;
pub mod lightbox;
pub mod model;
pub mod ports;
pub mod route;
