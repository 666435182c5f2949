// Domain layer: flow table models, category vocabulary and ports (interfaces).

pub mod model;
pub mod ports;
pub mod vocabulary;
