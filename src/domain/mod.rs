// Domain layer: Firehose batch model and the ports the transform runs against.

pub mod model;
pub mod ports;
