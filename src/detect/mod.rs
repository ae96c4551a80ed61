mod set;

pub use set::{BoundingBox, DetectionSet};
