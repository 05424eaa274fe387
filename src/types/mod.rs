mod bounding_box;
mod enums;
mod point;
mod segment;
mod waypoint;

pub use bounding_box::*;
pub use enums::*;
pub use point::*;
pub use segment::*;
pub use waypoint::*;
