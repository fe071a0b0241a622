//! Value types shared by the `kepler` crates: geographic coordinates, screen points and edge
//! insets.

pub mod cartesian;
pub mod error;
pub mod geo;
mod insets;
mod lerp;

pub use cartesian::{Point2d, Vector2d};
pub use geo::LatLng;
pub use insets::EdgeInsets;
pub use lerp::Lerp;
