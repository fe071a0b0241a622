//! Screen space types.
//!
//! Screen positions are measured in pixels from the top-left corner of the map surface.

pub use nalgebra::{Point2, Vector2};

/// Point on the screen in pixels.
pub type Point2d = Point2<f64>;

/// Difference between two screen points in pixels.
pub type Vector2d = Vector2<f64>;
