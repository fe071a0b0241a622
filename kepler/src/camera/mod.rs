//! Camera position and the properties a transition can animate.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use kepler_types::{EdgeInsets, LatLng};

use crate::error::KeplerError;
use crate::transition::TransitionValue;

mod sink;
mod update;

pub use sink::{CameraSink, MemoryCameraSink};
pub use update::CameraUpdate;

/// Minimum allowed tilt of the camera in degrees.
pub const MINIMUM_TILT: f64 = 0.0;
/// Maximum allowed tilt of the camera in degrees.
pub const MAXIMUM_TILT: f64 = 60.0;

/// Independently animated property of the camera.
///
/// The scheduler keeps at most one running transition per property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CameraProperty {
    /// Geographic point in the center of the viewport.
    Target,
    /// Zoom level.
    Zoom,
    /// Tilt of the camera.
    Pitch,
    /// Rotation of the map around the viewport center.
    Bearing,
    /// Screen anchor of zoom and rotation. It is not part of [`CameraPosition`].
    Anchor,
    /// Viewport padding.
    Padding,
}

impl CameraProperty {
    /// All properties in declaration order.
    pub const ALL: [CameraProperty; 6] = [
        CameraProperty::Target,
        CameraProperty::Zoom,
        CameraProperty::Pitch,
        CameraProperty::Bearing,
        CameraProperty::Anchor,
        CameraProperty::Padding,
    ];

    fn name(&self) -> &'static str {
        match self {
            CameraProperty::Target => "target",
            CameraProperty::Zoom => "zoom",
            CameraProperty::Pitch => "pitch",
            CameraProperty::Bearing => "bearing",
            CameraProperty::Anchor => "anchor",
            CameraProperty::Padding => "padding",
        }
    }
}

impl Display for CameraProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for CameraProperty {
    type Error = KeplerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| KeplerError::InvalidProperty(value.to_string()))
    }
}

impl FromStr for CameraProperty {
    type Err = KeplerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|property| property.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KeplerError::InvalidProperty(s.to_string()))
    }
}

/// Full description of the map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraPosition {
    target: LatLng,
    zoom: f64,
    tilt: f64,
    bearing: f64,
    padding: EdgeInsets,
}

impl CameraPosition {
    /// Starts building a position from the default one.
    pub fn builder() -> CameraPositionBuilder {
        CameraPositionBuilder::default()
    }

    /// Starts building a position from this one.
    pub fn to_builder(&self) -> CameraPositionBuilder {
        CameraPositionBuilder { position: *self }
    }

    /// Geographic point in the center of the viewport.
    pub fn target(&self) -> LatLng {
        self.target
    }

    /// Zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Tilt of the camera in degrees, `0` is looking straight down.
    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    /// Bearing in degrees in `[0, 360)`.
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    /// Viewport padding.
    pub fn padding(&self) -> EdgeInsets {
        self.padding
    }

    /// Returns the current value of the given property.
    ///
    /// Fails with [`KeplerError::InvalidProperty`] for [`CameraProperty::Anchor`], which is not
    /// stored in the position.
    pub fn value(&self, property: CameraProperty) -> Result<TransitionValue, KeplerError> {
        Ok(match property {
            CameraProperty::Target => TransitionValue::Target(self.target),
            CameraProperty::Zoom => TransitionValue::Zoom(self.zoom),
            CameraProperty::Pitch => TransitionValue::Pitch(self.tilt),
            CameraProperty::Bearing => TransitionValue::Bearing(self.bearing),
            CameraProperty::Padding => TransitionValue::Padding(self.padding),
            CameraProperty::Anchor => {
                return Err(KeplerError::InvalidProperty(property.to_string()))
            }
        })
    }
}

impl Display for CameraPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Target: {}, Zoom: {}, Bearing: {}, Tilt: {}",
            self.target, self.zoom, self.bearing, self.tilt
        )
    }
}

/// Builder of [`CameraPosition`].
///
/// Bearing is normalized into `[0, 360)` and tilt is clamped into
/// [`MINIMUM_TILT`]..=[`MAXIMUM_TILT`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraPositionBuilder {
    position: CameraPosition,
}

impl CameraPositionBuilder {
    /// Sets the target.
    pub fn target(mut self, target: LatLng) -> Self {
        self.position.target = target;
        self
    }

    /// Sets the zoom level.
    pub fn zoom(mut self, zoom: f64) -> Self {
        self.position.zoom = zoom;
        self
    }

    /// Sets the tilt in degrees.
    pub fn tilt(mut self, tilt: f64) -> Self {
        self.position.tilt = num_traits::clamp(tilt, MINIMUM_TILT, MAXIMUM_TILT);
        self
    }

    /// Sets the bearing in degrees.
    pub fn bearing(mut self, bearing: f64) -> Self {
        self.position.bearing = normalize_bearing(bearing);
        self
    }

    /// Sets the padding.
    pub fn padding(mut self, padding: EdgeInsets) -> Self {
        self.position.padding = padding;
        self
    }

    /// Sets the property the value belongs to.
    pub fn value(self, value: TransitionValue) -> Self {
        match value {
            TransitionValue::Target(target) => self.target(target),
            TransitionValue::Zoom(zoom) => self.zoom(zoom),
            TransitionValue::Pitch(tilt) => self.tilt(tilt),
            TransitionValue::Bearing(bearing) => self.bearing(bearing),
            TransitionValue::Padding(padding) => self.padding(padding),
        }
    }

    /// Creates the position.
    pub fn build(self) -> CameraPosition {
        self.position
    }
}

fn normalize_bearing(bearing: f64) -> f64 {
    if !bearing.is_finite() {
        return bearing;
    }

    let normalized = bearing.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
