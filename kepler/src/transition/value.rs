use kepler_types::{EdgeInsets, LatLng, Lerp};

use crate::camera::{CameraPosition, CameraProperty};

/// Value of a single animated camera property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionValue {
    /// Center of the viewport.
    Target(LatLng),
    /// Zoom level.
    Zoom(f64),
    /// Tilt in degrees.
    Pitch(f64),
    /// Bearing in degrees.
    Bearing(f64),
    /// Viewport padding.
    Padding(EdgeInsets),
}

impl TransitionValue {
    /// Property this value belongs to.
    pub fn property(&self) -> CameraProperty {
        match self {
            TransitionValue::Target(_) => CameraProperty::Target,
            TransitionValue::Zoom(_) => CameraProperty::Zoom,
            TransitionValue::Pitch(_) => CameraProperty::Pitch,
            TransitionValue::Bearing(_) => CameraProperty::Bearing,
            TransitionValue::Padding(_) => CameraProperty::Padding,
        }
    }

    /// Returns `true` if every component is a finite number.
    pub fn is_finite(&self) -> bool {
        match self {
            TransitionValue::Target(v) => v.is_finite(),
            TransitionValue::Zoom(v) | TransitionValue::Pitch(v) | TransitionValue::Bearing(v) => {
                v.is_finite()
            }
            TransitionValue::Padding(v) => v.is_finite(),
        }
    }
}

/// Start and end values of one animated property.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Animated<T> {
    start: Option<T>,
    end: T,
}

impl<T: Lerp + Copy> Animated<T> {
    fn new(end: T) -> Self {
        Self { start: None, end }
    }

    fn at(&self, k: f64) -> Option<T> {
        Some(self.start?.lerp(&self.end, k))
    }
}

/// Closed set of animations, one variant per animated property.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TransitionKind {
    Target(Animated<LatLng>),
    Zoom(Animated<f64>),
    Pitch(Animated<f64>),
    Bearing(Animated<f64>),
    Padding(Animated<EdgeInsets>),
}

impl TransitionKind {
    pub(crate) fn new(end: TransitionValue) -> Self {
        match end {
            TransitionValue::Target(v) => Self::Target(Animated::new(v)),
            TransitionValue::Zoom(v) => Self::Zoom(Animated::new(v)),
            TransitionValue::Pitch(v) => Self::Pitch(Animated::new(v)),
            TransitionValue::Bearing(v) => Self::Bearing(Animated::new(v)),
            TransitionValue::Padding(v) => Self::Padding(Animated::new(v)),
        }
    }

    pub(crate) fn end(&self) -> TransitionValue {
        match self {
            Self::Target(a) => TransitionValue::Target(a.end),
            Self::Zoom(a) => TransitionValue::Zoom(a.end),
            Self::Pitch(a) => TransitionValue::Pitch(a.end),
            Self::Bearing(a) => TransitionValue::Bearing(a.end),
            Self::Padding(a) => TransitionValue::Padding(a.end),
        }
    }

    pub(crate) fn start(&self) -> Option<TransitionValue> {
        Some(match self {
            Self::Target(a) => TransitionValue::Target(a.start?),
            Self::Zoom(a) => TransitionValue::Zoom(a.start?),
            Self::Pitch(a) => TransitionValue::Pitch(a.start?),
            Self::Bearing(a) => TransitionValue::Bearing(a.start?),
            Self::Padding(a) => TransitionValue::Padding(a.start?),
        })
    }

    /// Takes the start value from the camera position.
    pub(crate) fn set_start(&mut self, position: &CameraPosition) {
        match self {
            Self::Target(a) => a.start = Some(position.target()),
            Self::Zoom(a) => a.start = Some(position.zoom()),
            Self::Pitch(a) => a.start = Some(position.tilt()),
            Self::Bearing(a) => a.start = Some(position.bearing()),
            Self::Padding(a) => a.start = Some(position.padding()),
        }
    }

    pub(crate) fn at(&self, k: f64) -> Option<TransitionValue> {
        Some(match self {
            Self::Target(a) => TransitionValue::Target(a.at(k)?),
            Self::Zoom(a) => TransitionValue::Zoom(a.at(k)?),
            Self::Pitch(a) => TransitionValue::Pitch(a.at(k)?),
            Self::Bearing(a) => TransitionValue::Bearing(a.at(k)?),
            Self::Padding(a) => TransitionValue::Padding(a.at(k)?),
        })
    }
}
