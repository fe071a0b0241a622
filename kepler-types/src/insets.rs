use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::error::KeplerTypesError;
use crate::lerp::{lerp_float, Lerp};

/// Padding of the map viewport in pixels.
///
/// Padding moves the visual center of the map away from the center of the map surface. The
/// components are stored in `[left, top, right, bottom]` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct EdgeInsets {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl EdgeInsets {
    /// No padding.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates new insets.
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same padding on every side.
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Left padding.
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Top padding.
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Right padding.
    pub fn right(&self) -> f64 {
        self.right
    }

    /// Bottom padding.
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Components in `[left, top, right, bottom]` order.
    pub fn to_array(&self) -> [f64; 4] {
        [self.left, self.top, self.right, self.bottom]
    }

    /// Returns `true` if all components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

impl From<[f64; 4]> for EdgeInsets {
    fn from([left, top, right, bottom]: [f64; 4]) -> Self {
        Self::new(left, top, right, bottom)
    }
}

impl TryFrom<&[f64]> for EdgeInsets {
    type Error = KeplerTypesError;

    fn try_from(value: &[f64]) -> Result<Self, Self::Error> {
        let components: [f64; 4] = value
            .try_into()
            .map_err(|_| KeplerTypesError::InsetsLength(value.len()))?;
        Ok(components.into())
    }
}

impl Lerp for EdgeInsets {
    fn lerp(&self, target: &Self, k: f64) -> Self {
        Self {
            left: lerp_float(self.left, target.left, k),
            top: lerp_float(self.top, target.top, k),
            right: lerp_float(self.right, target.right, k),
            bottom: lerp_float(self.bottom, target.bottom, k),
        }
    }
}

impl AbsDiffEq for EdgeInsets {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn from_slice() {
        let insets = EdgeInsets::try_from(&[1.0, 2.0, 3.0, 4.0][..]).expect("valid slice");
        assert_eq!(insets, EdgeInsets::new(1.0, 2.0, 3.0, 4.0));

        assert_eq!(
            EdgeInsets::try_from(&[1.0, 2.0][..]),
            Err(KeplerTypesError::InsetsLength(2))
        );
    }

    #[test]
    fn lerp_is_per_component() {
        let to = EdgeInsets::new(10.0, 20.0, 10.0, 20.0);
        assert_abs_diff_eq!(
            EdgeInsets::ZERO.lerp(&to, 0.25),
            EdgeInsets::new(2.5, 5.0, 2.5, 5.0)
        );
    }
}
