use num_traits::Float;

/// Linear interpolation between two values of the same type.
///
/// `k = 0` must return `self` and `k = 1` must return `target`, every component is interpolated
/// independently.
pub trait Lerp: Sized {
    /// Returns the value at the fraction `k` of the way from `self` to `target`.
    fn lerp(&self, target: &Self, k: f64) -> Self;
}

pub(crate) fn lerp_float<N: Float>(from: N, to: N, k: N) -> N {
    from + (to - from) * k
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, k: f64) -> Self {
        lerp_float(*self, *target, k)
    }
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, k: f64) -> Self {
        lerp_float(*self, *target, k as f32)
    }
}
