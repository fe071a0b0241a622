//! Error types used by the crate.

use thiserror::Error;

use crate::camera::CameraProperty;
use crate::transition::TransitionId;

/// Kepler error type.
#[derive(Debug, Error, PartialEq)]
pub enum KeplerError {
    /// A [`CameraBehavior`](crate::behavior::CameraBehavior) resolved a collision with a
    /// transition that took no part in it.
    #[error(
        "behavior resolved collision of {current:?} and {interrupting:?} with unknown {returned:?}"
    )]
    UnsupportedResolution {
        /// Transition that was running.
        current: TransitionId,
        /// Transition that was submitted.
        interrupting: TransitionId,
        /// Identifier returned by the behavior.
        returned: TransitionId,
    },
    /// Property has no value of its own in a camera position, or is not a known property.
    #[error("invalid camera property: {0}")]
    InvalidProperty(String),
    /// Transition was asked for a frame value before it was started.
    #[error("transition {0:?} has not been started")]
    TransitionNotStarted(TransitionId),
    /// Interpolation produced a value that cannot be applied to the camera.
    #[error("transition of {property:?} produced a non-finite value")]
    NonFiniteValue {
        /// Animated property.
        property: CameraProperty,
    },
}
