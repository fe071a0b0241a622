//! Policies arbitrating between camera transitions.

use crate::controller::MapCameraController;
use crate::transition::{CameraTransition, TransitionId, TransitionReason};

/// Policy consulted by [`MapCameraController`] when a transition is submitted.
pub trait CameraBehavior {
    /// Called once for every submitted transition, before the controller decides whether it runs
    /// or waits in the queue.
    ///
    /// The behavior can cancel other transitions of the controller here. Queued transitions
    /// canceled by this call are removed right after it returns.
    fn animation_started(&self, controller: &MapCameraController, transition: &CameraTransition);

    /// Called when `interrupting` is submitted while `current` runs for the same property.
    ///
    /// Must return the id of the transition that wins: the id of `interrupting` cancels `current`
    /// and makes `interrupting` the next transition to run, the id of `current` cancels
    /// `interrupting`. Any other id is reported as
    /// [`KeplerError::UnsupportedResolution`](crate::error::KeplerError::UnsupportedResolution).
    fn resolve(&self, current: &CameraTransition, interrupting: &CameraTransition)
        -> TransitionId;
}

/// Default behavior: user gestures take over the camera.
///
/// A gesture transition cancels every running and queued transition of any property that was not
/// caused by a gesture. Collisions on the same property are always won by the newer transition.
#[derive(Debug, Default, Clone, Copy)]
pub struct GesturePreemptingBehavior;

impl CameraBehavior for GesturePreemptingBehavior {
    fn animation_started(&self, controller: &MapCameraController, transition: &CameraTransition) {
        if transition.reason() != TransitionReason::Gesture {
            return;
        }

        for other in controller
            .running_transitions()
            .chain(controller.queued_transitions())
        {
            if other.id() != transition.id() && other.reason() != TransitionReason::Gesture {
                log::debug!(
                    "Gesture transition {:?} preempts {:?} of {}",
                    transition.id(),
                    other.id(),
                    other.property()
                );
                other.cancel();
            }
        }
    }

    fn resolve(
        &self,
        _current: &CameraTransition,
        interrupting: &CameraTransition,
    ) -> TransitionId {
        interrupting.id()
    }
}
