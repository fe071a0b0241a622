//! Kepler schedules animated changes of an interactive map camera.
//!
//! The camera has several independent properties: [`target`](camera::CameraProperty::Target),
//! [`zoom`](camera::CameraProperty::Zoom), [`pitch`](camera::CameraProperty::Pitch),
//! [`bearing`](camera::CameraProperty::Bearing) and [`padding`](camera::CameraProperty::Padding).
//! Every change of a property is a [`CameraTransition`], and the [`MapCameraController`] keeps
//! at most one running transition per property plus a queue of transitions waiting for it.
//!
//! # Main components
//!
//! * [`MapCameraController`] owns the transitions and advances them once per displayed frame,
//!   writing all property values into the [`CameraSink`] as one [`CameraPosition`].
//! * [`CameraBehavior`] decides what happens when transitions collide. The default
//!   [`GesturePreemptingBehavior`] lets user gestures take the camera over from application
//!   animations.
//! * [`CameraChangeDispatcher`](dispatcher::CameraChangeDispatcher) notifies listeners once per
//!   frame in which the camera moved, and when the camera starts or stops moving.
//! * [`control`] converts user input into gesture transitions.
//!
//! # Frame loop
//!
//! The host creates a controller around its camera, submits transitions and calls
//! [`MapCameraController::on_frame`] with the frame time:
//!
//! ```no_run
//! use std::time::Duration;
//! use kepler::{CameraPosition, CameraTransition, MapCameraController, MemoryCameraSink, TransitionReason};
//!
//! let mut controller = MapCameraController::new(MemoryCameraSink::new(CameraPosition::default()));
//! controller
//!     .start_transition(CameraTransition::zoom(
//!         TransitionReason::ApiAnimation,
//!         14.0,
//!         Duration::from_millis(300),
//!     ))
//!     .expect("default behavior never fails");
//!
//! while !controller.is_idle() {
//!     controller.tick().expect("invalid transition value");
//! }
//! ```
//!
//! All controller methods are expected to be called from the thread that renders the map.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod behavior;
pub mod camera;
pub mod clock;
pub mod control;
pub mod controller;
pub mod dispatcher;
pub mod error;
mod messenger;
pub mod transition;

#[cfg(test)]
mod tests;

pub use behavior::{CameraBehavior, GesturePreemptingBehavior};
pub use camera::{CameraPosition, CameraProperty, CameraSink, CameraUpdate, MemoryCameraSink};
pub use controller::MapCameraController;
pub use error::KeplerError;
pub use messenger::{DummyMessenger, Messenger};
pub use transition::{
    CameraTransition, CancelableCallback, TransitionHandle, TransitionReason, TransitionValue,
};

// Reexport kepler_types
pub use kepler_types;
