//! User interaction with the camera.
//!
//! The host converts its input events into [`UserEvent`]s and gives them to a list of
//! [`UserEventHandler`]s. Handlers change the camera by submitting transitions to the
//! [`MapCameraController`]. [`CameraGestureController`] is the default handler, providing
//! panning, zooming, rotating and tilting with the mouse or touch.

use kepler_types::{Point2d, Vector2d};
use maybe_sync::{MaybeSend, MaybeSync};

use crate::controller::MapCameraController;

mod gesture;

pub use gesture::{CameraGestureController, GestureConfiguration};

/// User input handler.
pub trait UserEventHandler {
    /// Handle the event.
    fn handle(&self, event: &UserEvent, controller: &mut MapCameraController)
        -> EventPropagation;
}

impl<T: for<'a> Fn(&'a UserEvent, &'a mut MapCameraController) -> EventPropagation>
    UserEventHandler for T
where
    T: MaybeSync + MaybeSend,
{
    fn handle(
        &self,
        event: &UserEvent,
        controller: &mut MapCameraController,
    ) -> EventPropagation {
        self(event, controller)
    }
}

/// User interaction event.
#[derive(Debug, Clone)]
pub enum UserEvent {
    /// A double click was done.
    DoubleClick(MouseButton, MouseEvent),

    /// Drag started (user pressed a mouse button and moves the pointer around without releasing
    /// the button).
    ///
    /// This event is also fired when a single-finger touch is moved around.
    DragStarted(MouseButton, MouseEvent),

    /// Pointer moved while dragging. The vector is the move since the previous event in pixels.
    Drag(MouseButton, Vector2d, MouseEvent),

    /// Mouse button was released while dragging.
    DragEnded(MouseButton, MouseEvent),

    /// Scroll event. The number is the number of text lines the scroll is requested for. Positive
    /// values zoom in.
    Scroll(f64, MouseEvent),

    /// Multi-touch zoom around a point. The first parameter is the factor the visible area is
    /// scaled by: values below `1.0` zoom in.
    Zoom(f64, Point2d),
}

/// Value returned by an [`UserEventHandler`] to indicate the status of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPropagation {
    /// Event should be propagated to the next handler.
    Propagate,
    /// Event should not be propagated to the next handler.
    Stop,
    /// Event should not be propagated to the next handler, and the current handler takes
    /// ownership of the gesture, e.g. of all drag events following [`UserEvent::DragStarted`].
    Consume,
}

/// Mouse button enum.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button, or a single-finger touch.
    Left,
    /// Wheel button.
    Middle,
    /// Secondary button.
    Right,
    /// Any other button.
    Other,
}

/// State of the pointer at the moment of the event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Pointer position on the screen in pixels from the top-left corner.
    pub screen_pointer_position: Point2d,
}

impl MouseEvent {
    /// Creates an event at the given screen position.
    pub fn new(screen_pointer_position: Point2d) -> Self {
        Self {
            screen_pointer_position,
        }
    }
}
