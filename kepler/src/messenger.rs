use maybe_sync::{MaybeSend, MaybeSync};

/// Connection to the host event loop.
///
/// The controller asks for a new frame while transitions are running or queued, so that hosts
/// which only render on demand keep calling
/// [`MapCameraController::on_frame`](crate::controller::MapCameraController::on_frame).
pub trait Messenger: MaybeSend + MaybeSync {
    /// Requests another frame.
    fn request_redraw(&self);
}

/// Messenger that ignores all requests, for hosts that render continuously.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}
