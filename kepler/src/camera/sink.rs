use kepler_types::{LatLng, Point2d};

use crate::camera::CameraPosition;

/// Boundary to the rendering engine that owns the live camera state.
///
/// The scheduler reads a snapshot of the camera before starting a transition and writes one
/// composite position per frame. Projection between screen and geographic coordinates belongs
/// to the engine too.
pub trait CameraSink {
    /// Current camera position, or `None` if the engine has no valid position yet.
    fn camera_position(&self) -> Option<CameraPosition>;

    /// Replaces the camera position.
    fn move_camera(&mut self, position: CameraPosition);

    /// Geographic point displayed at the given screen pixel.
    fn lat_lng_for_pixel(&self, _pixel: Point2d) -> Option<LatLng> {
        None
    }
}

/// Camera sink that only stores the last position it was given.
///
/// Useful for hosts that render from the stored position themselves, and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCameraSink {
    position: Option<CameraPosition>,
    moves: usize,
}

impl MemoryCameraSink {
    /// Creates a sink with the given initial position.
    pub fn new(position: CameraPosition) -> Self {
        Self {
            position: Some(position),
            moves: 0,
        }
    }

    /// Creates a sink that reports no position until the first
    /// [`move_camera`](CameraSink::move_camera) call.
    pub fn not_ready() -> Self {
        Self::default()
    }

    /// Number of times the camera was moved.
    pub fn moves(&self) -> usize {
        self.moves
    }
}

impl CameraSink for MemoryCameraSink {
    fn camera_position(&self) -> Option<CameraPosition> {
        self.position
    }

    fn move_camera(&mut self, position: CameraPosition) {
        self.position = Some(position);
        self.moves += 1;
    }
}
