//! Fixtures shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use kepler_types::{LatLng, Point2d};

use crate::camera::{CameraPosition, CameraSink};
use crate::clock::ManualClock;
use crate::controller::MapCameraController;
use crate::dispatcher::CameraEventListener;
use crate::messenger::Messenger;
use crate::transition::{CancelableCallback, TransitionReason, TransitionValue};

pub const MS: u64 = 1_000_000;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
struct SinkState {
    position: Option<CameraPosition>,
    moves: usize,
}

/// Sink that can be inspected after it was moved into a controller.
///
/// Pixels are projected linearly: one pixel is `degrees_per_pixel` degrees, the screen origin is
/// at `(0, 0)` and the y axis points south.
#[derive(Clone, Default)]
pub struct SharedSink {
    state: Rc<RefCell<SinkState>>,
    degrees_per_pixel: f64,
}

impl SharedSink {
    pub fn new(position: CameraPosition) -> Self {
        let sink = Self {
            degrees_per_pixel: 0.1,
            ..Default::default()
        };
        sink.state.borrow_mut().position = Some(position);
        sink
    }

    pub fn not_ready() -> Self {
        Self {
            degrees_per_pixel: 0.1,
            ..Default::default()
        }
    }

    pub fn position(&self) -> CameraPosition {
        self.state
            .borrow()
            .position
            .expect("camera position is not set")
    }

    /// Changes the camera bypassing the controller, like the engine would do on its own.
    pub fn set_position(&self, position: CameraPosition) {
        self.state.borrow_mut().position = Some(position);
    }

    /// Makes the camera unavailable, like an engine that lost its surface.
    pub fn set_not_ready(&self) {
        self.state.borrow_mut().position = None;
    }

    pub fn moves(&self) -> usize {
        self.state.borrow().moves
    }
}

impl CameraSink for SharedSink {
    fn camera_position(&self) -> Option<CameraPosition> {
        self.state.borrow().position
    }

    fn move_camera(&mut self, position: CameraPosition) {
        let mut state = self.state.borrow_mut();
        state.position = Some(position);
        state.moves += 1;
    }

    fn lat_lng_for_pixel(&self, pixel: Point2d) -> Option<LatLng> {
        self.state.borrow().position?;
        Some(LatLng::new(
            -pixel.y * self.degrees_per_pixel,
            pixel.x * self.degrees_per_pixel,
        ))
    }
}

#[derive(Default)]
struct CallbackRecord {
    canceled: usize,
    finished: usize,
    progress: Vec<TransitionValue>,
}

/// Counts notifications of a transition. Clones share the counters.
#[derive(Clone, Default)]
pub struct RecordingCallback {
    record: Rc<RefCell<CallbackRecord>>,
    log: Option<(Rc<RefCell<Vec<String>>>, &'static str)>,
}

impl RecordingCallback {
    /// Callback that also writes `"<name> finished"`/`"<name> canceled"` into a shared log.
    pub fn logged(log: &Rc<RefCell<Vec<String>>>, name: &'static str) -> Self {
        Self {
            record: Default::default(),
            log: Some((log.clone(), name)),
        }
    }

    pub fn canceled(&self) -> usize {
        self.record.borrow().canceled
    }

    pub fn finished(&self) -> usize {
        self.record.borrow().finished
    }

    pub fn progress(&self) -> Vec<TransitionValue> {
        self.record.borrow().progress.clone()
    }

    fn write_log(&self, event: &str) {
        if let Some((log, name)) = &self.log {
            log.borrow_mut().push(format!("{name} {event}"));
        }
    }
}

impl CancelableCallback for RecordingCallback {
    fn on_cancel(&self) {
        self.record.borrow_mut().canceled += 1;
        self.write_log("canceled");
    }

    fn on_finish(&self) {
        self.record.borrow_mut().finished += 1;
        self.write_log("finished");
    }

    fn on_progress(&self, value: &TransitionValue) {
        self.record.borrow_mut().progress.push(*value);
    }
}

/// Records camera events as strings.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl EventRecorder {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl CameraEventListener for EventRecorder {
    fn on_move_started(&self, reason: TransitionReason) {
        self.events.borrow_mut().push(format!("started {reason:?}"));
    }

    fn on_move_canceled(&self) {
        self.events.borrow_mut().push("canceled".into());
    }

    fn on_idle(&self) {
        self.events.borrow_mut().push("idle".into());
    }
}

#[derive(Clone, Default)]
pub struct CountingMessenger {
    count: Arc<AtomicUsize>,
}

impl CountingMessenger {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl Messenger for CountingMessenger {
    fn request_redraw(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Counts camera changed notifications.
pub fn change_counter(controller: &MapCameraController) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    controller
        .dispatcher()
        .add_on_camera_changed_listener(move || counter.set(counter.get() + 1));
    count
}

/// Controller writing into a shared sink, with its first frame processed at time zero.
pub fn controller(position: CameraPosition) -> (MapCameraController, ManualClock, SharedSink) {
    init_logger();
    let clock = ManualClock::new(0);
    let sink = SharedSink::new(position);
    let mut controller = MapCameraController::new(sink.clone()).with_clock(clock.clone());
    controller.on_frame(0).expect("empty frame failed");
    (controller, clock, sink)
}
