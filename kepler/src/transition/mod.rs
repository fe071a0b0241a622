//! Transitions describe a time-bounded animation of exactly one camera property.
//!
//! A transition is created by a caller (a gesture handler or the application) and handed over to
//! the [`MapCameraController`](crate::controller::MapCameraController), which decides when it
//! starts, advances it on every frame and notifies its [`CancelableCallback`] once it is finished
//! or canceled. A [`TransitionHandle`] can be taken before submission to cancel the transition
//! later.

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kepler_types::{EdgeInsets, LatLng};

use crate::camera::{CameraPosition, CameraProperty};
use crate::error::KeplerError;

mod easing;
mod value;

pub use easing::Easing;
pub use value::TransitionValue;
use value::TransitionKind;

static NEXT_TRANSITION_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

impl TransitionId {
    fn next() -> Self {
        Self(NEXT_TRANSITION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Provenance of a transition. Used by [`CameraBehavior`](crate::behavior::CameraBehavior) to
/// arbitrate collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionReason {
    /// Unspecified.
    #[default]
    Any,
    /// Direct user interaction with the map.
    Gesture,
    /// Animation requested by the application in response to a user action.
    ApiGesture,
    /// Animation requested by the application.
    ApiAnimation,
    /// Camera following the device location.
    Location,
}

/// Receives the outcome of a single transition.
pub trait CancelableCallback {
    /// Transition was canceled before it reached its end value.
    fn on_cancel(&self);
    /// Transition reached its end value.
    fn on_finish(&self);
    /// A value of the transition was applied to the camera.
    fn on_progress(&self, _value: &TransitionValue) {}
}

/// Cancellation handle of a submitted transition.
#[derive(Debug, Clone)]
pub struct TransitionHandle {
    id: TransitionId,
    property: CameraProperty,
    canceled: Arc<AtomicBool>,
}

impl TransitionHandle {
    /// Identifier of the transition.
    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Animated property.
    pub fn property(&self) -> CameraProperty {
        self.property
    }

    /// Requests cancellation of the transition. See [`CameraTransition::cancel`].
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Release);
    }

    /// Returns `true` if the transition was canceled.
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }
}

/// Animation of one camera property from its value at start time to an end value.
pub struct CameraTransition {
    id: TransitionId,
    reason: TransitionReason,
    kind: TransitionKind,
    easing: Easing,
    duration_nanos: u64,
    delay_nanos: u64,
    start_time_nanos: Option<u64>,
    end_time_nanos: Option<u64>,
    canceled: Arc<AtomicBool>,
    finishing: bool,
    callback: Option<Box<dyn CancelableCallback>>,
}

impl CameraTransition {
    /// Creates a new transition to `end_value`.
    ///
    /// The start value and start time are not known until the transition is started by the
    /// controller. The delay is counted from that moment, not from the submission.
    pub fn new(
        reason: TransitionReason,
        duration: Duration,
        delay: Duration,
        end_value: TransitionValue,
    ) -> Self {
        Self {
            id: TransitionId::next(),
            reason,
            kind: TransitionKind::new(end_value),
            easing: Easing::default(),
            duration_nanos: as_nanos(duration),
            delay_nanos: as_nanos(delay),
            start_time_nanos: None,
            end_time_nanos: None,
            canceled: Arc::new(AtomicBool::new(false)),
            finishing: false,
            callback: None,
        }
    }

    /// Transition of the camera target.
    pub fn target(reason: TransitionReason, target: LatLng, duration: Duration) -> Self {
        Self::new(
            reason,
            duration,
            Duration::ZERO,
            TransitionValue::Target(target),
        )
    }

    /// Transition of the zoom level.
    pub fn zoom(reason: TransitionReason, zoom: f64, duration: Duration) -> Self {
        Self::new(reason, duration, Duration::ZERO, TransitionValue::Zoom(zoom))
    }

    /// Transition of the camera tilt.
    pub fn pitch(reason: TransitionReason, pitch: f64, duration: Duration) -> Self {
        Self::new(reason, duration, Duration::ZERO, TransitionValue::Pitch(pitch))
    }

    /// Transition of the bearing.
    pub fn bearing(reason: TransitionReason, bearing: f64, duration: Duration) -> Self {
        Self::new(
            reason,
            duration,
            Duration::ZERO,
            TransitionValue::Bearing(bearing),
        )
    }

    /// Transition of the viewport padding.
    pub fn padding(reason: TransitionReason, padding: EdgeInsets, duration: Duration) -> Self {
        Self::new(
            reason,
            duration,
            Duration::ZERO,
            TransitionValue::Padding(padding),
        )
    }

    /// Sets the delay between the start of the transition and the first change of the value.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_nanos = as_nanos(delay);
        self
    }

    /// Sets the easing of the transition.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Sets the callback notified when the transition is finished or canceled.
    pub fn with_callback(mut self, callback: impl CancelableCallback + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Identifier of the transition.
    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Returns a handle that can cancel the transition after it was submitted.
    pub fn handle(&self) -> TransitionHandle {
        TransitionHandle {
            id: self.id,
            property: self.property(),
            canceled: self.canceled.clone(),
        }
    }

    /// Provenance of the transition.
    pub fn reason(&self) -> TransitionReason {
        self.reason
    }

    /// Animated property.
    pub fn property(&self) -> CameraProperty {
        self.kind.end().property()
    }

    /// Easing of the transition.
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Value at the start of the transition, known once it is started.
    pub fn start_value(&self) -> Option<TransitionValue> {
        self.kind.start()
    }

    /// Value the transition ends with.
    pub fn end_value(&self) -> TransitionValue {
        self.kind.end()
    }

    /// Duration of the transition in nanoseconds.
    pub fn duration_nanos(&self) -> u64 {
        self.duration_nanos
    }

    /// Delay of the transition in nanoseconds.
    pub fn delay_nanos(&self) -> u64 {
        self.delay_nanos
    }

    /// Time of the first frame of the transition, known once it is started.
    pub fn start_time_nanos(&self) -> Option<u64> {
        self.start_time_nanos
    }

    /// Time the transition reaches its end value, known once it is started.
    pub fn end_time_nanos(&self) -> Option<u64> {
        self.end_time_nanos
    }

    /// Requests cancellation.
    ///
    /// The flag is only read by the controller: a running transition is removed on the next
    /// frame, the value already applied to the camera stays. Calling it again has no effect.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Release);
    }

    /// Returns `true` if the transition was canceled.
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }

    /// Returns `true` once the frame time reached the end time. The end value is applied verbatim
    /// in that frame.
    pub fn is_finishing(&self) -> bool {
        self.finishing
    }

    /// Starts the transition: takes the start value from `position` and sets the start time to
    /// `now_nanos` plus the delay.
    pub fn start(&mut self, position: &CameraPosition, now_nanos: u64) {
        self.kind.set_start(position);
        let start = now_nanos.saturating_add(self.delay_nanos);
        self.start_time_nanos = Some(start);
        self.end_time_nanos = Some(start.saturating_add(self.duration_nanos));
        self.finishing = false;
    }

    /// Interpolated value at the given time.
    ///
    /// Fails if the transition has not been started or the interpolation does not produce a
    /// finite value.
    pub fn on_frame(&self, now_nanos: u64) -> Result<TransitionValue, KeplerError> {
        let start = self
            .start_time_nanos
            .ok_or(KeplerError::TransitionNotStarted(self.id))?;
        let fraction = if self.duration_nanos == 0 {
            1.0
        } else {
            (now_nanos.saturating_sub(start) as f64 / self.duration_nanos as f64).min(1.0)
        };

        let value = self
            .kind
            .at(self.easing.apply(fraction))
            .ok_or(KeplerError::TransitionNotStarted(self.id))?;

        if !value.is_finite() {
            return Err(KeplerError::NonFiniteValue {
                property: self.property(),
            });
        }

        Ok(value)
    }

    /// End value, checked like interpolated values.
    pub(crate) fn final_value(&self) -> Result<TransitionValue, KeplerError> {
        let value = self.end_value();
        if !value.is_finite() {
            return Err(KeplerError::NonFiniteValue {
                property: self.property(),
            });
        }

        Ok(value)
    }

    pub(crate) fn is_active_at(&self, now_nanos: u64) -> bool {
        self.start_time_nanos
            .is_some_and(|start| start <= now_nanos)
    }

    pub(crate) fn update_finishing(&mut self, now_nanos: u64) {
        if self.end_time_nanos.is_some_and(|end| now_nanos >= end) {
            self.finishing = true;
        }
    }

    pub(crate) fn notify_progress(&self, value: &TransitionValue) {
        if let Some(callback) = &self.callback {
            callback.on_progress(value);
        }
    }

    pub(crate) fn notify_canceled(mut self) {
        self.cancel();
        if let Some(callback) = self.callback.take() {
            callback.on_cancel();
        }
    }

    pub(crate) fn notify_finished(mut self) {
        if let Some(callback) = self.callback.take() {
            callback.on_finish();
        }
    }
}

impl Debug for CameraTransition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraTransition")
            .field("id", &self.id)
            .field("reason", &self.reason)
            .field("start", &self.start_value())
            .field("end", &self.end_value())
            .field("start_time_nanos", &self.start_time_nanos)
            .field("duration_nanos", &self.duration_nanos)
            .field("canceled", &self.is_canceled())
            .field("finishing", &self.finishing)
            .finish()
    }
}

fn as_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
