//! Scheduler of camera transitions.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use crate::behavior::{CameraBehavior, GesturePreemptingBehavior};
use crate::camera::{CameraPosition, CameraProperty, CameraSink, CameraUpdate};
use crate::clock::{Clock, SystemClock};
use crate::dispatcher::CameraChangeDispatcher;
use crate::error::KeplerError;
use crate::messenger::Messenger;
use crate::transition::{CameraTransition, TransitionHandle, TransitionReason};


/// Owns the running and queued transitions of every camera property and advances them on every
/// frame.
///
/// For each [`CameraProperty`] there is at most one running transition and a queue of transitions
/// waiting for it to end. Transitions appended with
/// [`queue_transition`](Self::queue_transition) run in submission order, while a transition that
/// interrupts a running one through [`start_transition`](Self::start_transition) is put in front
/// of the queue and runs next.
///
/// The host calls [`on_frame`](Self::on_frame) (or [`tick`](Self::tick)) once per displayed
/// frame. Frame timestamps are the only time base: a transition submitted between frames starts
/// at the time of the latest frame, and transitions submitted before the first frame start with
/// it. A frame is processed in three sweeps:
/// 1. canceled running transitions are removed and their successors are started,
/// 2. every running transition computes its value, and all values are written into the camera
///    sink as one position,
/// 3. transitions that reached their end are removed and their successors are started.
///
/// All methods are expected to be called from one thread.
pub struct MapCameraController {
    sink: Box<dyn CameraSink>,
    clock: Box<dyn Clock>,
    behavior: Box<dyn CameraBehavior>,
    messenger: Option<Box<dyn Messenger>>,
    dispatcher: CameraChangeDispatcher,
    running: BTreeMap<CameraProperty, CameraTransition>,
    queued: BTreeMap<CameraProperty, VecDeque<CameraTransition>>,
    frame_time_nanos: Option<u64>,
    is_moving: bool,
}

impl MapCameraController {
    /// Creates a new controller writing into the given sink, using the wall clock and
    /// [`GesturePreemptingBehavior`].
    pub fn new(sink: impl CameraSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            clock: Box::new(SystemClock::default()),
            behavior: Box::new(GesturePreemptingBehavior),
            messenger: None,
            dispatcher: CameraChangeDispatcher::default(),
            running: BTreeMap::new(),
            queued: BTreeMap::new(),
            frame_time_nanos: None,
            is_moving: false,
        }
    }

    /// Replaces the clock [`tick`](Self::tick) reads frame times from.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the transition behavior.
    pub fn with_behavior(mut self, behavior: impl CameraBehavior + 'static) -> Self {
        self.set_behavior(behavior);
        self
    }

    /// Replaces the transition behavior. Transitions already submitted are not affected.
    pub fn set_behavior(&mut self, behavior: impl CameraBehavior + 'static) {
        self.behavior = Box::new(behavior);
    }

    /// Sets the messenger used to request new frames.
    pub fn set_messenger(&mut self, messenger: Option<impl Messenger + 'static>) {
        self.messenger = messenger.map(|m| Box::new(m) as Box<dyn Messenger>);
    }

    /// Dispatcher of camera notifications.
    pub fn dispatcher(&self) -> &CameraChangeDispatcher {
        &self.dispatcher
    }

    /// Camera sink the controller writes into.
    pub fn sink(&self) -> &dyn CameraSink {
        self.sink.as_ref()
    }

    /// Current camera position, `None` if the sink is not ready yet.
    pub fn camera_position(&self) -> Option<CameraPosition> {
        self.sink.camera_position()
    }

    /// Transition currently running for the property.
    pub fn running_transition(&self, property: CameraProperty) -> Option<&CameraTransition> {
        self.running.get(&property)
    }

    /// All running transitions.
    pub fn running_transitions(&self) -> impl Iterator<Item = &CameraTransition> {
        self.running.values()
    }

    /// All queued transitions, property by property, each property in running order.
    pub fn queued_transitions(&self) -> impl Iterator<Item = &CameraTransition> {
        self.queued.values().flatten()
    }

    /// Queued transitions of the property in running order.
    pub fn queued_transitions_of(
        &self,
        property: CameraProperty,
    ) -> impl Iterator<Item = &CameraTransition> {
        self.queued.get(&property).into_iter().flatten()
    }

    /// Time of the latest processed frame.
    pub fn frame_time_nanos(&self) -> Option<u64> {
        self.frame_time_nanos
    }

    /// Returns `true` if no transitions are running or queued.
    pub fn is_idle(&self) -> bool {
        self.running.is_empty() && self.queued.values().all(VecDeque::is_empty)
    }

    /// Submits a transition, interrupting the running transition of the same property if the
    /// behavior decides so.
    ///
    /// If nothing runs for the property, the transition starts right away from the current
    /// camera value, timed from the latest frame. Fails only if the behavior violates its resolution contract.
    pub fn start_transition(
        &mut self,
        transition: CameraTransition,
    ) -> Result<TransitionHandle, KeplerError> {
        let handle = transition.handle();

        self.behavior.animation_started(self, &transition);
        self.evict_canceled_queued();

        let property = transition.property();
        let resolution = self
            .running
            .get(&property)
            .map(|current| (current.id(), self.behavior.resolve(current, &transition)));

        match resolution {
            None => self.install(transition),
            Some((current, winner)) if winner == transition.id() => {
                log::debug!(
                    "Transition {:?} of {property} interrupts {current:?}",
                    transition.id()
                );
                if let Some(current) = self.running.get(&property) {
                    current.cancel();
                }
                self.queued
                    .entry(property)
                    .or_default()
                    .push_front(transition);
            }
            Some((current, winner)) if winner == current => {
                log::debug!(
                    "Transition {:?} of {property} is rejected in favor of {current:?}",
                    transition.id()
                );
                transition.notify_canceled();
            }
            Some((current, returned)) => {
                let interrupting = transition.id();
                transition.notify_canceled();
                return Err(KeplerError::UnsupportedResolution {
                    current,
                    interrupting,
                    returned,
                });
            }
        }

        self.request_redraw();
        Ok(handle)
    }

    /// Appends a transition to the queue of its property.
    ///
    /// If nothing runs or waits for the property, this is the same as
    /// [`start_transition`](Self::start_transition). Otherwise the transition waits for all
    /// transitions submitted before it, and the behavior is not consulted.
    pub fn queue_transition(
        &mut self,
        transition: CameraTransition,
    ) -> Result<TransitionHandle, KeplerError> {
        let property = transition.property();
        let is_free = !self.running.contains_key(&property)
            && self.queued.get(&property).map_or(true, VecDeque::is_empty);
        if is_free {
            return self.start_transition(transition);
        }

        let handle = transition.handle();
        log::trace!("Transition {:?} of {property} is queued", transition.id());
        self.queued.entry(property).or_default().push_back(transition);
        self.request_redraw();

        Ok(handle)
    }

    /// Cancels all queued transitions. Their callbacks are notified immediately.
    pub fn cancel_queued_transitions(&mut self) {
        let queued = std::mem::take(&mut self.queued);
        for transition in queued.into_values().flatten() {
            transition.notify_canceled();
        }

        self.update_idle();
    }

    /// Cancels all running transitions. Their callbacks are notified immediately and the next
    /// queued transition of every property is started.
    pub fn cancel_running_transitions(&mut self) {
        let running = std::mem::take(&mut self.running);
        for (property, transition) in running {
            transition.notify_canceled();
            self.dispatcher.move_canceled();
            self.promote(property);
        }

        self.update_idle();
    }

    /// Cancels all running and queued transitions.
    pub fn cancel_all_transitions(&mut self) {
        self.cancel_queued_transitions();
        self.cancel_running_transitions();
    }

    /// Animates every property changed by the update over `duration`.
    pub fn ease_camera(
        &mut self,
        update: CameraUpdate,
        duration: Duration,
        reason: TransitionReason,
    ) -> Result<Vec<TransitionHandle>, KeplerError> {
        let current = self.sink.camera_position();
        update
            .transitions(current.as_ref(), reason, duration)
            .into_iter()
            .map(|transition| self.start_transition(transition))
            .collect()
    }

    /// Cancels all transitions and applies the update immediately.
    ///
    /// If the sink has no position yet, the update is applied to the default position.
    pub fn move_camera(&mut self, update: CameraUpdate) {
        self.cancel_all_transitions();

        let current = self.sink.camera_position().unwrap_or_default();
        self.dispatcher.move_started(TransitionReason::ApiAnimation);
        self.sink.move_camera(update.apply_to(&current));
        self.dispatcher.camera_changed();
        self.dispatcher.idle();
        self.request_redraw();
    }

    /// Processes a frame at the current time of the clock.
    ///
    /// Hosts that have their own frame timestamps call [`on_frame`](Self::on_frame) instead.
    pub fn tick(&mut self) -> Result<(), KeplerError> {
        let now = self.clock.now_nanos();
        self.on_frame(now)
    }

    /// Processes a frame displayed at `now_nanos`.
    ///
    /// Frame times must not decrease; an earlier time is treated as the latest one.
    /// Errors of interpolation are returned as is; the transition stays in place and nothing is
    /// written to the sink.
    pub fn on_frame(&mut self, now_nanos: u64) -> Result<(), KeplerError> {
        let now_nanos = self
            .frame_time_nanos
            .map_or(now_nanos, |last| last.max(now_nanos));
        self.frame_time_nanos = Some(now_nanos);

        let canceled: Vec<CameraProperty> = self
            .running
            .iter()
            .filter(|(_, transition)| transition.is_canceled())
            .map(|(property, _)| *property)
            .collect();
        for property in canceled {
            if let Some(transition) = self.running.remove(&property) {
                log::debug!("Transition {:?} of {property} is canceled", transition.id());
                transition.notify_canceled();
                self.dispatcher.move_canceled();
            }
            self.promote(property);
        }

        self.evict_canceled_queued();
        // Transitions that could not start because the camera was not ready or no frame was
        // processed yet.
        for property in CameraProperty::ALL {
            self.promote(property);
        }

        let mut values = Vec::with_capacity(self.running.len());
        for transition in self.running.values_mut() {
            if !transition.is_active_at(now_nanos) {
                continue;
            }

            transition.update_finishing(now_nanos);
            let value = if transition.is_finishing() {
                transition.final_value()?
            } else {
                transition.on_frame(now_nanos)?
            };

            values.push(value);
        }

        if !values.is_empty() {
            match self.sink.camera_position() {
                Some(position) => {
                    let position = values
                        .iter()
                        .fold(position.to_builder(), |builder, value| builder.value(*value))
                        .build();
                    self.sink.move_camera(position);
                    for value in &values {
                        if let Some(transition) = self.running.get(&value.property()) {
                            transition.notify_progress(value);
                        }
                    }
                    self.dispatcher.camera_changed();
                }
                None => log::warn!("Camera position is not available, frame update is skipped"),
            }
        }

        let finished: Vec<CameraProperty> = self
            .running
            .iter()
            .filter(|(_, transition)| transition.is_finishing())
            .map(|(property, _)| *property)
            .collect();
        for property in finished {
            if let Some(transition) = self.running.remove(&property) {
                log::trace!("Transition {:?} of {property} is finished", transition.id());
                transition.notify_finished();
            }
            self.promote(property);
        }

        self.update_idle();
        Ok(())
    }

    fn install(&mut self, mut transition: CameraTransition) {
        let property = transition.property();
        let (Some(position), Some(now_nanos)) =
            (self.sink.camera_position(), self.frame_time_nanos)
        else {
            log::debug!(
                "Transition {:?} of {property} waits for the camera and the first frame",
                transition.id()
            );
            self.queued
                .entry(property)
                .or_default()
                .push_front(transition);
            return;
        };

        transition.start(&position, now_nanos);
        log::trace!("Started {transition:?}");

        if !self.is_moving {
            self.is_moving = true;
            self.dispatcher.move_started(transition.reason());
        }

        self.running.insert(property, transition);
    }

    fn promote(&mut self, property: CameraProperty) {
        if self.running.contains_key(&property) {
            return;
        }

        while let Some(next) = self
            .queued
            .get_mut(&property)
            .and_then(VecDeque::pop_front)
        {
            if next.is_canceled() {
                next.notify_canceled();
                continue;
            }

            self.install(next);
            break;
        }
    }

    fn evict_canceled_queued(&mut self) {
        for queue in self.queued.values_mut() {
            if !queue.iter().any(CameraTransition::is_canceled) {
                continue;
            }

            let (canceled, kept): (VecDeque<_>, VecDeque<_>) =
                queue.drain(..).partition(CameraTransition::is_canceled);
            *queue = kept;
            for transition in canceled {
                log::debug!("Queued transition {:?} is canceled", transition.id());
                transition.notify_canceled();
            }
        }
    }

    fn update_idle(&mut self) {
        if !self.is_idle() {
            self.request_redraw();
            return;
        }

        if self.is_moving {
            self.is_moving = false;
            self.dispatcher.idle();
        }
    }

    fn request_redraw(&self) {
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw();
        }
    }
}
