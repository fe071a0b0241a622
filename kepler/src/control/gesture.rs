use std::time::Duration;

use kepler_types::{Point2d, Vector2d};

use crate::camera::{CameraProperty, MAXIMUM_TILT, MINIMUM_TILT};
use crate::control::{EventPropagation, MouseButton, UserEvent, UserEventHandler};
use crate::controller::MapCameraController;
use crate::transition::{CameraTransition, TransitionReason, TransitionValue};

const DEFAULT_ZOOM_DURATION: Duration = Duration::from_millis(50);
const DEFAULT_DOUBLE_CLICK_DURATION: Duration = Duration::from_millis(300);
const ROTATION_SPEED_K: f64 = 0.3;

/// Configuration of a [`CameraGestureController`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GestureConfiguration {
    zoom_duration: Duration,
    double_click_duration: Duration,
    zoom_speed: f64,
    min_zoom: f64,
    max_zoom: f64,

    rotation_speed: f64,
    min_tilt: f64,
    max_tilt: f64,
}

impl Default for GestureConfiguration {
    fn default() -> Self {
        Self {
            zoom_duration: DEFAULT_ZOOM_DURATION,
            double_click_duration: DEFAULT_DOUBLE_CLICK_DURATION,
            zoom_speed: 0.2,
            min_zoom: 0.0,
            max_zoom: 25.5,
            rotation_speed: 1.0,
            min_tilt: MINIMUM_TILT,
            max_tilt: MAXIMUM_TILT,
        }
    }
}

impl GestureConfiguration {
    /// Duration of the zoom animation when mouse wheel is turned.
    pub fn zoom_duration(&self) -> Duration {
        self.zoom_duration
    }

    /// Sets duration of the zoom animation when mouse wheel is turned.
    pub fn with_zoom_duration(mut self, duration: Duration) -> Self {
        self.zoom_duration = duration;
        self
    }

    /// Sets duration of the zoom animation when mouse wheel is turned.
    pub fn set_zoom_duration(&mut self, duration: Duration) {
        self.zoom_duration = duration;
    }

    /// Duration of the zoom animation on double click.
    pub fn double_click_duration(&self) -> Duration {
        self.double_click_duration
    }

    /// Sets duration of the zoom animation on double click.
    pub fn with_double_click_duration(mut self, duration: Duration) -> Self {
        self.double_click_duration = duration;
        self
    }

    /// Sets duration of the zoom animation on double click.
    pub fn set_double_click_duration(&mut self, duration: Duration) {
        self.double_click_duration = duration;
    }

    /// Magnitude of the zoom on every mouse wheel turn.
    ///
    /// For example, the value of `0.2` means, that every time the mouse wheel is turned, the
    /// visible area is scaled by 1.2 times.
    pub fn zoom_speed(&self) -> f64 {
        self.zoom_speed
    }

    /// Sets magnitude of the zoom on every mouse wheel turn.
    pub fn with_zoom_speed(mut self, speed: f64) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Sets magnitude of the zoom on every mouse wheel turn.
    pub fn set_zoom_speed(&mut self, speed: f64) {
        self.zoom_speed = speed;
    }

    /// Minimum zoom level a gesture can reach.
    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    /// Sets minimum zoom level a gesture can reach.
    pub fn with_min_zoom(mut self, zoom: f64) -> Self {
        self.min_zoom = zoom;
        self
    }

    /// Sets minimum zoom level a gesture can reach.
    pub fn set_min_zoom(&mut self, zoom: f64) {
        self.min_zoom = zoom;
    }

    /// Maximum zoom level a gesture can reach.
    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Sets maximum zoom level a gesture can reach.
    pub fn with_max_zoom(mut self, zoom: f64) -> Self {
        self.max_zoom = zoom;
        self
    }

    /// Sets maximum zoom level a gesture can reach.
    pub fn set_max_zoom(&mut self, zoom: f64) {
        self.max_zoom = zoom;
    }

    /// Sensitivity for rotation and tilting by dragging right mouse button.
    ///
    /// The value here is an abstract multiplier. Default value is `1.0`. Negative value will
    /// inverse rotation direction.
    pub fn rotation_speed(&self) -> f64 {
        self.rotation_speed
    }

    /// Sets sensitivity for rotation and tilting by dragging right mouse button.
    pub fn with_rotation_speed(mut self, speed: f64) -> Self {
        self.rotation_speed = speed;
        self
    }

    /// Sets sensitivity for rotation and tilting by dragging right mouse button.
    pub fn set_rotation_speed(&mut self, speed: f64) {
        self.rotation_speed = speed;
    }

    /// Minimum tilt in degrees a gesture can reach.
    pub fn min_tilt(&self) -> f64 {
        self.min_tilt
    }

    /// Sets minimum tilt in degrees. The camera itself never goes below `0`.
    pub fn with_min_tilt(mut self, tilt: f64) -> Self {
        self.min_tilt = tilt;
        self
    }

    /// Sets minimum tilt in degrees. The camera itself never goes below `0`.
    pub fn set_min_tilt(&mut self, tilt: f64) {
        self.min_tilt = tilt;
    }

    /// Maximum tilt in degrees a gesture can reach.
    pub fn max_tilt(&self) -> f64 {
        self.max_tilt
    }

    /// Sets maximum tilt in degrees. The camera itself never goes above `60`.
    pub fn with_max_tilt(mut self, tilt: f64) -> Self {
        self.max_tilt = tilt;
        self
    }

    /// Sets maximum tilt in degrees. The camera itself never goes above `60`.
    pub fn set_max_tilt(&mut self, tilt: f64) {
        self.max_tilt = tilt;
    }

    /// Disables tilting by setting min and max tilt to `0.0`.
    pub fn with_disable_tilt(mut self) -> Self {
        self.min_tilt = 0.0;
        self.max_tilt = 0.0;
        self
    }
}

/// Event handler providing panning, zooming, rotating and tilting of the camera.
///
/// Every change is submitted as a [`TransitionReason::Gesture`] transition, so with the default
/// behavior it takes the camera over from running application animations.
#[derive(Default, Copy, Clone, PartialEq, Debug)]
pub struct CameraGestureController {
    config: GestureConfiguration,
}

impl CameraGestureController {
    /// Creates a new instance of `CameraGestureController` with the given configuration.
    pub fn new(config: GestureConfiguration) -> Self {
        Self { config }
    }

    /// Returns the current configuration of the controller.
    pub fn config(&self) -> GestureConfiguration {
        self.config
    }

    /// Update the configuration of the controller.
    pub fn set_config(&mut self, config: GestureConfiguration) {
        self.config = config;
    }
}

impl UserEventHandler for CameraGestureController {
    fn handle(
        &self,
        event: &UserEvent,
        controller: &mut MapCameraController,
    ) -> EventPropagation {
        match event {
            UserEvent::DragStarted(button, _)
                if *button == MouseButton::Left
                    || *button == MouseButton::Right
                    || *button == MouseButton::Other =>
            {
                EventPropagation::Consume
            }
            UserEvent::Drag(button, delta, e) => match button {
                MouseButton::Left | MouseButton::Other => {
                    self.pan(controller, e.screen_pointer_position, *delta);
                    EventPropagation::Stop
                }
                MouseButton::Right => {
                    self.rotate(controller, *delta);
                    EventPropagation::Stop
                }
                _ => EventPropagation::Propagate,
            },
            UserEvent::Scroll(delta, _) => {
                let zoom_delta = delta * (1.0 + self.config.zoom_speed).log2();
                self.zoom_by(controller, zoom_delta, self.config.zoom_duration);
                EventPropagation::Stop
            }
            UserEvent::Zoom(scale, _) => {
                if *scale > 0.0 {
                    self.zoom_by(controller, -scale.log2(), Duration::ZERO);
                }
                EventPropagation::Stop
            }
            UserEvent::DoubleClick(MouseButton::Left, _) => {
                self.zoom_by(controller, 1.0, self.config.double_click_duration);
                EventPropagation::Stop
            }
            _ => EventPropagation::Propagate,
        }
    }
}

impl CameraGestureController {
    fn pan(&self, controller: &mut MapCameraController, position: Point2d, delta: Vector2d) {
        let prev_position = position - delta;
        let sink = controller.sink();
        let (Some(from), Some(to)) = (
            sink.lat_lng_for_pixel(prev_position),
            sink.lat_lng_for_pixel(position),
        ) else {
            log::debug!("Cannot project pointer position, pan is ignored");
            return;
        };

        if let Some(TransitionValue::Target(target)) =
            latest_value(controller, CameraProperty::Target)
        {
            let target = target.offset(from.lat() - to.lat(), from.lon() - to.lon());
            submit(
                controller,
                CameraTransition::target(TransitionReason::Gesture, target, Duration::ZERO),
            );
        }
    }

    fn rotate(&self, controller: &mut MapCameraController, px_delta: Vector2d) {
        let k = self.config.rotation_speed * ROTATION_SPEED_K;

        if let Some(TransitionValue::Bearing(bearing)) =
            latest_value(controller, CameraProperty::Bearing)
        {
            if px_delta.x != 0.0 {
                submit(
                    controller,
                    CameraTransition::bearing(
                        TransitionReason::Gesture,
                        bearing + px_delta.x * k,
                        Duration::ZERO,
                    ),
                );
            }
        }

        if let Some(TransitionValue::Pitch(tilt)) = latest_value(controller, CameraProperty::Pitch)
        {
            if px_delta.y != 0.0 {
                let tilt = self.adjust_tilt(tilt - px_delta.y * k);
                submit(
                    controller,
                    CameraTransition::pitch(TransitionReason::Gesture, tilt, Duration::ZERO),
                );
            }
        }
    }

    fn zoom_by(&self, controller: &mut MapCameraController, delta: f64, duration: Duration) {
        if let Some(TransitionValue::Zoom(zoom)) = latest_value(controller, CameraProperty::Zoom) {
            let zoom = self.adjust_zoom(zoom + delta);
            submit(
                controller,
                CameraTransition::zoom(TransitionReason::Gesture, zoom, duration),
            );
        }
    }

    fn adjust_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.config.min_zoom).min(self.config.max_zoom)
    }

    fn adjust_tilt(&self, tilt: f64) -> f64 {
        tilt.max(self.config.min_tilt).min(self.config.max_tilt)
    }
}

/// Value of the newest gesture step for the property.
///
/// A pending step sits in front of the queue, otherwise the running transition or the camera
/// holds the value.
fn latest_value(
    controller: &MapCameraController,
    property: CameraProperty,
) -> Option<TransitionValue> {
    controller
        .queued_transitions_of(property)
        .find(|transition| !transition.is_canceled())
        .or_else(|| {
            controller
                .running_transition(property)
                .filter(|transition| !transition.is_canceled())
        })
        .map(CameraTransition::end_value)
        .or_else(|| {
            controller
                .camera_position()
                .and_then(|position| position.value(property).ok())
        })
}

/// Submits a gesture step. Pending steps of the property are already included in it, so they
/// are canceled.
fn submit(controller: &mut MapCameraController, transition: CameraTransition) {
    for pending in controller.queued_transitions_of(transition.property()) {
        pending.cancel();
    }

    if let Err(err) = controller.start_transition(transition) {
        log::warn!("Gesture transition is rejected: {err}");
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use kepler_types::latlng;

    use super::*;
    use crate::camera::CameraPosition;
    use crate::control::MouseEvent;
    use crate::tests::{controller, MS};

    fn position() -> CameraPosition {
        CameraPosition::builder()
            .target(latlng!(10.0, 20.0))
            .zoom(10.0)
            .tilt(20.0)
            .bearing(0.0)
            .build()
    }

    fn pointer(x: f64, y: f64) -> MouseEvent {
        MouseEvent::new(Point2d::new(x, y))
    }

    #[test]
    fn drag_start_is_consumed() {
        let (mut controller, _clock, _sink) = controller(position());
        let gestures = CameraGestureController::default();

        let propagation = gestures.handle(
            &UserEvent::DragStarted(MouseButton::Left, pointer(0.0, 0.0)),
            &mut controller,
        );
        assert_eq!(propagation, EventPropagation::Consume);

        let propagation = gestures.handle(
            &UserEvent::DragStarted(MouseButton::Middle, pointer(0.0, 0.0)),
            &mut controller,
        );
        assert_eq!(propagation, EventPropagation::Propagate);
    }

    #[test]
    fn drag_pans_the_camera() {
        let (mut controller, _clock, sink) = controller(position());
        let gestures = CameraGestureController::default();

        gestures.handle(
            &UserEvent::Drag(
                MouseButton::Left,
                Vector2d::new(10.0, 0.0),
                pointer(100.0, 100.0),
            ),
            &mut controller,
        );
        gestures.handle(
            &UserEvent::Drag(
                MouseButton::Left,
                Vector2d::new(0.0, 10.0),
                pointer(100.0, 110.0),
            ),
            &mut controller,
        );
        controller.on_frame(MS).expect("frame failed");

        let target = sink.position().target();
        assert_relative_eq!(target.lat(), 11.0, epsilon = 1e-9);
        assert_relative_eq!(target.lon(), 19.0, epsilon = 1e-9);
    }

    #[test]
    fn stacked_drags_accumulate() {
        let (mut controller, _clock, sink) = controller(position());
        let gestures = CameraGestureController::default();

        for x in [110.0, 120.0, 130.0] {
            gestures.handle(
                &UserEvent::Drag(
                    MouseButton::Left,
                    Vector2d::new(10.0, 0.0),
                    pointer(x, 100.0),
                ),
                &mut controller,
            );
        }
        assert_eq!(
            controller
                .queued_transitions_of(CameraProperty::Target)
                .count(),
            1
        );

        for frame in 1..=5 {
            controller.on_frame(frame * MS).expect("frame failed");
        }

        let target = sink.position().target();
        assert_relative_eq!(target.lat(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(target.lon(), 17.0, epsilon = 1e-9);
        assert!(controller.is_idle());
    }

    #[test]
    fn stacked_scrolls_accumulate() {
        let (mut controller, _clock, sink) = controller(position());
        let gestures =
            CameraGestureController::new(GestureConfiguration::default().with_zoom_speed(1.0));

        for _ in 0..3 {
            gestures.handle(&UserEvent::Scroll(1.0, pointer(0.0, 0.0)), &mut controller);
        }
        for frame in [100, 200, 300] {
            controller.on_frame(frame * MS).expect("frame failed");
        }

        assert_relative_eq!(sink.position().zoom(), 13.0);
        assert!(controller.is_idle());
    }

    #[test]
    fn pan_cancels_application_animation() {
        let (mut controller, _clock, _sink) = controller(position());
        let gestures = CameraGestureController::default();

        let animation = controller
            .start_transition(CameraTransition::zoom(
                TransitionReason::ApiAnimation,
                12.0,
                Duration::from_millis(300),
            ))
            .expect("failed to start");
        gestures.handle(
            &UserEvent::Drag(MouseButton::Left, Vector2d::new(1.0, 1.0), pointer(1.0, 1.0)),
            &mut controller,
        );

        assert!(animation.is_canceled());
    }

    #[test]
    fn scroll_zoom_is_clamped() {
        let (mut controller, _clock, sink) = controller(position());
        let gestures =
            CameraGestureController::new(GestureConfiguration::default().with_max_zoom(12.0));

        for _ in 0..3 {
            gestures.handle(&UserEvent::Scroll(5.0, pointer(0.0, 0.0)), &mut controller);
        }
        for frame in [100, 150, 200, 250] {
            controller.on_frame(frame * MS).expect("frame failed");
        }

        assert_relative_eq!(sink.position().zoom(), 12.0);
        assert!(controller.is_idle());
    }

    #[test]
    fn scroll_zooms_by_configured_speed() {
        let (mut controller, _clock, sink) = controller(position());
        let gestures =
            CameraGestureController::new(GestureConfiguration::default().with_zoom_speed(1.0));

        gestures.handle(&UserEvent::Scroll(-2.0, pointer(0.0, 0.0)), &mut controller);
        controller.on_frame(100 * MS).expect("frame failed");

        assert_relative_eq!(sink.position().zoom(), 8.0);
    }

    #[test]
    fn pinch_zoom_follows_scale() {
        let (mut controller, _clock, sink) = controller(position());
        let gestures = CameraGestureController::default();

        gestures.handle(
            &UserEvent::Zoom(0.5, Point2d::new(0.0, 0.0)),
            &mut controller,
        );
        controller.on_frame(MS).expect("frame failed");

        assert_relative_eq!(sink.position().zoom(), 11.0);
    }

    #[test]
    fn double_click_zooms_in() {
        let (mut controller, _clock, sink) = controller(position());
        let gestures = CameraGestureController::default();

        gestures.handle(
            &UserEvent::DoubleClick(MouseButton::Left, pointer(0.0, 0.0)),
            &mut controller,
        );
        controller.on_frame(150 * MS).expect("frame failed");
        assert_relative_eq!(sink.position().zoom(), 10.5);

        controller.on_frame(300 * MS).expect("frame failed");
        assert_relative_eq!(sink.position().zoom(), 11.0);
    }

    #[test]
    fn tilt_is_adjusted() {
        let (mut controller, _clock, sink) = controller(position());
        let gestures = CameraGestureController::new(
            GestureConfiguration::default()
                .with_min_tilt(10.0)
                .with_max_tilt(30.0),
        );

        gestures.handle(
            &UserEvent::Drag(
                MouseButton::Right,
                Vector2d::new(0.0, -1000.0),
                pointer(0.0, 0.0),
            ),
            &mut controller,
        );
        controller.on_frame(MS).expect("frame failed");
        assert_relative_eq!(sink.position().tilt(), 30.0);

        gestures.handle(
            &UserEvent::Drag(
                MouseButton::Right,
                Vector2d::new(0.0, 1000.0),
                pointer(0.0, 0.0),
            ),
            &mut controller,
        );
        controller.on_frame(2 * MS).expect("frame failed");
        assert_relative_eq!(sink.position().tilt(), 10.0);
    }

    #[test]
    fn horizontal_drag_rotates() {
        let (mut controller, _clock, sink) = controller(position());
        let gestures = CameraGestureController::default();

        gestures.handle(
            &UserEvent::Drag(
                MouseButton::Right,
                Vector2d::new(-100.0, 0.0),
                pointer(0.0, 0.0),
            ),
            &mut controller,
        );
        controller.on_frame(MS).expect("frame failed");

        assert_relative_eq!(sink.position().bearing(), 330.0, epsilon = 1e-9);
        assert_relative_eq!(sink.position().tilt(), 20.0);
    }

    #[test]
    fn closure_is_a_handler() {
        let (mut controller, _clock, _sink) = controller(position());
        let handler = |event: &UserEvent, _: &mut MapCameraController| match event {
            UserEvent::Scroll(..) => EventPropagation::Stop,
            _ => EventPropagation::Propagate,
        };

        assert_eq!(
            handler.handle(&UserEvent::Scroll(1.0, pointer(0.0, 0.0)), &mut controller),
            EventPropagation::Stop
        );
    }
}
