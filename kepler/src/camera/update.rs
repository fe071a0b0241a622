use std::time::Duration;

use kepler_types::{EdgeInsets, LatLng};

use crate::camera::CameraPosition;
use crate::transition::{CameraTransition, TransitionReason, TransitionValue};

/// Change of some of the camera properties.
///
/// Properties that are not set keep their current values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraUpdate {
    target: Option<LatLng>,
    zoom: Option<f64>,
    tilt: Option<f64>,
    bearing: Option<f64>,
    padding: Option<EdgeInsets>,
}

impl CameraUpdate {
    /// Empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update that moves the camera to the given position.
    pub fn to_position(position: CameraPosition) -> Self {
        Self {
            target: Some(position.target()),
            zoom: Some(position.zoom()),
            tilt: Some(position.tilt()),
            bearing: Some(position.bearing()),
            padding: Some(position.padding()),
        }
    }

    /// Sets the new target.
    pub fn with_target(mut self, target: LatLng) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the new zoom level.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Sets the new tilt.
    pub fn with_tilt(mut self, tilt: f64) -> Self {
        self.tilt = Some(tilt);
        self
    }

    /// Sets the new bearing.
    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }

    /// Sets the new padding.
    pub fn with_padding(mut self, padding: EdgeInsets) -> Self {
        self.padding = Some(padding);
        self
    }

    fn values(&self) -> impl Iterator<Item = TransitionValue> {
        [
            self.target.map(TransitionValue::Target),
            self.zoom.map(TransitionValue::Zoom),
            self.tilt.map(TransitionValue::Pitch),
            self.bearing.map(TransitionValue::Bearing),
            self.padding.map(TransitionValue::Padding),
        ]
        .into_iter()
        .flatten()
    }

    /// Position the camera would have after applying the update to `current`.
    pub fn apply_to(&self, current: &CameraPosition) -> CameraPosition {
        self.values()
            .fold(current.to_builder(), |builder, value| builder.value(value))
            .build()
    }

    /// Creates one transition for every property whose value differs from `current`.
    ///
    /// Without a current position every property set in the update gets a transition.
    pub fn transitions(
        &self,
        current: Option<&CameraPosition>,
        reason: TransitionReason,
        duration: Duration,
    ) -> Vec<CameraTransition> {
        let target = self.apply_to(&current.copied().unwrap_or_default());
        self.values()
            .filter_map(|value| {
                let property = value.property();
                let end = target.value(property).ok()?;
                if let Some(current) = current {
                    if current.value(property).ok()? == end {
                        return None;
                    }
                }

                Some(CameraTransition::new(reason, duration, Duration::ZERO, end))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use kepler_types::latlng;

    use super::*;
    use crate::camera::CameraProperty;

    #[test]
    fn unchanged_properties_produce_no_transitions() {
        let current = CameraPosition::builder()
            .target(latlng!(1.0, 2.0))
            .zoom(5.0)
            .build();
        let update = CameraUpdate::new()
            .with_target(latlng!(1.0, 2.0))
            .with_zoom(7.0)
            .with_bearing(400.0);

        let transitions =
            update.transitions(Some(&current), TransitionReason::ApiAnimation, Duration::ZERO);
        let properties: Vec<_> = transitions.iter().map(|t| t.property()).collect();
        assert_eq!(properties, [CameraProperty::Zoom, CameraProperty::Bearing]);
        assert_eq!(transitions[1].end_value(), TransitionValue::Bearing(40.0));
    }

    #[test]
    fn every_property_is_animated_without_current_position() {
        let update = CameraUpdate::new().with_zoom(0.0).with_tilt(10.0);
        let transitions = update.transitions(None, TransitionReason::Any, Duration::ZERO);
        assert_eq!(transitions.len(), 2);
    }

    #[test]
    fn apply_keeps_unset_properties() {
        let current = CameraPosition::builder().zoom(5.0).tilt(20.0).build();
        let updated = CameraUpdate::new().with_tilt(80.0).apply_to(&current);

        assert_eq!(updated.zoom(), 5.0);
        assert_eq!(updated.tilt(), 60.0);
    }
}
