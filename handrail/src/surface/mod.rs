//! Coordinate mapping for opaque rendered surfaces.
//!
//! When the target is a remote-rendered canvas with no addressable
//! sub-elements, coordinate-based blind tapping is the only interaction
//! mechanism available. Percentages keep taps resolution-independent;
//! this module confines that fragility to one boundary so a smarter
//! locator can replace it later without touching the sequencer.

use crate::actuator::{Actuator, Target};
use crate::errors::{FlowError, FlowResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The bounding rectangle of a target surface, in absolute coordinates.
///
/// The default rectangle is zero-sized, i.e. not yet captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl SurfaceRect {
    /// Creates a rectangle.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if the rectangle has no area.
    ///
    /// A zero-sized rectangle is the signature of capturing before the
    /// surface finished rendering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Converts normalized (0..1, 0..1) positions into absolute coordinates
/// within one captured surface rectangle.
///
/// The rectangle is read once and immutable thereafter; many tap requests
/// reference the same mapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    rect: SurfaceRect,
}

impl CoordinateMapper {
    /// Creates a mapper over an already-captured rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::EmptySurface`] if the rectangle has no area.
    pub fn new(rect: SurfaceRect) -> FlowResult<Self> {
        if rect.is_empty() {
            return Err(FlowError::EmptySurface);
        }
        Ok(Self { rect })
    }

    /// Waits out the settle delay, then reads the bounding rectangle of
    /// `target` and builds a mapper over it.
    ///
    /// The settle delay guards the known failure mode of capturing a
    /// zero-sized or stale rectangle from a surface that is still
    /// rendering.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::EmptySurface`] if the rectangle is still
    /// zero-sized after the delay, or any error the actuator reports.
    pub async fn capture(
        actuator: &dyn Actuator,
        target: &Target,
        settle: Duration,
    ) -> FlowResult<Self> {
        tokio::time::sleep(settle).await;
        let rect = actuator.surface_bounds(target).await?;
        Self::new(rect)
    }

    /// Returns the captured rectangle.
    #[must_use]
    pub fn rect(&self) -> &SurfaceRect {
        &self.rect
    }

    /// Maps normalized coordinates to absolute ones: `origin + percent *
    /// dimension` per axis.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidPercent`] if either value falls
    /// outside [0, 1].
    pub fn map_percent(&self, x_percent: f64, y_percent: f64) -> FlowResult<(f64, f64)> {
        if !(0.0..=1.0).contains(&x_percent) {
            return Err(FlowError::InvalidPercent {
                axis: 'x',
                value: x_percent,
            });
        }
        if !(0.0..=1.0).contains(&y_percent) {
            return Err(FlowError::InvalidPercent {
                axis: 'y',
                value: y_percent,
            });
        }
        Ok((
            self.rect.x + self.rect.width * x_percent,
            self.rect.y + self.rect.height * y_percent,
        ))
    }

    /// Maps normalized coordinates and dispatches a pointer click there.
    pub async fn tap(
        &self,
        actuator: &dyn Actuator,
        x_percent: f64,
        y_percent: f64,
    ) -> FlowResult<()> {
        let (x, y) = self.map_percent(x_percent, y_percent)?;
        actuator.click_at(x, y).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(SurfaceRect::new(100.0, 50.0, 400.0, 800.0)).unwrap()
    }

    #[test]
    fn test_zero_maps_to_origin() {
        let (x, y) = mapper().map_percent(0.0, 0.0).unwrap();
        assert!((x - 100.0).abs() < f64::EPSILON);
        assert!((y - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_one_maps_to_far_corner() {
        let (x, y) = mapper().map_percent(1.0, 1.0).unwrap();
        assert!((x - 500.0).abs() < f64::EPSILON);
        assert!((y - 850.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mapping_is_linear() {
        let m = mapper();
        let (x_half, y_half) = m.map_percent(0.5, 0.5).unwrap();
        let (x_quarter, y_quarter) = m.map_percent(0.25, 0.25).unwrap();

        assert!((x_half - 300.0).abs() < f64::EPSILON);
        assert!((y_half - 450.0).abs() < f64::EPSILON);
        // Halfway between origin and midpoint.
        assert!((x_quarter - 200.0).abs() < f64::EPSILON);
        assert!((y_quarter - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mapping_is_monotonic() {
        let m = mapper();
        let mut last = m.map_percent(0.0, 0.0).unwrap();
        for i in 1..=10 {
            let p = f64::from(i) / 10.0;
            let next = m.map_percent(p, p).unwrap();
            assert!(next.0 > last.0);
            assert!(next.1 > last.1);
            last = next;
        }
    }

    #[test]
    fn test_out_of_range_percent_rejected() {
        let m = mapper();
        assert!(matches!(
            m.map_percent(1.5, 0.5),
            Err(FlowError::InvalidPercent { axis: 'x', .. })
        ));
        assert!(matches!(
            m.map_percent(0.5, -0.1),
            Err(FlowError::InvalidPercent { axis: 'y', .. })
        ));
    }

    #[test]
    fn test_empty_rect_rejected() {
        let err = CoordinateMapper::new(SurfaceRect::new(0.0, 0.0, 0.0, 600.0));
        assert!(matches!(err, Err(FlowError::EmptySurface)));
    }

    #[tokio::test]
    async fn test_capture_reads_bounds_after_settle() {
        use crate::testing::ScriptedActuator;

        let actuator = ScriptedActuator::new();
        actuator.set_bounds(SurfaceRect::new(5.0, 10.0, 200.0, 400.0));

        let mapper =
            CoordinateMapper::capture(&actuator, &Target::css("canvas"), Duration::ZERO)
                .await
                .unwrap();
        assert_eq!(*mapper.rect(), SurfaceRect::new(5.0, 10.0, 200.0, 400.0));
    }

    #[tokio::test]
    async fn test_capture_of_unrendered_surface_fails() {
        use crate::testing::ScriptedActuator;

        let actuator = ScriptedActuator::new();
        actuator.set_bounds(SurfaceRect::new(0.0, 0.0, 0.0, 0.0));

        let err =
            CoordinateMapper::capture(&actuator, &Target::css("canvas"), Duration::ZERO).await;
        assert!(matches!(err, Err(FlowError::EmptySurface)));
    }

    #[tokio::test]
    async fn test_tap_dispatches_mapped_click() {
        use crate::testing::ScriptedActuator;

        let actuator = ScriptedActuator::new();
        actuator.set_bounds(SurfaceRect::new(100.0, 50.0, 400.0, 800.0));

        let mapper =
            CoordinateMapper::capture(&actuator, &Target::css("canvas"), Duration::ZERO)
                .await
                .unwrap();
        mapper.tap(&actuator, 0.5, 0.75).await.unwrap();

        assert_eq!(actuator.raw_clicks(), vec![(300.0, 650.0)]);
    }
}
