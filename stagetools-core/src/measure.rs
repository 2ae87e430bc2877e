/// Measurement presentation: selection union bounds in a display unit
use tracing::debug;

use crate::bounds::{aggregate_bounds, UnionResult};
use crate::error::Error;
use crate::scene::{PrimPath, Stage};
use crate::units::{self, UnitScale};

/// Placeholder shown per axis when there is nothing to measure.
pub const NO_MEASUREMENT: &str = "--";

/// UI-session state for measuring a selection.
///
/// Owns the display preference; everything else is recomputed per request.
#[derive(Debug, Clone)]
pub struct MeasureSession {
    display: UnitScale,
}

impl MeasureSession {
    pub fn new() -> Self {
        // cm is the original default selection
        Self {
            display: units::DISPLAY_UNITS[1],
        }
    }

    pub fn display_unit(&self) -> UnitScale {
        self.display
    }

    /// Select a display unit by name. Unknown names leave the preference
    /// unchanged and report `false`.
    pub fn set_display_unit(&mut self, name: &str) -> bool {
        match units::display_unit(name) {
            Some(unit) => {
                self.display = unit;
                true
            }
            None => false,
        }
    }

    /// Cycle to the next display unit in registry order.
    pub fn cycle_display_unit(&mut self) {
        let idx = units::DISPLAY_UNITS
            .iter()
            .position(|u| u.name == self.display.name)
            .unwrap_or(0);
        self.display = units::DISPLAY_UNITS[(idx + 1) % units::DISPLAY_UNITS.len()];
    }

    /// Union world bounds across `paths`. A missing document or an empty
    /// batch measures as "nothing", never as an error; per-path resolution
    /// failures are absorbed.
    pub fn measure(&self, stage: Option<&Stage>, paths: &[PrimPath]) -> UnionResult {
        let Some(stage) = stage else {
            debug!("measure requested with no stage open");
            return UnionResult::none();
        };
        let result = aggregate_bounds(paths, |p| stage.world_bounding_box(p));
        debug!(
            requested = paths.len(),
            contributed = result.count,
            "measured selection bounds"
        );
        result
    }

    /// Format a measurement as three per-axis length strings in the display
    /// unit. A no-measurement result formats as placeholders; an invalid
    /// unit configuration is the one surfaced failure.
    pub fn format_size(&self, result: &UnionResult, native_mpu: f64) -> Result<[String; 3], Error> {
        // Reject bad unit configuration even when there is nothing to show.
        units::to_display(0.0, native_mpu, self.display.meters_per_unit)?;

        if !result.has_measurement() {
            return Ok([
                NO_MEASUREMENT.to_string(),
                NO_MEASUREMENT.to_string(),
                NO_MEASUREMENT.to_string(),
            ]);
        }

        let size = result.bounds.size();
        Ok([
            units::format_length(size.x, native_mpu, self.display)?,
            units::format_length(size.y, native_mpu, self.display)?,
            units::format_length(size.z, native_mpu, self.display)?,
        ])
    }
}

impl Default for MeasureSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Aabb;
    use nalgebra::{Point3, Vector3};

    fn path(s: &str) -> PrimPath {
        PrimPath::new(s).unwrap()
    }

    fn stage_with_boxes() -> Stage {
        let mut stage = Stage::new();
        let a = stage.define_prim(&path("/World/A"));
        a.extent = Some(Aabb::new(
            Point3::new(2.0, 3.0, 0.0),
            Point3::new(4.0, 6.0, 1.0),
        ));
        let b = stage.define_prim(&path("/World/B"));
        b.extent = Some(Aabb::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
        ));
        stage
    }

    #[test]
    fn test_missing_document_measures_as_nothing() {
        let session = MeasureSession::new();
        let result = session.measure(None, &[path("/World/A")]);
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_union_measurement_in_centimeters() {
        let stage = stage_with_boxes();
        let session = MeasureSession::new();
        let result = session.measure(Some(&stage), &[path("/World/A"), path("/World/B")]);
        assert_eq!(result.count, 2);

        let lines = session.format_size(&result, stage.meters_per_unit()).unwrap();
        assert_eq!(lines, ["400.00 cm", "600.00 cm", "100.00 cm"]);
    }

    #[test]
    fn test_unresolved_paths_are_absorbed() {
        let stage = stage_with_boxes();
        let session = MeasureSession::new();
        let result = session.measure(
            Some(&stage),
            &[path("/World/A"), path("/World/Ghost"), path("/Nope")],
        );
        assert_eq!(result.count, 1);
    }

    #[test]
    fn test_no_measurement_formats_as_placeholders() {
        let session = MeasureSession::new();
        let lines = session.format_size(&UnionResult::none(), 1.0).unwrap();
        assert_eq!(lines, [NO_MEASUREMENT, NO_MEASUREMENT, NO_MEASUREMENT]);
    }

    #[test]
    fn test_invalid_native_mpu_is_surfaced() {
        let session = MeasureSession::new();
        let err = session.format_size(&UnionResult::none(), 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidUnitConfiguration { .. }));
    }

    #[test]
    fn test_cm_stage_single_prim_in_millimeters() {
        let mut stage = Stage::with_metadata(0.01, crate::scene::Axis::Z).unwrap();
        let prim = stage.define_prim(&path("/World/Pole"));
        prim.extent = Some(Aabb::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(250.0, 1.0, 1.0),
        ));

        let mut session = MeasureSession::new();
        assert!(session.set_display_unit("mm"));
        let result = session.measure(Some(&stage), &[path("/World/Pole")]);
        let lines = session.format_size(&result, stage.meters_per_unit()).unwrap();
        assert_eq!(lines[0], "2500.0 mm");
    }

    #[test]
    fn test_unknown_display_unit_is_rejected() {
        let mut session = MeasureSession::new();
        assert!(!session.set_display_unit("cubit"));
        assert_eq!(session.display_unit().name, "cm");
    }

    #[test]
    fn test_cycle_display_unit_wraps() {
        let mut session = MeasureSession::new();
        let start = session.display_unit().name;
        for _ in 0..units::DISPLAY_UNITS.len() {
            session.cycle_display_unit();
        }
        assert_eq!(session.display_unit().name, start);
    }

    #[test]
    fn test_subtree_parent_selection() {
        let mut stage = Stage::new();
        let a = stage.define_prim(&path("/World/Set/A"));
        a.extent = Some(Aabb::new(
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, 1.0),
        ));
        let b = stage.define_prim(&path("/World/Set/B"));
        b.extent = Some(Aabb::new(
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, 1.0),
        ));
        b.translate = Vector3::new(3.0, 0.0, 0.0);

        let session = MeasureSession::new();
        let result = session.measure(Some(&stage), &[path("/World/Set")]);
        assert_eq!(result.count, 1);
        assert!((result.bounds.size().x - 5.0).abs() < 1e-9);
    }
}
