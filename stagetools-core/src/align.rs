/// Alignment edits: match selected prims to the last-selected target
use tracing::debug;

use crate::error::Error;
use crate::scene::{Axis, PrimPath, Stage};

/// Which edge of the world bounds to line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignMode {
    Min,
    Center,
    Max,
}

impl AlignMode {
    pub fn label(self) -> &'static str {
        match self {
            AlignMode::Min => "Min",
            AlignMode::Center => "Center",
            AlignMode::Max => "Max",
        }
    }
}

/// World-space anchor of a prim along one axis: the chosen edge of its
/// world bounds, or its pivot when it has no bounds.
fn anchor(stage: &Stage, path: &PrimPath, axis: Axis, mode: AlignMode) -> Option<f64> {
    let i = axis.index();
    if let Some(bbox) = stage.world_bounding_box(path) {
        return Some(match mode {
            AlignMode::Min => bbox.min[i],
            AlignMode::Center => bbox.center()[i],
            AlignMode::Max => bbox.max[i],
        });
    }
    stage.world_pivot(path).map(|p| p[i])
}

/// Align every selected prim to the last-selected one along `axis`.
///
/// The target keeps its place; each other prim is translated so the chosen
/// edge of its world bounds coincides with the target's. Prims without
/// bounds align pivot-to-anchor instead. Returns how many prims moved;
/// fewer than two selected is a no-op.
///
/// The world delta is applied to the prim's local translation, which is
/// exact whenever its ancestors carry no rotation or scale.
pub fn align(stage: Option<&mut Stage>, axis: Axis, mode: AlignMode) -> Result<usize, Error> {
    let stage = stage.ok_or(Error::MissingDocument)?;

    let selection = stage.selected_paths().to_vec();
    let Some((target, movers)) = selection.split_last() else {
        return Ok(0);
    };
    if movers.is_empty() {
        return Ok(0);
    }

    let Some(target_anchor) = anchor(stage, target, axis, mode) else {
        return Ok(0);
    };

    let mut deltas = Vec::new();
    for path in movers {
        if let Some(value) = anchor(stage, path, axis, mode) {
            deltas.push((path.clone(), target_anchor - value));
        }
    }

    let mut moved = 0;
    for (path, delta) in deltas {
        if let Some(prim) = stage.prim_mut(&path) {
            prim.translate[axis.index()] += delta;
            moved += 1;
        }
    }

    debug!(
        axis = axis.label(),
        mode = mode.label(),
        moved,
        target_prim = %target,
        "aligned selection"
    );
    Ok(moved)
}

/// Translate every selected prim along the stage's up-axis so its world
/// bounds rest on the ground plane (up = 0). Prims without bounds drop
/// their pivot to 0. Returns how many prims moved.
pub fn drop_to_ground(stage: Option<&mut Stage>) -> Result<usize, Error> {
    let stage = stage.ok_or(Error::MissingDocument)?;
    let up = stage.up_axis();
    let i = up.index();

    let mut deltas = Vec::new();
    for path in stage.selected_paths() {
        let floor = match stage.world_bounding_box(path) {
            Some(bbox) => bbox.min[i],
            None => match stage.world_pivot(path) {
                Some(pivot) => pivot[i],
                None => continue,
            },
        };
        deltas.push((path.clone(), -floor));
    }

    let mut moved = 0;
    for (path, delta) in deltas {
        if let Some(prim) = stage.prim_mut(&path) {
            prim.translate[i] += delta;
            moved += 1;
        }
    }

    debug!(up = up.label(), moved, "dropped selection to ground");
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Aabb;
    use nalgebra::{Point3, Vector3};

    fn path(s: &str) -> PrimPath {
        PrimPath::new(s).unwrap()
    }

    fn unit_extent() -> Aabb {
        Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }

    fn two_crates() -> Stage {
        let mut stage = Stage::new();
        let a = stage.define_prim(&path("/World/A"));
        a.extent = Some(unit_extent());
        a.translate = Vector3::new(0.0, 0.0, 5.0);
        let b = stage.define_prim(&path("/World/B"));
        b.extent = Some(unit_extent());
        b.translate = Vector3::new(10.0, 2.0, 3.0);
        stage.select([path("/World/A"), path("/World/B")]);
        stage
    }

    #[test]
    fn test_align_center_matches_target_center() {
        let mut stage = two_crates();
        let moved = align(Some(&mut stage), Axis::X, AlignMode::Center).unwrap();
        assert_eq!(moved, 1);
        let a = stage.world_bounding_box(&path("/World/A")).unwrap();
        let b = stage.world_bounding_box(&path("/World/B")).unwrap();
        assert!((a.center().x - b.center().x).abs() < 1e-9);
        // untouched axes stay put
        assert!((a.center().z - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_align_min_lines_up_bound_edges() {
        let mut stage = two_crates();
        // B is the last selected, so it is the target: A.min.x -> B.min.x = 9
        align(Some(&mut stage), Axis::X, AlignMode::Min).unwrap();
        let a = stage.world_bounding_box(&path("/World/A")).unwrap();
        assert!((a.min.x - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_align_max_respects_differing_sizes() {
        let mut stage = two_crates();
        let a = stage.prim_mut(&path("/World/A")).unwrap();
        a.extent = Some(Aabb::new(
            Point3::new(-3.0, -1.0, -1.0),
            Point3::new(3.0, 1.0, 1.0),
        ));
        align(Some(&mut stage), Axis::X, AlignMode::Max).unwrap();
        let a = stage.world_bounding_box(&path("/World/A")).unwrap();
        let b = stage.world_bounding_box(&path("/World/B")).unwrap();
        assert!((a.max.x - b.max.x).abs() < 1e-9);
        assert!((a.min.x - (b.max.x - 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_align_single_selection_is_noop() {
        let mut stage = two_crates();
        stage.select([path("/World/A")]);
        assert_eq!(align(Some(&mut stage), Axis::Y, AlignMode::Min).unwrap(), 0);
    }

    #[test]
    fn test_align_without_stage_is_missing_document() {
        assert_eq!(
            align(None, Axis::X, AlignMode::Min).unwrap_err(),
            Error::MissingDocument
        );
    }

    #[test]
    fn test_boundless_prim_falls_back_to_pivot() {
        let mut stage = Stage::new();
        stage.define_prim(&path("/World/Marker")).translate = Vector3::new(1.0, 0.0, 0.0);
        let b = stage.define_prim(&path("/World/B"));
        b.extent = Some(unit_extent());
        b.translate = Vector3::new(10.0, 0.0, 0.0);
        stage.select([path("/World/Marker"), path("/World/B")]);

        align(Some(&mut stage), Axis::X, AlignMode::Min).unwrap();
        // marker pivot moved onto B's min edge at x = 9
        let pivot = stage.world_pivot(&path("/World/Marker")).unwrap();
        assert!((pivot.x - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_drop_to_ground_z_up() {
        let mut stage = two_crates();
        let moved = drop_to_ground(Some(&mut stage)).unwrap();
        assert_eq!(moved, 2);
        for p in ["/World/A", "/World/B"] {
            let bbox = stage.world_bounding_box(&path(p)).unwrap();
            assert!(bbox.min.z.abs() < 1e-9);
        }
    }

    #[test]
    fn test_drop_to_ground_y_up() {
        let mut stage = Stage::with_metadata(1.0, Axis::Y).unwrap();
        let prim = stage.define_prim(&path("/World/A"));
        prim.extent = Some(unit_extent());
        prim.translate = Vector3::new(0.0, 7.0, 0.0);
        stage.select([path("/World/A")]);

        drop_to_ground(Some(&mut stage)).unwrap();
        let bbox = stage.world_bounding_box(&path("/World/A")).unwrap();
        assert!(bbox.min.y.abs() < 1e-9);
        // other axes untouched
        assert!((bbox.center().x).abs() < 1e-9);
    }
}
