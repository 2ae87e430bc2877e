/// In-memory scene graph: prims, paths, transforms, and world-space queries
use std::collections::BTreeMap;
use std::fmt;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::bounds::Aabb;
use crate::error::Error;

/// A hierarchical prim path like `/World/Crate/Lid`.
///
/// Always absolute, never trailing-slashed; the pseudo-root is `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimPath(String);

impl PrimPath {
    pub const ROOT: &'static str = "/";

    /// Parse an absolute path. Rejects relative paths, empty segments,
    /// and trailing slashes (other than the root itself).
    pub fn new(path: &str) -> Result<Self, Error> {
        if path == Self::ROOT {
            return Ok(Self(path.to_string()));
        }
        let valid = path.starts_with('/')
            && !path.ends_with('/')
            && path[1..].split('/').all(|seg| !seg.is_empty());
        if !valid {
            return Err(Error::InvalidPath(path.to_string()));
        }
        Ok(Self(path.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }

    /// Final path component (the prim's name). Empty for the root.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// Parent path; `None` for the root.
    pub fn parent(&self) -> Option<PrimPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self(Self::ROOT.to_string())),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// Whether `other` is a strict descendant of this path.
    pub fn is_ancestor_of(&self, other: &PrimPath) -> bool {
        if self.is_root() {
            return !other.is_root();
        }
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0.as_bytes()[self.0.len()] == b'/'
    }

    /// All ancestor paths from the first component down to `self`.
    fn chain(&self) -> Vec<PrimPath> {
        let mut out = Vec::new();
        let mut end = self.0.len();
        loop {
            out.push(Self(self.0[..end].to_string()));
            match self.0[..end].rfind('/') {
                Some(0) | None => break,
                Some(idx) => end = idx,
            }
        }
        out.reverse();
        out
    }
}

impl fmt::Display for PrimPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// World axis, also the stage's up-axis convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// A scene-graph node: local TRS transform, optional local extent,
/// optional asset reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Prim {
    pub translate: Vector3<f64>,
    /// Euler angles in degrees, applied Z * Y * X.
    pub rotate: Vector3<f64>,
    pub scale: Vector3<f64>,
    /// Local-space bounding extent of the prim's own geometry.
    pub extent: Option<Aabb>,
    /// Referenced asset URL, if any.
    pub reference: Option<String>,
}

impl Prim {
    pub fn new() -> Self {
        Self {
            translate: Vector3::zeros(),
            rotate: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            extent: None,
            reference: None,
        }
    }

    /// Local transform matrix, translate * rotate * scale.
    pub fn local_matrix(&self) -> Matrix4<f64> {
        let radians = self.rotate.map(|deg| deg.to_radians());
        let rx = Matrix4::new_rotation(Vector3::new(radians.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, radians.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, radians.z));
        let rotation = rz * ry * rx;
        let translation = Matrix4::new_translation(&self.translate);
        let scaling = Matrix4::new_nonuniform_scaling(&self.scale);
        translation * rotation * scaling
    }
}

impl Default for Prim {
    fn default() -> Self {
        Self::new()
    }
}

/// The live scene document: a path-addressed prim tree plus stage metadata
/// and the current selection.
#[derive(Debug, Clone)]
pub struct Stage {
    meters_per_unit: f64,
    up_axis: Axis,
    prims: BTreeMap<PrimPath, Prim>,
    selection: Vec<PrimPath>,
}

impl Stage {
    /// A meters-scaled, Z-up stage.
    pub fn new() -> Self {
        Self {
            meters_per_unit: 1.0,
            up_axis: Axis::Z,
            prims: BTreeMap::new(),
            selection: Vec::new(),
        }
    }

    pub fn with_metadata(meters_per_unit: f64, up_axis: Axis) -> Result<Self, Error> {
        if !(meters_per_unit > 0.0) || !meters_per_unit.is_finite() {
            return Err(Error::InvalidUnitConfiguration { meters_per_unit });
        }
        Ok(Self {
            meters_per_unit,
            up_axis,
            prims: BTreeMap::new(),
            selection: Vec::new(),
        })
    }

    pub fn meters_per_unit(&self) -> f64 {
        self.meters_per_unit
    }

    pub fn up_axis(&self) -> Axis {
        self.up_axis
    }

    /// Define a prim at `path`, creating missing ancestors as identity
    /// prims. Returns the (possibly pre-existing) prim for editing.
    pub fn define_prim(&mut self, path: &PrimPath) -> &mut Prim {
        if let Some(parent) = path.parent() {
            if !parent.is_root() {
                for ancestor in parent.chain() {
                    self.prims.entry(ancestor).or_default();
                }
            }
        }
        self.prims.entry(path.clone()).or_default()
    }

    pub fn prim_at(&self, path: &PrimPath) -> Option<&Prim> {
        self.prims.get(path)
    }

    pub fn prim_mut(&mut self, path: &PrimPath) -> Option<&mut Prim> {
        self.prims.get_mut(path)
    }

    /// All prim paths in tree (lexicographic) order.
    pub fn paths(&self) -> impl Iterator<Item = &PrimPath> {
        self.prims.keys()
    }

    pub fn prim_count(&self) -> usize {
        self.prims.len()
    }

    /// Direct children of `parent`, in tree order.
    pub fn children_of(&self, parent: &PrimPath) -> Vec<PrimPath> {
        self.prims
            .keys()
            .filter(|p| p.parent().as_ref() == Some(parent))
            .cloned()
            .collect()
    }

    /// Replace the selection, preserving order and dropping duplicates and
    /// paths that do not resolve. Order matters: alignment treats the last
    /// entry as its target.
    pub fn select<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PrimPath>,
    {
        let mut next = Vec::new();
        for path in paths {
            if self.prims.contains_key(&path) && !next.contains(&path) {
                next.push(path);
            }
        }
        self.selection = next;
    }

    pub fn selected_paths(&self) -> &[PrimPath] {
        &self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Local-to-world matrix: the product of every ancestor's local
    /// transform, root-most first. Identity for unknown paths.
    pub fn local_to_world(&self, path: &PrimPath) -> Matrix4<f64> {
        let mut matrix = Matrix4::identity();
        for ancestor in path.chain() {
            if let Some(prim) = self.prims.get(&ancestor) {
                matrix *= prim.local_matrix();
            }
        }
        matrix
    }

    /// World position of a prim's pivot (the origin of its local frame).
    pub fn world_pivot(&self, path: &PrimPath) -> Option<Point3<f64>> {
        if !self.prims.contains_key(path) {
            return None;
        }
        Some(self.local_to_world(path).transform_point(&Point3::origin()))
    }

    /// World-space axis-aligned bounding box of a prim's subtree.
    ///
    /// Each prim with an extent contributes the AABB of its eight extent
    /// corners transformed into world space; the subtree union is returned.
    /// `None` when the path does not resolve or nothing in the subtree has
    /// a non-empty extent.
    pub fn world_bounding_box(&self, path: &PrimPath) -> Option<Aabb> {
        if !self.prims.contains_key(path) {
            return None;
        }

        let mut union = Aabb::empty();
        for (candidate, prim) in &self.prims {
            if candidate != path && !path.is_ancestor_of(candidate) {
                continue;
            }
            let Some(extent) = prim.extent else { continue };
            if extent.is_empty() {
                continue;
            }
            let matrix = self.local_to_world(candidate);
            union.expand(&world_box_of_extent(&extent, &matrix));
        }

        if union.is_empty() {
            return None;
        }
        Some(union)
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-box a local extent in world space: transform the eight corners and
/// take their AABB.
fn world_box_of_extent(extent: &Aabb, matrix: &Matrix4<f64>) -> Aabb {
    let mut out = Aabb::empty();
    for corner in 0..8u8 {
        let pick = |bit: u8, lo: f64, hi: f64| if corner & bit == 0 { lo } else { hi };
        let local = Point3::new(
            pick(1, extent.min.x, extent.max.x),
            pick(2, extent.min.y, extent.max.y),
            pick(4, extent.min.z, extent.max.z),
        );
        out.expand_point(&matrix.transform_point(&local));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> PrimPath {
        PrimPath::new(s).unwrap()
    }

    fn unit_extent() -> Aabb {
        Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_path_validation() {
        assert!(PrimPath::new("/World/Crate").is_ok());
        assert!(PrimPath::new("/").is_ok());
        assert!(PrimPath::new("World").is_err());
        assert!(PrimPath::new("/World/").is_err());
        assert!(PrimPath::new("/World//Crate").is_err());
        assert!(PrimPath::new("").is_err());
    }

    #[test]
    fn test_path_name_and_parent() {
        let p = path("/World/Crate/Lid");
        assert_eq!(p.name(), "Lid");
        assert_eq!(p.parent().unwrap(), path("/World/Crate"));
        assert_eq!(path("/World").parent().unwrap(), path("/"));
        assert!(path("/").parent().is_none());
    }

    #[test]
    fn test_ancestor_relation() {
        assert!(path("/World").is_ancestor_of(&path("/World/Crate")));
        assert!(path("/").is_ancestor_of(&path("/World")));
        assert!(!path("/World").is_ancestor_of(&path("/World")));
        assert!(!path("/World/Cr").is_ancestor_of(&path("/World/Crate")));
    }

    #[test]
    fn test_define_prim_creates_ancestors() {
        let mut stage = Stage::new();
        stage.define_prim(&path("/World/Crate/Lid"));
        assert!(stage.prim_at(&path("/World")).is_some());
        assert!(stage.prim_at(&path("/World/Crate")).is_some());
        assert_eq!(stage.prim_count(), 3);
    }

    #[test]
    fn test_children_of() {
        let mut stage = Stage::new();
        stage.define_prim(&path("/World/A"));
        stage.define_prim(&path("/World/B/Deep"));
        stage.define_prim(&path("/World/C"));
        let kids = stage.children_of(&path("/World"));
        assert_eq!(kids, vec![path("/World/A"), path("/World/B"), path("/World/C")]);
    }

    #[test]
    fn test_selection_dedupes_and_drops_unknown() {
        let mut stage = Stage::new();
        stage.define_prim(&path("/World/A"));
        stage.define_prim(&path("/World/B"));
        stage.select([
            path("/World/B"),
            path("/World/A"),
            path("/World/B"),
            path("/World/Ghost"),
        ]);
        assert_eq!(stage.selected_paths(), &[path("/World/B"), path("/World/A")]);
    }

    #[test]
    fn test_world_bbox_translated() {
        let mut stage = Stage::new();
        let prim = stage.define_prim(&path("/World/Crate"));
        prim.extent = Some(unit_extent());
        prim.translate = Vector3::new(10.0, 0.0, 0.0);

        let bbox = stage.world_bounding_box(&path("/World/Crate")).unwrap();
        assert!((bbox.min.x - 9.0).abs() < 1e-9);
        assert!((bbox.max.x - 11.0).abs() < 1e-9);
        assert!((bbox.min.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_world_bbox_inherits_parent_scale() {
        let mut stage = Stage::new();
        stage.define_prim(&path("/World")).scale = Vector3::new(2.0, 2.0, 2.0);
        stage.define_prim(&path("/World/Crate")).extent = Some(unit_extent());

        let bbox = stage.world_bounding_box(&path("/World/Crate")).unwrap();
        assert!((bbox.size().x - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_world_bbox_unions_subtree() {
        let mut stage = Stage::new();
        let a = stage.define_prim(&path("/World/Set/A"));
        a.extent = Some(unit_extent());
        let b = stage.define_prim(&path("/World/Set/B"));
        b.extent = Some(unit_extent());
        b.translate = Vector3::new(5.0, 0.0, 0.0);

        let bbox = stage.world_bounding_box(&path("/World/Set")).unwrap();
        assert!((bbox.min.x + 1.0).abs() < 1e-9);
        assert!((bbox.max.x - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_world_bbox_missing_prim_or_extent() {
        let mut stage = Stage::new();
        stage.define_prim(&path("/World/Empty"));
        assert!(stage.world_bounding_box(&path("/World/Empty")).is_none());
        assert!(stage.world_bounding_box(&path("/World/Ghost")).is_none());
    }

    #[test]
    fn test_rotated_extent_reboxes() {
        let mut stage = Stage::new();
        let prim = stage.define_prim(&path("/World/Plank"));
        prim.extent = Some(Aabb::new(
            Point3::new(-2.0, -0.5, -0.5),
            Point3::new(2.0, 0.5, 0.5),
        ));
        prim.rotate = Vector3::new(0.0, 0.0, 90.0);

        let bbox = stage.world_bounding_box(&path("/World/Plank")).unwrap();
        // 90-degree Z rotation swaps the X and Y extents
        assert!((bbox.size().x - 1.0).abs() < 1e-9);
        assert!((bbox.size().y - 4.0).abs() < 1e-9);
    }
}
