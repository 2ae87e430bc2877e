/// Axis-aligned bounding boxes and multi-selection aggregation
use nalgebra::{Point3, Vector3};

/// A world-space axis-aligned bounding box.
///
/// The empty box is representable (inverted infinite corners) and distinct
/// from a zero-volume box: a prim with a degenerate flat extent still
/// contributes to a union, an empty box never does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// The empty box: expanding it by anything yields that thing.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// A box holds a valid region only when min <= max on every axis.
    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    /// Grow to include a point.
    pub fn expand_point(&mut self, p: &Point3<f64>) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    /// Grow to include another box. Empty operands are absorbed.
    pub fn expand(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        for i in 0..3 {
            self.min[i] = self.min[i].min(other.min[i]);
            self.max[i] = self.max[i].max(other.max[i]);
        }
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        out.expand(other);
        out
    }

    /// Per-axis extent. Zero for the empty box.
    pub fn size(&self) -> Vector3<f64> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

/// Union bounds across a batch of inputs, plus how many contributed.
///
/// `count == 0` means "no measurement": callers render a placeholder,
/// never zero-sized geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnionResult {
    pub bounds: Aabb,
    pub count: usize,
}

impl UnionResult {
    pub fn none() -> Self {
        Self {
            bounds: Aabb::empty(),
            count: 0,
        }
    }

    pub fn has_measurement(&self) -> bool {
        self.count > 0 && !self.bounds.is_empty()
    }
}

impl Default for UnionResult {
    fn default() -> Self {
        Self::none()
    }
}

/// Reduce a batch of identifiers into a union bounding box.
///
/// `lookup` resolves one identifier to its world box; identifiers that fail
/// to resolve or resolve to an empty box are skipped and do not count.
/// Pure and order-independent; no per-item failure escapes.
pub fn aggregate_bounds<I, F>(ids: I, mut lookup: F) -> UnionResult
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> Option<Aabb>,
{
    let mut bounds = Aabb::empty();
    let mut count = 0;

    for id in ids {
        let Some(found) = lookup(&id) else { continue };
        if found.is_empty() {
            continue;
        }
        bounds.expand(&found);
        count += 1;
    }

    if count == 0 {
        return UnionResult::none();
    }
    UnionResult { bounds, count }
}
