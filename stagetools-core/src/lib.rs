/// Stage Tools Core Library - Scene-graph measurement and editing logic
///
/// This library provides the stateless core functionality for the stage
/// tools: an in-memory scene document, bounding-box aggregation across a
/// multi-selection, unit-scaled measurement formatting, alignment and
/// drop-to-ground transform edits, batch asset referencing, and a parser
/// for the ASCII stage format.

pub mod align;
pub mod bounds;
pub mod error;
pub mod measure;
pub mod refs;
pub mod scene;
pub mod stagefile;
pub mod units;

// Re-export commonly used types
pub use align::{align, drop_to_ground, AlignMode};
pub use bounds::{aggregate_bounds, Aabb, UnionResult};
pub use error::Error;
pub use measure::MeasureSession;
pub use refs::apply_reference_by_prefix;
pub use scene::{Axis, Prim, PrimPath, Stage};
pub use stagefile::parse_stage;
pub use units::UnitScale;
