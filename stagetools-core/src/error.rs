/// Error taxonomy for stage operations
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No stage is open; mutating operations require a live document.
    #[error("no stage is open")]
    MissingDocument,

    /// A path that must resolve (e.g. the parent of a reference batch)
    /// does not exist on the stage.
    #[error("prim path not found: {0}")]
    InvalidPath(String),

    /// A meters-per-unit factor that is zero, negative, or non-finite.
    /// The one unit condition surfaced to callers instead of producing
    /// a degenerate number.
    #[error("invalid unit configuration: meters-per-unit {meters_per_unit} must be positive and finite")]
    InvalidUnitConfiguration { meters_per_unit: f64 },

    /// User-provided input that cannot be acted on (empty prefix, empty URL).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Stage file syntax error.
    #[error("failed to parse stage file: {0}")]
    Parse(String),
}
