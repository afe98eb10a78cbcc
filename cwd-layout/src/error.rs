/// Error types for the layout engine
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Radius must be finite and positive
    #[error("Circle {id} has invalid radius {r}")]
    InvalidRadius { id: usize, r: f64 },

    /// Two input circles share an id
    #[error("Duplicate circle id: {0}")]
    DuplicateId(usize),
}

/// Type alias for Results using LayoutError
pub type Result<T> = std::result::Result<T, LayoutError>;
