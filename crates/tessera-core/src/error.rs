use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Malformed or contradictory window/origin/grid specification.
    #[error("Shape error: {0}")]
    Shape(String),

    /// Parameter has the wrong value domain (non-integer size, complex origin).
    #[error("Type error: {0}")]
    Type(String),

    /// Parameter has the right type and shape but is out of range.
    #[error("Value error: {0}")]
    Value(String),

    #[error("Halo extension failed: {0}")]
    HaloExtension(String),

    #[error("Order-statistic kernel failed: {0}")]
    Kernel(String),

    #[error("Invalid filter configuration: {0}")]
    Config(String),
}

/// Coarse classification of a [`FilterError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Shape,
    Type,
    Value,
    Runtime,
}

impl FilterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilterError::Shape(_) | FilterError::Config(_) => ErrorKind::Shape,
            FilterError::Type(_) => ErrorKind::Type,
            FilterError::Value(_) => ErrorKind::Value,
            FilterError::HaloExtension(_) | FilterError::Kernel(_) => ErrorKind::Runtime,
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
