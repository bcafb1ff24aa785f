use thiserror::Error;

/// Errors raised while interpreting model schemas or hydrating graph records.
///
/// None of these involve the database: they are raised before a request is
/// issued, or while mapping rows the session already returned.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Absent or ambiguous record, unknown field, or a value of the wrong shape.
    #[error("{0}")]
    InvalidValue(String),

    /// Malformed or missing relationship declaration on a model field.
    #[error("{0}")]
    InvalidRelationship(String),

    /// An edge type whose node or properties type fails structural validation.
    #[error("{0}")]
    InvalidEdgeType(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModelError {
    /// Relationship errors are a refinement of value errors.
    pub fn is_value_error(&self) -> bool {
        matches!(self, Self::InvalidValue(_) | Self::InvalidRelationship(_))
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
