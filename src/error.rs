use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    /// A required field of a submission was empty.
    #[error("missing required field: {field}")]
    Validation { field: &'static str },

    #[error("{criterion} rating {value} is outside 1..=5")]
    InvalidRating { criterion: &'static str, value: f64 },
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: u32) -> Self {
        CatalogError::NotFound { entity, id }
    }
}
