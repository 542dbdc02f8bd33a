use crate::types::DbId;

/// Domain error shared by every layer.
///
/// The HTTP layer maps each variant to a status code; see `AppError` in the
/// api crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No such row, or a row owned by someone else. Both cases use this
    /// variant so callers cannot discover other users' ids.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Bad credentials or a missing/expired token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
