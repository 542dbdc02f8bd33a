//! Ownership policy applied before every read or mutation of a user-owned row.
//!
//! Absent rows and rows owned by another user produce the same
//! [`CoreError::NotFound`], so a non-owner learns nothing about which ids
//! exist.

use crate::error::CoreError;
use crate::types::DbId;

/// A row that belongs to exactly one user for authorization purposes.
pub trait Owned {
    fn owner_id(&self) -> DbId;
}

/// Return `row` if it exists and belongs to `requester`, otherwise `NotFound`.
pub fn ensure_owner<T: Owned>(
    entity: &'static str,
    id: DbId,
    row: Option<T>,
    requester: DbId,
) -> Result<T, CoreError> {
    match row {
        Some(row) if row.owner_id() == requester => Ok(row),
        _ => Err(CoreError::NotFound { entity, id }),
    }
}
