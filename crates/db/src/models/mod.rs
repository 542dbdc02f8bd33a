//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod project;
pub mod project_file;
pub mod reaction;
pub mod session;
pub mod track;
pub mod user;
