//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that mutate
//! user-owned rows take the owner id and filter on it in SQL, so a
//! mismatched owner affects no rows.

pub mod project_file_repo;
pub mod project_repo;
pub mod reaction_repo;
pub mod session_repo;
pub mod track_repo;
pub mod user_repo;

pub use project_file_repo::ProjectFileRepo;
pub use project_repo::ProjectRepo;
pub use reaction_repo::ReactionRepo;
pub use session_repo::SessionRepo;
pub use track_repo::TrackRepo;
pub use user_repo::UserRepo;
