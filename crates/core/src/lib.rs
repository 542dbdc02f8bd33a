//! Domain logic shared by the database and HTTP layers.
//!
//! Nothing in this crate talks to PostgreSQL or HTTP. Modules hold the
//! policies (ownership, creator-role transitions), input validation, and the
//! blob-store port that the outer crates plug into.

pub mod accounts;
pub mod arrangement;
pub mod catalog;
pub mod error;
pub mod ownership;
pub mod search;
pub mod storage;
pub mod types;
