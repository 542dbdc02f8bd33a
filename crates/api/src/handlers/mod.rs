pub mod auth;
pub mod feed;
pub mod profile;
pub mod projects;
pub mod social;
pub mod tracks;
