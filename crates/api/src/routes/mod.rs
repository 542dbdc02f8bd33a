pub mod auth;
pub mod discovery;
pub mod health;
pub mod profile;
pub mod projects;
pub mod tracks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /register                                        register (public)
/// /login                                           login (public)
/// /refresh                                         refresh (public)
/// /logout                                          logout
///
/// /profile                                         get, put, patch
/// /profile/picture                                 upload picture (POST, multipart)
///
/// /tracks                                          list own, create (multipart)
/// /tracks/{id}                                     get, put, patch, delete
/// /tracks/{id}/like                                toggle like (POST)
/// /tracks/{id}/repost                              toggle repost (POST)
/// /tracks/{id}/listen                              count a play (POST)
///
/// /feed                                            all tracks, newest first
/// /search?q=                                       title/genre/username search
/// /liked                                           tracks the caller liked
/// /reposted                                        tracks the caller reposted
///
/// /projects                                        list, create
/// /projects/{id}                                   get, put, patch, delete
/// /projects/{id}/files                             list stems
/// /projects/{id}/upload                            upload stem (POST, multipart)
/// /projects/{id}/files/{file_id}                   delete stem
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(discovery::router())
        .nest("/profile", profile::router())
        .nest("/tracks", tracks::router())
        .nest("/projects", projects::router())
}
