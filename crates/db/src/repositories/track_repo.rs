//! Repository for the `tracks` table and the enriched track listings.

use sqlx::PgPool;
use soundloft_core::types::DbId;

use crate::models::reaction::Reaction;
use crate::models::track::{CreateTrack, Track, TrackListing, UpdateTrack};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, audio_file, cover_art, genre, bpm, duration, \
                        listens_count, created_at, updated_at";

/// Projection for [`TrackListing`]. `$1` is always the viewing user's id;
/// callers append joins, filters and ordering.
const LISTING_SELECT: &str = "SELECT t.id, t.user_id, u.username AS owner_username, \
        u.profile_picture AS owner_profile_picture, t.title, t.audio_file, t.cover_art, \
        t.genre, t.bpm, t.duration, t.listens_count, t.created_at, \
        (SELECT COUNT(*) FROM likes l WHERE l.track_id = t.id) AS likes_count, \
        EXISTS (SELECT 1 FROM likes l WHERE l.track_id = t.id AND l.user_id = $1) AS is_liked, \
        (SELECT COUNT(*) FROM reposts r WHERE r.track_id = t.id) AS reposts_count, \
        EXISTS (SELECT 1 FROM reposts r WHERE r.track_id = t.id AND r.user_id = $1) AS is_reposted \
     FROM tracks t \
     JOIN users u ON u.id = t.user_id";

/// Newest first; `id` breaks ties between rows created in the same instant.
const NEWEST_FIRST: &str = "ORDER BY t.created_at DESC, t.id DESC";

/// Provides CRUD, listen counting, and listing queries for tracks.
pub struct TrackRepo;

impl TrackRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new track owned by `user_id`. `listens_count` starts at 0.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTrack,
    ) -> Result<Track, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracks (user_id, title, audio_file, cover_art, genre, bpm, duration)
             VALUES ($1, $2, $3, $4, COALESCE($5, ''), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.audio_file)
            .bind(&input.cover_art)
            .bind(&input.genre)
            .bind(input.bpm)
            .bind(input.duration)
            .fetch_one(pool)
            .await
    }

    /// Find a track by its internal ID, regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a track owned by `owner_id`. Only non-`None` fields are applied.
    ///
    /// Nullable columns go through a `CASE` on a "was sent" flag rather than
    /// `COALESCE`, so an explicit `Some(None)` stores NULL.
    ///
    /// Returns `None` if the track does not exist or belongs to someone else.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateTrack,
    ) -> Result<Option<Track>, sqlx::Error> {
        let query = format!(
            "UPDATE tracks SET
                title = COALESCE($3, title),
                audio_file = COALESCE($4, audio_file),
                cover_art = CASE WHEN $5 THEN $6 ELSE cover_art END,
                genre = COALESCE($7, genre),
                bpm = CASE WHEN $8 THEN $9 ELSE bpm END,
                duration = CASE WHEN $10 THEN $11 ELSE duration END
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.audio_file)
            .bind(input.cover_art.is_some())
            .bind(input.cover_art.as_ref().and_then(|c| c.as_deref()))
            .bind(&input.genre)
            .bind(input.bpm.is_some())
            .bind(input.bpm.flatten())
            .bind(input.duration.is_some())
            .bind(input.duration.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a track owned by `owner_id`, returning the removed row so the
    /// caller can release its blobs. Likes and reposts cascade.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Track>, sqlx::Error> {
        let query =
            format!("DELETE FROM tracks WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    // ── Play counting ────────────────────────────────────────────────

    /// Atomically add one play. Returns the new count, or `None` if the track
    /// does not exist. Every call counts; there is no de-duplication.
    pub async fn record_listen(pool: &PgPool, id: DbId) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE tracks SET listens_count = listens_count + 1
             WHERE id = $1
             RETURNING listens_count",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(count,)| count))
    }

    // ── Listings (viewer-relative) ───────────────────────────────────

    /// One track with stats relative to `viewer_id`, regardless of owner.
    pub async fn find_listing(
        pool: &PgPool,
        viewer_id: DbId,
        id: DbId,
    ) -> Result<Option<TrackListing>, sqlx::Error> {
        let query = format!("{LISTING_SELECT} WHERE t.id = $2");
        sqlx::query_as::<_, TrackListing>(&query)
            .bind(viewer_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All tracks owned by `viewer_id`, newest first.
    pub async fn list_own(
        pool: &PgPool,
        viewer_id: DbId,
    ) -> Result<Vec<TrackListing>, sqlx::Error> {
        let query = format!("{LISTING_SELECT} WHERE t.user_id = $1 {NEWEST_FIRST}");
        sqlx::query_as::<_, TrackListing>(&query)
            .bind(viewer_id)
            .fetch_all(pool)
            .await
    }

    /// All tracks across all users, newest first.
    pub async fn feed(
        pool: &PgPool,
        viewer_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TrackListing>, sqlx::Error> {
        let query = format!("{LISTING_SELECT} {NEWEST_FIRST} LIMIT $2 OFFSET $3");
        sqlx::query_as::<_, TrackListing>(&query)
            .bind(viewer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Tracks whose title, genre or owner username matches `pattern`
    /// (an `ILIKE` pattern built by `soundloft_core::search::contains_pattern`).
    pub async fn search(
        pool: &PgPool,
        viewer_id: DbId,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TrackListing>, sqlx::Error> {
        let query = format!(
            "{LISTING_SELECT} \
             WHERE t.title ILIKE $2 ESCAPE '\\' \
                OR t.genre ILIKE $2 ESCAPE '\\' \
                OR u.username ILIKE $2 ESCAPE '\\' \
             {NEWEST_FIRST} LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, TrackListing>(&query)
            .bind(viewer_id)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Tracks `viewer_id` has liked or reposted, most recent reaction first.
    pub async fn list_reacted(
        pool: &PgPool,
        viewer_id: DbId,
        reaction: Reaction,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TrackListing>, sqlx::Error> {
        let table = reaction.table();
        let query = format!(
            "{LISTING_SELECT} \
             JOIN {table} mine ON mine.track_id = t.id AND mine.user_id = $1 \
             ORDER BY mine.created_at DESC, mine.id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, TrackListing>(&query)
            .bind(viewer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
