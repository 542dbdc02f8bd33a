//! Repository for the `likes` and `reposts` tables.

use sqlx::PgPool;
use soundloft_core::types::DbId;

use crate::models::reaction::{Reaction, ToggleOutcome};

/// Provides the atomic toggle for likes and reposts.
pub struct ReactionRepo;

impl ReactionRepo {
    /// Flip the (user, track) relation in a single transaction.
    ///
    /// Deletes the row if present, otherwise inserts it with
    /// `ON CONFLICT DO NOTHING`. A concurrent toggle that races the insert
    /// blocks on the unique index and then observes the row, so the table
    /// never holds two rows for the pair and the loser does not error.
    ///
    /// The track row is held `FOR KEY SHARE` until commit, so a concurrent
    /// delete waits for the toggle instead of failing its foreign key.
    ///
    /// Returns `None` if the track does not exist.
    pub async fn toggle(
        pool: &PgPool,
        reaction: Reaction,
        user_id: DbId,
        track_id: DbId,
    ) -> Result<Option<ToggleOutcome>, sqlx::Error> {
        let table = reaction.table();
        let mut tx = pool.begin().await?;

        let track: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM tracks WHERE id = $1 FOR KEY SHARE")
                .bind(track_id)
                .fetch_optional(&mut *tx)
                .await?;
        if track.is_none() {
            return Ok(None);
        }

        let removed = sqlx::query(&format!(
            "DELETE FROM {table} WHERE user_id = $1 AND track_id = $2"
        ))
        .bind(user_id)
        .bind(track_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        if !removed {
            sqlx::query(&format!(
                "INSERT INTO {table} (user_id, track_id) VALUES ($1, $2)
                 ON CONFLICT (user_id, track_id) DO NOTHING"
            ))
            .bind(user_id)
            .bind(track_id)
            .execute(&mut *tx)
            .await?;
        }

        let (count,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM {table} WHERE track_id = $1"))
                .bind(track_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(Some(ToggleOutcome {
            active: !removed,
            count,
        }))
    }
}
