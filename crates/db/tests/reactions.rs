//! Integration tests for like/repost toggles and the liked/reposted listings.

use sqlx::PgPool;
use soundloft_db::models::reaction::{Reaction, ToggleOutcome};
use soundloft_db::models::track::CreateTrack;
use soundloft_db::models::user::CreateUser;
use soundloft_db::repositories::{ReactionRepo, TrackRepo, UserRepo};

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            is_creator: false,
            is_listener: true,
            creator_since: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_track(pool: &PgPool, owner: i64, title: &str) -> i64 {
    TrackRepo::create(
        pool,
        owner,
        &CreateTrack {
            title: title.to_string(),
            audio_file: format!("tracks/{title}.wav"),
            cover_art: None,
            genre: None,
            bpm: None,
            duration: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn table(reaction: Reaction) -> &'static str {
    match reaction {
        Reaction::Like => "likes",
        Reaction::Repost => "reposts",
    }
}

async fn count(pool: &PgPool, reaction: Reaction, track: i64) -> i64 {
    sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {} WHERE track_id = $1",
        table(reaction)
    ))
    .bind(track)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn exists(pool: &PgPool, reaction: Reaction, user: i64, track: i64) -> bool {
    sqlx::query_scalar(&format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = $1 AND track_id = $2)",
        table(reaction)
    ))
    .bind(user)
    .bind(track)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_twice_restores_state(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let track = seed_track(&pool, user, "Song").await;

    for reaction in [Reaction::Like, Reaction::Repost] {
        let on = ReactionRepo::toggle(&pool, reaction, user, track)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(on, ToggleOutcome { active: true, count: 1 });
        assert!(exists(&pool, reaction, user, track).await);

        let off = ReactionRepo::toggle(&pool, reaction, user, track)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(off, ToggleOutcome { active: false, count: 0 });
        assert!(!exists(&pool, reaction, user, track).await);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_likes_and_reposts_are_independent(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let track = seed_track(&pool, user, "Song").await;

    ReactionRepo::toggle(&pool, Reaction::Like, user, track)
        .await
        .unwrap();

    assert_eq!(count(&pool, Reaction::Like, track).await, 1);
    assert_eq!(count(&pool, Reaction::Repost, track).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_on_missing_track_returns_none(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let outcome = ReactionRepo::toggle(&pool, Reaction::Like, user, 999_999)
        .await
        .unwrap();
    assert!(outcome.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_toggles_never_duplicate(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    let track = seed_track(&pool, user, "Song").await;

    let (a, b) = tokio::join!(
        ReactionRepo::toggle(&pool, Reaction::Like, user, track),
        ReactionRepo::toggle(&pool, Reaction::Like, user, track),
    );
    assert!(a.unwrap().is_some());
    assert!(b.unwrap().is_some());

    let count = count(&pool, Reaction::Like, track).await;
    assert!(count <= 1, "at most one like per (user, track), got {count}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_many_users_like_the_same_track(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let track = seed_track(&pool, owner, "Song").await;

    let mut last = None;
    for name in ["u1", "u2", "u3"] {
        let user = seed_user(&pool, name).await;
        last = ReactionRepo::toggle(&pool, Reaction::Like, user, track)
            .await
            .unwrap();
    }
    assert_eq!(last, Some(ToggleOutcome { active: true, count: 3 }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_liked_list_is_ordered_by_reaction_time(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let fan = seed_user(&pool, "fan").await;
    let older = seed_track(&pool, owner, "Older").await;
    let newer = seed_track(&pool, owner, "Newer").await;

    // Like the newer track first, then the older one.
    ReactionRepo::toggle(&pool, Reaction::Like, fan, newer)
        .await
        .unwrap();
    ReactionRepo::toggle(&pool, Reaction::Like, fan, older)
        .await
        .unwrap();

    let liked = TrackRepo::list_reacted(&pool, fan, Reaction::Like, 50, 0)
        .await
        .unwrap();
    let ids: Vec<i64> = liked.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![older, newer]);
    assert!(liked.iter().all(|t| t.is_liked));

    let reposted = TrackRepo::list_reacted(&pool, fan, Reaction::Repost, 50, 0)
        .await
        .unwrap();
    assert!(reposted.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_track_cascades_reactions(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let fan = seed_user(&pool, "fan").await;
    let track = seed_track(&pool, owner, "Song").await;

    ReactionRepo::toggle(&pool, Reaction::Repost, fan, track)
        .await
        .unwrap();
    TrackRepo::delete(&pool, track, owner).await.unwrap().unwrap();

    let reposted = TrackRepo::list_reacted(&pool, fan, Reaction::Repost, 50, 0)
        .await
        .unwrap();
    assert!(reposted.is_empty());
    assert_eq!(count(&pool, Reaction::Repost, track).await, 0);
}

/// A toggle racing the track's deletion either lands first (and cascades
/// away) or finds the track gone; it never surfaces a foreign key error.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_racing_track_delete(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let fan = seed_user(&pool, "fan").await;

    for round in 0..10 {
        let track = seed_track(&pool, owner, &format!("Song {round}")).await;

        let (toggled, deleted) = tokio::join!(
            ReactionRepo::toggle(&pool, Reaction::Like, fan, track),
            TrackRepo::delete(&pool, track, owner),
        );
        toggled.unwrap();
        assert!(deleted.unwrap().is_some());
        assert_eq!(count(&pool, Reaction::Like, track).await, 0);
    }
}
