//! Integration tests for tracks: CRUD, listens, listings and search.

use sqlx::PgPool;
use soundloft_core::search::contains_pattern;
use soundloft_db::models::reaction::Reaction;
use soundloft_db::models::track::{CreateTrack, UpdateTrack};
use soundloft_db::models::user::CreateUser;
use soundloft_db::repositories::{ReactionRepo, TrackRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            is_creator: true,
            is_listener: true,
            creator_since: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_track(title: &str, genre: Option<&str>) -> CreateTrack {
    CreateTrack {
        title: title.to_string(),
        audio_file: format!("tracks/{title}.mp3"),
        cover_art: None,
        genre: genre.map(str::to_string),
        bpm: None,
        duration: None,
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_track_defaults(pool: PgPool) {
    let owner = seed_user(&pool, "alice").await;
    let track = TrackRepo::create(&pool, owner, &new_track("Song", None))
        .await
        .unwrap();

    assert_eq!(track.user_id, owner);
    assert_eq!(track.genre, "");
    assert_eq!(track.listens_count, 0);
    assert!(track.bpm.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_are_owner_scoped(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let track = TrackRepo::create(&pool, alice, &new_track("Song", Some("Rock")))
        .await
        .unwrap();

    let patch = UpdateTrack {
        bpm: Some(Some(128)),
        ..Default::default()
    };
    assert!(TrackRepo::update(&pool, track.id, bob, &patch)
        .await
        .unwrap()
        .is_none());
    assert!(TrackRepo::delete(&pool, track.id, bob).await.unwrap().is_none());

    let updated = TrackRepo::update(&pool, track.id, alice, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.bpm, Some(128));
    assert_eq!(updated.title, "Song");
    assert_eq!(updated.genre, "Rock");

    let removed = TrackRepo::delete(&pool, track.id, alice).await.unwrap().unwrap();
    assert_eq!(removed.audio_file, "tracks/Song.mp3");
    assert!(TrackRepo::find_by_id(&pool, track.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_can_clear_nullable_columns(pool: PgPool) {
    let owner = seed_user(&pool, "alice").await;
    let mut input = new_track("Song", Some("Lo-fi"));
    input.cover_art = Some("covers/song.png".to_string());
    input.bpm = Some(70);
    input.duration = Some(180.5);
    let track = TrackRepo::create(&pool, owner, &input).await.unwrap();

    // Fields left as `None` keep their values.
    let kept = TrackRepo::update(
        &pool,
        track.id,
        owner,
        &UpdateTrack {
            title: Some("Renamed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(kept.bpm, Some(70));
    assert_eq!(kept.cover_art.as_deref(), Some("covers/song.png"));

    let cleared = TrackRepo::update(
        &pool,
        track.id,
        owner,
        &UpdateTrack {
            cover_art: Some(None),
            genre: Some(String::new()),
            bpm: Some(None),
            duration: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.title, "Renamed");
    assert_eq!(cleared.genre, "");
    assert!(cleared.cover_art.is_none());
    assert!(cleared.bpm.is_none());
    assert!(cleared.duration.is_none());
}

// ---------------------------------------------------------------------------
// Listens
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_each_listen_increments_by_one(pool: PgPool) {
    let owner = seed_user(&pool, "alice").await;
    let track = TrackRepo::create(&pool, owner, &new_track("Song", None))
        .await
        .unwrap();

    for expected in 1..=5 {
        let count = TrackRepo::record_listen(&pool, track.id).await.unwrap();
        assert_eq!(count, Some(expected));
    }

    assert_eq!(TrackRepo::record_listen(&pool, 999_999).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_listens_are_not_lost(pool: PgPool) {
    let owner = seed_user(&pool, "alice").await;
    let track = TrackRepo::create(&pool, owner, &new_track("Song", None))
        .await
        .unwrap();

    let (a, b, c, d) = tokio::join!(
        TrackRepo::record_listen(&pool, track.id),
        TrackRepo::record_listen(&pool, track.id),
        TrackRepo::record_listen(&pool, track.id),
        TrackRepo::record_listen(&pool, track.id),
    );
    for result in [a, b, c, d] {
        assert!(result.unwrap().is_some());
    }

    let stored = TrackRepo::find_by_id(&pool, track.id).await.unwrap().unwrap();
    assert_eq!(stored.listens_count, 4);
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feed_is_newest_first_with_viewer_flags(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let t1 = TrackRepo::create(&pool, alice, &new_track("First", None))
        .await
        .unwrap();
    let t2 = TrackRepo::create(&pool, bob, &new_track("Second", None))
        .await
        .unwrap();

    ReactionRepo::toggle(&pool, Reaction::Like, bob, t1.id)
        .await
        .unwrap();

    let feed = TrackRepo::feed(&pool, bob, 50, 0).await.unwrap();
    let ids: Vec<i64> = feed.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![t2.id, t1.id]);

    let first = &feed[1];
    assert_eq!(first.owner_username, "alice");
    assert_eq!(first.likes_count, 1);
    assert!(first.is_liked);
    assert_eq!(first.reposts_count, 0);
    assert!(!first.is_reposted);

    // Same track through another viewer's eyes.
    let as_alice = TrackRepo::find_listing(&pool, alice, t1.id).await.unwrap().unwrap();
    assert_eq!(as_alice.likes_count, 1);
    assert!(!as_alice.is_liked);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feed_pagination(pool: PgPool) {
    let owner = seed_user(&pool, "alice").await;
    for title in ["a", "b", "c"] {
        TrackRepo::create(&pool, owner, &new_track(title, None))
            .await
            .unwrap();
    }

    let page = TrackRepo::feed(&pool, owner, 2, 0).await.unwrap();
    let titles: Vec<&str> = page.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["c", "b"]);

    let rest = TrackRepo::feed(&pool, owner, 2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].title, "a");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_own_only_returns_owned_tracks(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    TrackRepo::create(&pool, alice, &new_track("Mine", None))
        .await
        .unwrap();
    TrackRepo::create(&pool, bob, &new_track("Theirs", None))
        .await
        .unwrap();

    let own = TrackRepo::list_own(&pool, alice).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].title, "Mine");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_title_genre_and_username(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let rockstar = seed_user(&pool, "rockstar").await;
    TrackRepo::create(&pool, alice, &new_track("Rock Anthem", None))
        .await
        .unwrap();
    TrackRepo::create(&pool, alice, &new_track("Jazz Night", Some("Classic ROCK")))
        .await
        .unwrap();
    TrackRepo::create(&pool, rockstar, &new_track("Untitled", Some("Ambient")))
        .await
        .unwrap();
    TrackRepo::create(&pool, alice, &new_track("Lullaby", Some("Folk")))
        .await
        .unwrap();

    let hits = TrackRepo::search(&pool, alice, &contains_pattern("rock"), 50, 0)
        .await
        .unwrap();
    let mut titles: Vec<&str> = hits.iter().map(|t| t.title.as_str()).collect();
    titles.sort_unstable();
    assert_eq!(titles, vec!["Jazz Night", "Rock Anthem", "Untitled"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_treats_wildcards_literally(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    TrackRepo::create(&pool, alice, &new_track("100% Pure", None))
        .await
        .unwrap();
    TrackRepo::create(&pool, alice, &new_track("1000 Pure", None))
        .await
        .unwrap();

    let hits = TrackRepo::search(&pool, alice, &contains_pattern("100%"), 50, 0)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "100% Pure");
}
