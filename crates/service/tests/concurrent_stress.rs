//! Concurrent access tests against real files.
//!
//! Every test runs on the multi-threaded runtime and spawns its callers with a
//! `JoinSet`, so the per-resource locks are exercised by parallel workers.

use std::{path::PathBuf, sync::Arc};

use serde_json::json;
use service::{
    auth::{Argon2Hasher, CredentialStore},
    errors::StoreError,
    file::SettingsStore,
    leaderboard::{LeaderboardStore, ScoreSubmission, MAX_ENTRIES_PER_SONG},
    storage::TokioFs,
};
use tokio::task::JoinSet;

const CONCURRENCY: usize = 16;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("beatboard_{name}_{}.json", uuid::Uuid::new_v4()))
}

fn cheap_hasher() -> Arc<Argon2Hasher> {
    Arc::new(Argon2Hasher::with_params(8, 1, 1).expect("argon2 params"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_username_signup_has_exactly_one_winner() {
    let path = temp_path("users_race");
    let store = Arc::new(CredentialStore::new(&path, Arc::new(TokioFs), cheap_hasher()));

    let mut set = JoinSet::new();
    for i in 0..CONCURRENCY {
        let store = store.clone();
        set.spawn(async move { store.register("racer", &format!("pw-{i}")).await.map(|_| i) });
    }

    let mut winners = Vec::new();
    let mut conflicts = 0;
    while let Some(res) = set.join_next().await {
        match res.expect("task should not panic") {
            Ok(i) => winners.push(i),
            Err(StoreError::AlreadyExists(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(winners.len(), 1);
    assert_eq!(conflicts, CONCURRENCY - 1);

    // the winner's password is the one stored
    store.authenticate("racer", &format!("pw-{}", winners[0])).await.expect("winner authenticates");

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_signups_all_persist() {
    let path = temp_path("users_many");
    let store = Arc::new(CredentialStore::new(&path, Arc::new(TokioFs), cheap_hasher()));

    let mut set = JoinSet::new();
    for i in 0..CONCURRENCY {
        let store = store.clone();
        set.spawn(async move { store.register(&format!("user{i}"), "pw").await });
    }
    while let Some(res) = set.join_next().await {
        res.expect("task should not panic").expect("register should succeed");
    }

    let reopened = CredentialStore::new(&path, Arc::new(TokioFs), cheap_hasher());
    for i in 0..CONCURRENCY {
        reopened.authenticate(&format!("user{i}"), "pw").await.expect("authenticate");
    }

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_submits_to_one_song_lose_nothing() {
    let path = temp_path("rankings_race");
    let store = Arc::new(LeaderboardStore::new(&path, Arc::new(TokioFs)));
    let n = MAX_ENTRIES_PER_SONG;

    let mut set = JoinSet::new();
    for i in 0..n {
        let store = store.clone();
        set.spawn(async move { store.submit("song", ScoreSubmission::new(format!("player{i:03}"), (i % 7) as i64)).await });
    }
    while let Some(res) = set.join_next().await {
        let rank = res.expect("task should not panic").expect("submit should succeed");
        assert!(rank.is_some());
    }

    let board = store.collection("song").await.expect("read board");
    assert_eq!(board.len(), n);
    let mut users: Vec<_> = board.iter().map(|e| e.username.clone()).collect();
    users.sort();
    users.dedup();
    assert_eq!(users.len(), n);
    assert!(board.windows(2).all(|w| w[0].cmp_score(&w[1]) != std::cmp::Ordering::Less));

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_partial_documents() {
    let path = temp_path("settings_rw");
    let store = Arc::new(SettingsStore::new(&path, Arc::new(TokioFs)));
    store.put("alice", json!({"round": 0})).await.expect("seed");

    let mut set = JoinSet::new();
    for task in 0..CONCURRENCY {
        let store = store.clone();
        set.spawn(async move {
            for round in 0..20 {
                if task % 2 == 0 {
                    store.put(&format!("user{task}"), json!({"round": round, "pad": "x".repeat(512)})).await?;
                } else {
                    // a torn read would surface as CorruptDocument here
                    let s = store.get("alice").await?;
                    assert_eq!(s, json!({"round": 0}));
                }
            }
            Ok::<_, StoreError>(())
        });
    }
    while let Some(res) = set.join_next().await {
        res.expect("task should not panic").expect("no store errors");
    }

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_resources_progress_independently() {
    let users = temp_path("users_indep");
    let rankings = temp_path("rankings_indep");
    let creds = Arc::new(CredentialStore::new(&users, Arc::new(TokioFs), cheap_hasher()));
    let board = Arc::new(LeaderboardStore::new(&rankings, Arc::new(TokioFs)));

    let mut set = JoinSet::new();
    for i in 0..CONCURRENCY {
        let creds = creds.clone();
        let board = board.clone();
        set.spawn(async move {
            creds.register(&format!("u{i}"), "pw").await?;
            board.submit("song", ScoreSubmission::new(format!("u{i}"), i as i64)).await?;
            Ok::<_, StoreError>(())
        });
    }
    while let Some(res) = set.join_next().await {
        res.expect("task should not panic").expect("operations succeed");
    }
    assert_eq!(board.collection("song").await.expect("board").len(), CONCURRENCY);
    assert!(creds.contains("u0").await.expect("lookup"));

    let _ = tokio::fs::remove_file(&users).await;
    let _ = tokio::fs::remove_file(&rankings).await;
}
