//! Shared test utilities for editor session integration tests
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use ::common::prelude::*;
use ::common::testkit::{MemoryCredentials, MemoryStore};

pub const OWNER: &str = "pythontogo";
pub const TOKEN: &str = "ghp_test_token";

/// Set up a session over an in-memory store gated on an in-memory
/// credential slot, with one accepted token for the configured owner.
pub fn setup() -> (EditorSession, MemoryStore, MemoryCredentials) {
    let credentials = MemoryCredentials::new(OWNER);
    credentials.accept(TOKEN, OWNER);
    let store = MemoryStore::gated(credentials.clone());
    let session = EditorSession::new(
        Arc::new(store.clone()),
        Arc::new(credentials.clone()),
        "_posts",
    );
    (session, store, credentials)
}

pub async fn login(session: &EditorSession) -> String {
    session.login(Credential::new(TOKEN)).await.unwrap()
}

pub fn date(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

/// The worked example post: saves to `_posts/2024-03-01-hello-world.md`.
pub fn sample_post() -> Post {
    let mut post = Post::new("Hello World", date(2024, 3, 1, 9, 0));
    post.categories = vec!["Go".to_string()];
    post.tags = vec!["tutorial".to_string(), "go".to_string()];
    post.body = "content".to_string();
    post
}
