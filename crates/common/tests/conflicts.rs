//! Optimistic-concurrency behavior: stale revisions, duplicate paths,
//! back-to-back saves

mod common;

use ::common::prelude::*;

#[tokio::test]
async fn stale_revision_is_a_conflict_not_a_remote_error() {
    let (session, store, _credentials) = common::setup();
    common::login(&session).await;

    let path = "_posts/2024-03-01-hello-world.md";
    store.force_write(path, "v1");
    let stale = store.read(path).await.unwrap().revision;

    // another client moves the file forward
    store.force_write(path, "v2");

    let result = store
        .write(path, "v3", "Update post: Hello World", Some(&stale))
        .await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));
    // the losing write changed nothing
    assert_eq!(store.text_of(path).as_deref(), Some("v2"));
}

#[tokio::test]
async fn creating_over_an_existing_path_conflicts() {
    let (session, store, _credentials) = common::setup();
    common::login(&session).await;

    let post = common::sample_post();
    session.save(&post).await.unwrap();

    // operator starts a new document with the same title and date
    session.new_document().unwrap();
    let result = session.save(&post).await;
    assert!(matches!(
        result,
        Err(SessionError::Store(StoreError::Conflict(_)))
    ));
    // conflict surfaces without adopting the existing document
    assert!(session.open_document().is_none());
    assert_eq!(store.file_count(), 1);
}

#[tokio::test]
async fn back_to_back_saves_queue_instead_of_racing() {
    let (session, store, _credentials) = common::setup();
    common::login(&session).await;

    let mut post = common::sample_post();
    let first = session.save(&post).await.unwrap();

    // two updates issued concurrently on clones of the same session: the
    // save gate queues the second behind the first, so both observe a
    // fresh revision and neither write is lost to a stale one
    let mut a = post.clone();
    a.body = "version a".to_string();
    post.body = "version b".to_string();
    let (session_a, session_b) = (session.clone(), session.clone());
    let (ra, rb) = tokio::join!(session_a.save(&a), session_b.save(&post));
    let (ra, rb) = (ra.unwrap(), rb.unwrap());

    assert_eq!(ra.path, first.path);
    assert_eq!(rb.path, first.path);
    assert_ne!(ra.revision, rb.revision);

    // the store holds whichever save landed second
    let final_rev = store.revision_of(&first.path).unwrap();
    assert!(final_rev == ra.revision || final_rev == rb.revision);
}

#[tokio::test]
async fn update_refetches_the_latest_revision_before_writing() {
    let (session, store, _credentials) = common::setup();
    common::login(&session).await;

    let path = "_posts/2024-03-01-hello-world.md";
    let mut post = common::sample_post();
    session.save(&post).await.unwrap();
    session.open(path).await.unwrap();

    // remote edit after open: the save re-fetches the current revision
    // immediately before writing, so it succeeds rather than conflicting.
    // Only a change landing between the re-fetch and the write surfaces
    // as a conflict.
    store.force_write(path, "remote edit");

    post.body = "local edit".to_string();
    let saved = session.save(&post).await.unwrap();
    assert!(!saved.created);
    assert!(store.text_of(path).unwrap().contains("local edit"));
}

#[tokio::test]
async fn conflict_leaves_the_session_where_it_was() {
    let (session, store, _credentials) = common::setup();
    common::login(&session).await;

    let post = common::sample_post();
    let saved = session.save(&post).await.unwrap();

    // a second, unrelated document at the derived path for a new save
    let other = "_posts/2024-05-01-other.md";
    store.force_write(other, "occupied");
    session.new_document().unwrap();

    let mut clashing = post.clone();
    clashing.title = "Other".to_string();
    clashing.date = common::date(2024, 5, 1, 9, 0);
    assert!(matches!(
        session.save(&clashing).await,
        Err(SessionError::Store(StoreError::Conflict(_)))
    ));

    // prior state intact: still authenticated, no document adopted
    assert_eq!(session.identity().as_deref(), Some(common::OWNER));
    assert!(session.open_document().is_none());
    let _ = saved;
}
