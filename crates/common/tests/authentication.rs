//! Credential lifecycle and auth gating

mod common;

use ::common::prelude::*;

#[tokio::test]
async fn session_calls_require_login() {
    let (session, _store, _credentials) = common::setup();

    assert!(matches!(
        session.list().await,
        Err(SessionError::AuthRequired)
    ));
    assert!(matches!(
        session.open("_posts/2024-03-01-hello-world.md").await,
        Err(SessionError::AuthRequired)
    ));
    assert!(matches!(
        session.save(&common::sample_post()).await,
        Err(SessionError::AuthRequired)
    ));
}

#[tokio::test]
async fn store_without_credential_performs_no_write() {
    let (_session, store, _credentials) = common::setup();

    let result = store.write("_posts/x.md", "text", "Create post: x", None).await;
    assert!(matches!(result, Err(StoreError::AuthRequired)));
    assert_eq!(store.file_count(), 0);
}

#[tokio::test]
async fn login_resolves_the_owner_identity() {
    let (session, _store, _credentials) = common::setup();

    let identity = common::login(&session).await;
    assert_eq!(identity, common::OWNER);
    assert_eq!(session.identity().as_deref(), Some(common::OWNER));
}

#[tokio::test]
async fn login_with_foreign_identity_clears_the_slot() {
    let (session, _store, credentials) = common::setup();
    credentials.accept("other-token", "someone-else");

    let result = session.login(Credential::new("other-token")).await;
    assert!(matches!(result, Err(SessionError::AuthRequired)));
    // mismatch drops the credential so it is never retried
    assert!(credentials.token().is_none());
    assert!(session.identity().is_none());
}

#[tokio::test]
async fn login_with_unknown_token_clears_the_slot() {
    let (session, _store, credentials) = common::setup();

    let result = session.login(Credential::new("bogus")).await;
    assert!(matches!(result, Err(SessionError::AuthRequired)));
    assert!(credentials.token().is_none());
}

#[tokio::test]
async fn reauthentication_keeps_the_open_document() {
    let (session, _store, _credentials) = common::setup();
    common::login(&session).await;
    let saved = session.save(&common::sample_post()).await.unwrap();

    // a fresh logical session re-validates the persisted token
    session.authenticate().await.unwrap();
    assert_eq!(
        session.open_document().map(|d| d.path),
        Some(saved.path)
    );
}

#[tokio::test]
async fn revoked_token_drops_the_session() {
    let (session, _store, credentials) = common::setup();
    common::login(&session).await;
    session.save(&common::sample_post()).await.unwrap();

    credentials.revoke(common::TOKEN);

    assert!(matches!(
        session.authenticate().await,
        Err(SessionError::AuthRequired)
    ));
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(credentials.token().is_none());
}

#[tokio::test]
async fn logout_discards_credential_and_open_document() {
    let (session, _store, credentials) = common::setup();
    common::login(&session).await;
    session.save(&common::sample_post()).await.unwrap();

    session.logout().unwrap();
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(credentials.token().is_none());
    assert!(session.open_document().is_none());

    // idempotent
    session.logout().unwrap();
}
