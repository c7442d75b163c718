use super::*;

/// Tests that a fresh session has no view count.
///
/// Expected: Ok(None)
#[tokio::test]
async fn new_session_has_no_views() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let session = test.session().await?;

    let activity = ActivitySession::new(session);

    assert_eq!(activity.get_views().await.unwrap(), None);

    Ok(())
}

/// Tests storing and reading back the view count.
///
/// Expected: Ok(Some(4))
#[tokio::test]
async fn stores_views() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let session = test.session().await?;

    let activity = ActivitySession::new(session);
    activity.set_views(4).await.unwrap();

    assert_eq!(activity.get_views().await.unwrap(), Some(4));

    Ok(())
}

/// Tests that a new session receives an id once it is persisted.
///
/// Expected: Ok with a non-empty id that stays stable across calls
#[tokio::test]
async fn ensure_session_id_persists_new_session() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let session = test.session().await?;

    assert!(session.id().is_none());

    let first = ensure_session_id(session).await.unwrap();
    let second = ensure_session_id(session).await.unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);

    Ok(())
}
