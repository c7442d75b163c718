use super::*;

/// Tests finding an existing activity row.
///
/// Expected: Ok(Some) with the stored values
#[tokio::test]
async fn finds_existing_row() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_session_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = SessionActivityFactory::new(db)
        .views(3)
        .user_id("agent-9")
        .build()
        .await?;

    let repo = SessionActivityRepository::new(db);
    let activity = repo.find_by_session_id(&row.session_id).await?.unwrap();

    assert_eq!(activity.views, 3);
    assert_eq!(activity.user_id.as_deref(), Some("agent-9"));

    Ok(())
}

/// Tests looking up a session that was never recorded.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_session() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_session_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SessionActivityRepository::new(db);
    let activity = repo.find_by_session_id("missing").await?;

    assert!(activity.is_none());

    Ok(())
}

/// Tests that lookups are keyed by session id only.
///
/// Expected: each session id returns its own row
#[tokio::test]
async fn distinguishes_sessions() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_session_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = test_utils::factory::create_session_activity(db).await?;
    let second = SessionActivityFactory::new(db).views(8).build().await?;

    let repo = SessionActivityRepository::new(db);
    let found_first = repo.find_by_session_id(&first.session_id).await?.unwrap();
    let found_second = repo.find_by_session_id(&second.session_id).await?.unwrap();

    assert_eq!(found_first.views, 1);
    assert_eq!(found_second.views, 8);

    Ok(())
}
