use super::*;

/// Tests that static files are served before the session stage.
///
/// Expected: 200 with the file contents and no session cookie
#[tokio::test]
async fn static_file_is_served_without_session() -> Result<(), TestError> {
    let app = TestApp::new(FeatureRouters::default()).await?;
    std::fs::create_dir_all(app.public_dir.path().join("css")).unwrap();
    std::fs::write(
        app.public_dir.path().join("css/style.css"),
        "body { margin: 0; }",
    )
    .unwrap();
    let (logs, _guard) = LogCapture::install();

    let response = app.call(Method::GET, "/css/style.css", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "body { margin: 0; }");
    assert!(response.cookie.is_none());
    assert!(!logs.contents().contains("Session created at"));

    Ok(())
}

/// Tests that a static file shadows a feature route with the same path.
///
/// Expected: the file is returned, the feature router is never invoked
#[tokio::test]
async fn static_file_wins_over_feature_route() -> Result<(), TestError> {
    let hits = Arc::new(AtomicUsize::new(0));
    let features = FeatureRouters {
        auth: counting_router("/robots.txt", "from router", hits.clone()),
        ..FeatureRouters::default()
    };
    let app = TestApp::new(features).await?;
    std::fs::write(app.public_dir.path().join("robots.txt"), "User-agent: *").unwrap();

    let response = app.call(Method::GET, "/robots.txt", None).await;

    assert_eq!(response.body, "User-agent: *");
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    Ok(())
}

/// Tests a POST to the path of an existing static file.
///
/// Expected: the request continues down the pipeline and ends in 404
#[tokio::test]
async fn post_to_static_path_continues() -> Result<(), TestError> {
    let app = TestApp::new(FeatureRouters::default()).await?;
    std::fs::write(app.public_dir.path().join("index.txt"), "static").unwrap();

    let response = app.call(Method::POST, "/index.txt", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, NOT_FOUND_BODY);

    Ok(())
}
