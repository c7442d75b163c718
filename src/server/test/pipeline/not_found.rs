use super::*;

/// Tests the not-found stage for every method.
///
/// Expected: 404 with "Page not found." for GET, POST, PUT, DELETE and PATCH
#[tokio::test]
async fn unknown_path_is_not_found_for_every_method() -> Result<(), TestError> {
    let app = TestApp::new(FeatureRouters::default()).await?;

    for method in [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
    ] {
        let response = app.call(method.clone(), "/no/such/page", None).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", method);
        assert_eq!(response.body, NOT_FOUND_BODY, "{}", method);
    }

    Ok(())
}

/// Tests a non-GET request to the landing path.
///
/// Expected: 404 "Page not found."
#[tokio::test]
async fn post_to_landing_is_not_found() -> Result<(), TestError> {
    let app = TestApp::new(FeatureRouters::default()).await?;

    let response = app.call(Method::POST, "/", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, NOT_FOUND_BODY);

    Ok(())
}

/// Tests an unclaimed path under a mounted prefix.
///
/// Expected: 404 "Page not found."
#[tokio::test]
async fn unclaimed_api_path_is_not_found() -> Result<(), TestError> {
    let features = FeatureRouters {
        script: counting_router("/scripts", "script", Arc::new(AtomicUsize::new(0))),
        ..FeatureRouters::default()
    };
    let app = TestApp::new(features).await?;

    let response = app.call(Method::GET, "/api/unknown", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, NOT_FOUND_BODY);

    Ok(())
}
