use axum::{response::Html, Extension};

use crate::server::model::session::SessionView;

/// GET / - Landing view
///
/// Served to authenticated and unauthenticated clients alike; the session snapshot only
/// changes the greeting.
///
/// # Returns
/// - `200 OK`: HTML landing page
pub async fn index(Extension(session): Extension<SessionView>) -> Html<String> {
    Html(render_landing(&session))
}

fn render_landing(session: &SessionView) -> String {
    let greeting = if session.is_authenticated() {
        "Welcome back."
    } else {
        "Sign in to manage your lead lists, scripts and call schedule."
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Dialdesk</title>
<link rel="stylesheet" href="/css/style.css">
</head>
<body>
<main>
<h1>Dialdesk</h1>
<p>{greeting}</p>
<p class="session-views">Visits this session: {views}</p>
</main>
</body>
</html>
"#,
        greeting = greeting,
        views = session.views,
    )
}
