//! The landing page and the catch-all 404.

use axum::extract::State;
use axum::response::Html;

use crate::error::ApiError;
use crate::state::AppState;

const FALLBACK_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Wall Finishing Robot Control System</title>
    <style>
        body{font-family:Arial,sans-serif;margin:40px;background:#f5f5f5}
        .container{background:white;padding:40px;border-radius:10px;max-width:800px;margin:0 auto}
        h1{color:#2c3e50}
        .info{background:#e8f4fd;padding:20px;border-radius:5px;margin:20px 0}
        .error{background:#f8d7da;color:#721c24;padding:20px;border-radius:5px;margin:20px 0}
        a{color:#3498db;text-decoration:none}
    </style>
</head>
<body>
    <div class="container">
        <h1>Wall Finishing Robot Control System</h1>
        <div class="error">
            <strong>Frontend missing:</strong> place <code>index.html</code> in the configured static directory
        </div>
        <div class="info">
            <h3>System status: running</h3>
            <p><a href="/health">Health check</a> | <a href="/api/v1/monitoring/system-status">System status</a></p>
        </div>
    </div>
</body>
</html>"#;

/// `index.html` from the static directory, or a built-in page when absent.
pub(crate) async fn index(State(state): State<AppState>) -> Html<String> {
    let path = state.config.server.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "serving fallback index page");
            Html(FALLBACK_PAGE.to_string())
        }
    }
}

pub(crate) async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}
