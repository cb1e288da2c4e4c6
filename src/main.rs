use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::CONFIG;
use crate::extractor::YtDlpClient;
use crate::state::AppState;
mod config;
mod controllers;
mod error;
mod extractor;
mod models;
mod routers;
mod state;
#[cfg(test)]
mod testing;
use routers::api_routes;

fn build_app(state: AppState, static_dir: Option<String>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app: Router<AppState> = Router::new().nest("/api", api_routes());

    // Built front end, with index.html as the SPA fallback
    if let Some(dir) = static_dir {
        let index = format!("{}/index.html", dir.trim_end_matches('/'));
        info!("🗂️  Serving static assets from {}", dir);
        app = app.fallback_service(ServeDir::new(&dir).fallback(ServeFile::new(index)));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_target(false)
        .init();

    let extractor = match YtDlpClient::from_config(&CONFIG) {
        Ok(client) => client,
        Err(e) => {
            error!("❌ Failed to build extraction client: {:#}", e);
            return Err(e);
        }
    };
    let state = AppState::new(Arc::new(extractor));
    let app = build_app(state, CONFIG.static_dir());

    let addr = CONFIG.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🎬 Video proxy listening on http://{}", addr);
    info!("📡 Info endpoint: /api/info?url=...");
    info!("📥 Download endpoint: /api/download?url=...&itag=...");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_info, StubClient};
    use axum::body::Body;
    use axum::http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, Request, StatusCode};
    use tower::ServiceExt;

    fn stub_state() -> AppState {
        AppState::new(Arc::new(StubClient::new(sample_info())))
    }

    #[tokio::test]
    async fn api_is_mounted_with_cors() {
        let app = build_app(stub_state(), None);
        let req = Request::builder()
            .uri("/api/info?url=https://youtu.be/abc123")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found_without_static_dir() {
        let app = build_app(stub_state(), None);
        let req = Request::builder().uri("/somewhere").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn static_dir_falls_back_to_index() {
        let dir = std::env::temp_dir().join(format!("tubeproxy-static-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<html>app</html>").unwrap();

        let app = build_app(stub_state(), Some(dir.to_string_lossy().into_owned()));
        let req = Request::builder().uri("/some/client/route").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<html>app</html>");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
