//! The web front end: session-backed setup and generation flows.

use std::num::NonZeroU16;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::{error, info};

use crate::meme::FontProvider;

pub(crate) mod flash;
mod prelude;
pub(crate) mod session;
mod views;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) http: reqwest::Client,
    pub(crate) fonts: Arc<FontProvider>,
}

impl AppState {
    fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            fonts: Arc::new(FontProvider::platform()),
        }
    }
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(views::root_handler))
        .route("/static/styles.css", get(views::styles_handler))
        .route("/setup", post(views::setup_handler))
        .route("/reset", post(views::reset_handler))
        .route("/generate", post(views::generate_handler))
        .route("/clear", post(views::clear_handler))
        .route("/meme.png", get(views::meme_png_handler))
        .route("/download", get(views::download_handler))
}

fn build_app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::hours(12)));

    create_router().layer(session_layer).with_state(state)
}

/// Binds the listener and serves the meme generator until shutdown.
pub async fn setup_server(listen_addr: &str, port: NonZeroU16) -> Result<(), anyhow::Error> {
    let app = build_app(AppState::new());

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        build_app(AppState::new())
    }

    async fn read_body(response: axum::response::Response) -> String {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        String::from_utf8_lossy(&bytes).to_string()
    }

    fn session_cookie(response: &axum::response::Response) -> String {
        response
            .headers()
            .get(SET_COOKIE)
            .expect("session cookie set")
            .to_str()
            .expect("cookie is ascii")
            .split(';')
            .next()
            .expect("cookie value")
            .to_string()
    }

    async fn setup_keys(app: &Router) -> String {
        let request = Request::builder()
            .method("POST")
            .uri("/setup")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("groq_key=gk_test&stability_key=sk_test"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie(&response)
    }

    #[tokio::test]
    async fn home_without_keys_shows_setup() {
        let app = test_app();

        let request = Request::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert!(body.contains("Setup API Keys"));
        assert!(body.contains("Groq API Key"));
    }

    #[tokio::test]
    async fn styles_route_serves_css() {
        let app = test_app();

        let request = Request::builder()
            .method("GET")
            .uri("/static/styles.css")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/css"
        );
    }

    #[tokio::test]
    async fn setup_flow_reaches_the_create_form() {
        let app = test_app();
        let cookie = setup_keys(&app).await;

        let request = Request::builder()
            .method("GET")
            .uri("/")
            .header(COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert!(body.contains("Create Your Meme"));
        assert!(body.contains("sarcastic"));
        assert!(body.contains("Dark"));
    }

    #[tokio::test]
    async fn setup_with_a_missing_key_warns() {
        let app = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/setup")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("groq_key=gk_test&stability_key="))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&response);

        let request = Request::builder()
            .method("GET")
            .uri("/")
            .header(COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let body = read_body(response).await;
        assert!(body.contains("Enter both API keys"));
        assert!(body.contains("Setup API Keys"));
    }

    #[tokio::test]
    async fn generate_without_a_topic_warns() {
        let app = test_app();
        let cookie = setup_keys(&app).await;

        let request = Request::builder()
            .method("POST")
            .uri("/generate")
            .header(COOKIE, &cookie)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("topic=++&style=sarcastic"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let request = Request::builder()
            .method("GET")
            .uri("/")
            .header(COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let body = read_body(response).await;
        assert!(body.contains("Please enter a topic first!"));
    }

    #[tokio::test]
    async fn generate_without_keys_redirects_to_setup() {
        let app = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/generate")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("topic=cats&style=dark"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn meme_png_without_a_meme_is_not_found() {
        let app = test_app();

        for uri in ["/meme.png", "/download"] {
            let request = Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn reset_returns_to_the_setup_view() {
        let app = test_app();
        let cookie = setup_keys(&app).await;

        let request = Request::builder()
            .method("POST")
            .uri("/reset")
            .header(COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let request = Request::builder()
            .method("GET")
            .uri("/")
            .header(COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let body = read_body(response).await;
        assert!(body.contains("Setup API Keys"));
    }
}
