use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::AppConfig;
use crate::routes::{score_routes, system_routes};
use crate::state::leaderboard::SharedLeaderboard;

/// Build the complete Axum application:
/// - /api      (score submission + ranking)
/// - /system   (alive, version, stats)
/// - anything else is served from `cfg.static_dir`
///
/// `board` is the single store instance created in `main`.
pub fn build_app(board: SharedLeaderboard, cfg: AppConfig) -> Router {
    let static_files = ServeDir::new(&cfg.static_dir);

    Router::new()
        // /api/*
        .nest("/api", score_routes::routes(board.clone()))

        // /system/*
        .nest("/system", system_routes::routes(cfg, board))

        // Static front-end
        .fallback_service(static_files)

        // Logging middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::services::score_service::ScoreView;
    use crate::state::leaderboard::new_leaderboard;

    fn test_app() -> (Router, SharedLeaderboard) {
        let cfg = AppConfig {
            static_dir: "/nonexistent/leaderboard-web".to_string(),
            server_version: "test-1".to_string(),
            ..AppConfig::default()
        };
        let board = new_leaderboard(cfg.leaderboard_size);
        (build_app(board.clone(), cfg), board)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: &str) -> Response {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.clone().oneshot(req).await.unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post_score(app: &Router, name: &str, score: i64) -> StatusCode {
        let body = serde_json::json!({ "name": name, "score": score }).to_string();
        send(app, Method::POST, "/api/scores", &body).await.status()
    }

    #[tokio::test]
    async fn empty_leaderboard_is_empty_array() {
        let (app, _) = test_app();
        let resp = send(&app, Method::GET, "/api/leaderboard", "").await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn submit_then_read_back() {
        let (app, board) = test_app();
        let resp = send(&app, Method::POST, "/api/scores", r#"{"name":"Alice","score":50}"#).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(json_body(resp).await, serde_json::json!({ "status": "success" }));
        assert_eq!(board.len(), 1);

        let resp = send(&app, Method::GET, "/api/leaderboard", "").await;
        let rows: Vec<ScoreView> = serde_json::from_value(json_body(resp).await).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Alice");
        assert_eq!(rows[0].score, 50);
    }

    #[tokio::test]
    async fn body_without_content_type_is_accepted() {
        let (app, board) = test_app();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/scores")
            .body(Body::from(r#"{"name":"Bob","score":3}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(board.len(), 1);
    }

    #[tokio::test]
    async fn bad_submissions_are_400() {
        let (app, board) = test_app();

        for body in [
            "not json",
            r#"{"name":"","score":10}"#,
            r#"{"score":10}"#,
            r#"{"name":"Eve","score":-1}"#,
        ] {
            let resp = send(&app, Method::POST, "/api/scores", body).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert!(json_body(resp).await["error"].is_string());
        }
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn error_messages_name_the_problem() {
        let (app, _) = test_app();

        let resp = send(&app, Method::POST, "/api/scores", r#"{"name":"","score":1}"#).await;
        assert_eq!(json_body(resp).await["error"], "Name is required");

        let resp = send(&app, Method::POST, "/api/scores", r#"{"name":"x","score":-3}"#).await;
        assert_eq!(json_body(resp).await["error"], "Invalid score");

        let resp = send(&app, Method::POST, "/api/scores", "{").await;
        assert_eq!(json_body(resp).await["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn lenient_bodies_are_accepted() {
        let (app, board) = test_app();

        let resp = send(&app, Method::POST, "/api/scores", r#"{"name":"a","score":1} x"#).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = send(&app, Method::POST, "/api/scores", r#"{"Name":"b","Score":2}"#).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let names: Vec<String> = board.snapshot().iter().map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn wrong_method_is_405() {
        let (app, _) = test_app();

        let resp = send(&app, Method::GET, "/api/scores", "").await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let resp = send(&app, Method::POST, "/api/leaderboard", "{}").await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn leaderboard_keeps_top_ten_over_http() {
        let (app, _) = test_app();
        for (i, score) in [100, 90, 80, 70, 60, 50, 40, 30, 20, 10, 5].into_iter().enumerate() {
            assert_eq!(post_score(&app, &format!("p{i}"), score).await, StatusCode::CREATED);
        }

        let resp = send(&app, Method::GET, "/api/leaderboard", "").await;
        let rows: Vec<ScoreView> = serde_json::from_value(json_body(resp).await).unwrap();
        let scores: Vec<u64> = rows.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![100, 90, 80, 70, 60, 50, 40, 30, 20, 10]);
    }

    #[tokio::test]
    async fn system_routes_report_state() {
        let (app, _) = test_app();
        post_score(&app, "Alice", 1).await;

        let resp = send(&app, Method::GET, "/system/alive", "").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(&app, Method::GET, "/system/version", "").await;
        assert_eq!(json_body(resp).await["version"], "test-1");

        let resp = send(&app, Method::GET, "/system/stats", "").await;
        let stats = json_body(resp).await;
        assert_eq!(stats["entries"], 1);
        assert_eq!(stats["capacity"], 10);
        assert_eq!(stats["empty"], false);
    }

    #[tokio::test]
    async fn unknown_path_falls_through_to_static_files() {
        let (app, _) = test_app();
        let resp = send(&app, Method::GET, "/does-not-exist.html", "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn static_dir_is_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>scores</h1>").unwrap();

        let cfg = AppConfig {
            static_dir: dir.path().to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        let app = build_app(new_leaderboard(cfg.leaderboard_size), cfg);

        let resp = send(&app, Method::GET, "/index.html", "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>scores</h1>");
    }

    #[tokio::test]
    async fn concurrent_requests_keep_board_consistent() {
        let (app, board) = test_app();

        let mut handles = Vec::new();
        for i in 0..40i64 {
            let app = app.clone();
            handles.push(tokio::spawn(async move {
                post_score(&app, &format!("p{i}"), i).await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
        }

        let scores: Vec<u64> = board.snapshot().iter().map(|e| e.score()).collect();
        assert_eq!(scores, (30..40).rev().collect::<Vec<u64>>());
    }
}
