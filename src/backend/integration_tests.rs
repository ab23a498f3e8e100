//! `HttpBackend` against an in-process mock of the extraction service.

use std::net::SocketAddr;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::{reply, Filter, Reply};

use crate::backend::client::{Backend, HttpBackend};
use crate::backend::types::AnalysisText;
use crate::error_handling::types::BackendError;

const GOOD_POST: &str = "https://www.instagram.com/p/good/";
const PRIVATE_POST: &str = "https://www.instagram.com/p/private/";
const GARBLED_POST: &str = "https://www.instagram.com/p/garbled/";

fn extract_image_reply(body: Value) -> warp::reply::Response {
    match body["url"].as_str() {
        Some(GOOD_POST) => reply::json(&json!({
            "success": true,
            "image_url": "http://127.0.0.1/download/tmp1.jpg"
        }))
        .into_response(),
        Some(PRIVATE_POST) => reply::with_status(
            reply::json(&json!({ "error": "No se pudo extraer la imagen" })),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .into_response(),
        Some(GARBLED_POST) => {
            reply::with_status("<html>gateway</html>", StatusCode::BAD_GATEWAY).into_response()
        }
        _ => reply::json(&json!({ "success": false })).into_response(),
    }
}

fn extract_text_reply(body: Value) -> warp::reply::Response {
    match body["image_url"].as_str() {
        Some(url) if url.ends_with("text.jpg") => {
            reply::json(&json!({ "success": true, "text": "Titular del día" })).into_response()
        }
        _ => reply::json(&json!({
            "success": false,
            "error": "No se pudo extraer texto de la imagen"
        }))
        .into_response(),
    }
}

fn analyze_reply(body: Value) -> warp::reply::Response {
    let texts = body["texts"].as_array().cloned().unwrap_or_default();
    let joined: Vec<String> = texts
        .iter()
        .map(|t| format!("{}@{}", t["text"].as_str().unwrap_or(""), t["timestamp"]))
        .collect();
    reply::json(&json!({ "success": true, "analysis": joined.join(" | ") })).into_response()
}

fn spawn_mock_backend() -> SocketAddr {
    let extract_image = warp::post()
        .and(warp::path("extract-image"))
        .and(warp::path::end())
        .and(warp::body::json())
        .map(extract_image_reply);
    let extract_text = warp::post()
        .and(warp::path("extract-text"))
        .and(warp::path::end())
        .and(warp::body::json())
        .map(extract_text_reply);
    let analyze = warp::post()
        .and(warp::path("analyze-texts"))
        .and(warp::path::end())
        .and(warp::body::json())
        .map(analyze_reply);

    let routes = extract_image.or(extract_text).or(analyze);
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn backend_for(addr: SocketAddr) -> HttpBackend {
    HttpBackend::new(&format!("http://{}", addr), None).unwrap()
}

#[tokio::test]
async fn extract_image_returns_resolved_url() {
    let backend = backend_for(spawn_mock_backend());
    let url = backend.extract_image(GOOD_POST).await.unwrap();
    assert_eq!(url, "http://127.0.0.1/download/tmp1.jpg");
}

#[tokio::test]
async fn error_status_carries_backend_message() {
    let backend = backend_for(spawn_mock_backend());
    let err = backend.extract_image(PRIVATE_POST).await.unwrap_err();
    assert_eq!(
        err,
        BackendError::Status {
            status: 500,
            message: "No se pudo extraer la imagen".into()
        }
    );
}

#[tokio::test]
async fn non_json_error_body_is_reported_with_status() {
    let backend = backend_for(spawn_mock_backend());
    let err = backend.extract_image(GARBLED_POST).await.unwrap_err();
    assert_eq!(
        err,
        BackendError::Status {
            status: 502,
            message: "<html>gateway</html>".into()
        }
    );
}

#[tokio::test]
async fn unsuccessful_reply_without_message_uses_fallback() {
    let backend = backend_for(spawn_mock_backend());
    let err = backend
        .extract_image("https://example.com/unknown")
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Rejected(_)));
}

#[tokio::test]
async fn extract_text_success_and_rejection() {
    let backend = backend_for(spawn_mock_backend());
    let text = backend
        .extract_text("http://127.0.0.1/download/text.jpg")
        .await
        .unwrap();
    assert_eq!(text, "Titular del día");

    let err = backend
        .extract_text("http://127.0.0.1/download/blank.jpg")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::Rejected("No se pudo extraer texto de la imagen".into())
    );
}

#[tokio::test]
async fn analyze_sends_every_text_with_timestamp() {
    let backend = backend_for(spawn_mock_backend());
    let texts = vec![
        AnalysisText {
            text: "uno".into(),
            timestamp: Utc.timestamp_millis_opt(1_000).unwrap(),
        },
        AnalysisText {
            text: "dos".into(),
            timestamp: Utc.timestamp_millis_opt(2_000).unwrap(),
        },
    ];
    let analysis = backend.analyze_texts(&texts).await.unwrap();
    assert_eq!(analysis, "uno@1000 | dos@2000");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let backend = HttpBackend::new("http://127.0.0.1:9", None).unwrap();
    let err = backend.extract_image(GOOD_POST).await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
}
