use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chatlens_analysis::ml::{LinearModelArtifact, SimilarityArtifact};
use chatlens_analysis::{AnalysisConfig, LinearTextClassifier, SimilarityRecommender};
use chatlens_api::{build_router, ApiConfig, AppState};
use serde_json::json;
use tower::util::ServiceExt;

const CHAT_EXPORT: &str = "\u{feff}12/01/2024, 9:15 am - Alice: Hello 😀 https://a.example\r\n\
12/01/2024, 9:20 am - Bob: Hi\r\n\
still Bob\r\n\
12/01/2024, 10:00 pm - Alice: <Media omitted>\r\n\
12/01/2024, 10:05 pm - Alice: bye\r\n";

const BOUNDARY: &str = "chatlens-test-boundary";

fn classifier() -> Result<LinearTextClassifier, Box<dyn std::error::Error>> {
    let mut weights = HashMap::new();
    weights.insert("free".to_string(), 2.0);
    weights.insert("prize".to_string(), 2.0);
    Ok(LinearTextClassifier::from_artifact(LinearModelArtifact {
        bias: -1.0,
        threshold: 0.0,
        weights,
    })?)
}

fn recommender() -> Result<SimilarityRecommender, Box<dyn std::error::Error>> {
    Ok(SimilarityRecommender::from_artifact(SimilarityArtifact {
        titles: vec![
            "Avatar".to_string(),
            "Titanic".to_string(),
            "Alien".to_string(),
        ],
        similarity: vec![
            vec![1.0, 0.5, 0.8],
            vec![0.5, 1.0, 0.2],
            vec![0.8, 0.2, 1.0],
        ],
    })?)
}

fn app() -> Result<axum::Router, Box<dyn std::error::Error>> {
    let state = AppState::new(AnalysisConfig::default())
        .with_classifier(Arc::new(classifier()?))
        .with_recommender(Arc::new(recommender()?));
    Ok(build_router(&ApiConfig::default(), state))
}

fn bare_app() -> axum::Router {
    build_router(&ApiConfig::default(), AppState::default())
}

fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn send(
    app: &axum::Router,
    request: Request<Body>,
) -> Result<(StatusCode, serde_json::Value), Box<dyn std::error::Error>> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body_json = serde_json::from_slice::<serde_json::Value>(&body_bytes)?;
    Ok((status, body_json))
}

async fn post_json(
    app: &axum::Router,
    path: &str,
    payload: serde_json::Value,
) -> Result<(StatusCode, serde_json::Value), Box<dyn std::error::Error>> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))?;
    send(app, request).await
}

async fn post_upload(
    app: &axum::Router,
    path: &str,
    field: &str,
    content: &[u8],
) -> Result<(StatusCode, serde_json::Value), Box<dyn std::error::Error>> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, "chat.txt", content)))?;
    send(app, request).await
}

#[tokio::test]
async fn health_and_banner_respond() -> Result<(), Box<dyn std::error::Error>> {
    let app = bare_app();

    for path in ["/health", "/"] {
        let request = Request::builder().uri(path).body(Body::empty())?;
        let response = app.clone().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert!(!body.is_empty());
    }
    Ok(())
}

#[tokio::test]
async fn analyze_chat_reports_multipart_upload() -> Result<(), Box<dyn std::error::Error>> {
    let app = app()?;
    let (status, body) =
        post_upload(&app, "/api/analyze_chat", "chat_file", CHAT_EXPORT.as_bytes()).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["totalMessages"], json!(3));
    assert_eq!(body["activeUser"], json!("Alice"));
    assert_eq!(body["messageCount"]["Alice"], json!(2));
    assert_eq!(body["messageCount"]["Bob"], json!(1));
    assert_eq!(body["totalLinks"], json!(1));
    assert_eq!(body["topEmojis"][0]["emoji"], json!("😀"));
    assert_eq!(body["topEmojis"][0]["count"], json!(1));

    let hourly = body["hourlyDistribution"]
        .as_array()
        .ok_or("hourlyDistribution is not an array")?;
    assert_eq!(hourly.len(), 24);
    assert_eq!(hourly[9]["count"], json!(2));
    assert_eq!(hourly[22]["count"], json!(1));

    let daily = body["dailyDistribution"]
        .as_array()
        .ok_or("dailyDistribution is not an array")?;
    assert_eq!(daily.len(), 7);
    assert_eq!(daily[4]["day"], json!("Friday"));
    assert_eq!(daily[4]["count"], json!(3));
    Ok(())
}

#[tokio::test]
async fn message_count_keys_follow_ranking_order() -> Result<(), Box<dyn std::error::Error>> {
    let app = app()?;
    let export = "01/02/2024, 8:00 am - Zed: one\n\
01/02/2024, 8:01 am - Amy: two\n\
01/02/2024, 8:02 am - Amy: three\n";

    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze_chat")
        .header("content-type", "text/plain")
        .body(Body::from(export))?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let raw = to_bytes(response.into_body(), usize::MAX).await?;
    let text = std::str::from_utf8(&raw)?;

    let counts = text
        .split("\"messageCount\":")
        .nth(1)
        .ok_or("messageCount missing")?;
    let amy = counts.find("\"Amy\"").ok_or("Amy missing")?;
    let zed = counts.find("\"Zed\"").ok_or("Zed missing")?;
    assert!(amy < zed);
    Ok(())
}

#[tokio::test]
async fn first_file_field_is_used_without_chat_file() -> Result<(), Box<dyn std::error::Error>> {
    let app = app()?;
    let (status, body) =
        post_upload(&app, "/api/analyze", "upload", CHAT_EXPORT.as_bytes()).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalMessages"], json!(3));
    Ok(())
}

#[tokio::test]
async fn unrecognized_export_returns_failure_payload() -> Result<(), Box<dyn std::error::Error>> {
    let app = app()?;
    let (status, body) = post_upload(
        &app,
        "/api/analyze_chat",
        "chat_file",
        b"just some notes\nwith no headers\n",
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("No recognizable messages found."));
    Ok(())
}

#[tokio::test]
async fn non_utf8_upload_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let app = app()?;
    let (status, body) =
        post_upload(&app, "/api/analyze_chat", "chat_file", &[0xff, 0xfe, 0x00, 0x41]).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!(400));
    Ok(())
}

#[tokio::test]
async fn empty_upload_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let app = app()?;
    let (status, body) = post_upload(&app, "/api/analyze_chat", "chat_file", b"").await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    Ok(())
}

#[tokio::test]
async fn check_spam_classifies_text() -> Result<(), Box<dyn std::error::Error>> {
    let app = app()?;

    let (status, body) =
        post_json(&app, "/api/check_spam", json!({ "text": "Win a FREE prize now" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "classification": "spam", "success": true }));

    let (status, body) =
        post_json(&app, "/api/check_spam", json!({ "text": "see you at lunch" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classification"], json!("ham"));
    Ok(())
}

#[tokio::test]
async fn check_spam_requires_text() -> Result<(), Box<dyn std::error::Error>> {
    let app = app()?;
    let (status, body) = post_json(&app, "/api/check_spam", json!({ "text": "  " })).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("No text provided"));
    Ok(())
}

#[tokio::test]
async fn endpoints_without_models_return_server_error() -> Result<(), Box<dyn std::error::Error>> {
    let app = bare_app();

    let (status, body) = post_json(&app, "/api/check_spam", json!({ "text": "hello" })).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));

    let (status, body) =
        post_json(&app, "/api/recommend_movies", json!({ "title": "Avatar" })).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    Ok(())
}

#[tokio::test]
async fn recommend_movies_ranks_similar_titles() -> Result<(), Box<dyn std::error::Error>> {
    let app = app()?;
    let (status, body) =
        post_json(&app, "/api/recommend_movies", json!({ "title": "avatar" })).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(
        body["recommendations"],
        json!([
            { "title": "Alien", "score": 0.8 },
            { "title": "Titanic", "score": 0.5 }
        ])
    );

    let (_, body) = post_json(
        &app,
        "/api/recommend_movies",
        json!({ "title": "Avatar", "limit": 1 }),
    )
    .await?;
    assert_eq!(body["recommendations"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn unknown_movie_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let app = app()?;
    let (status, body) =
        post_json(&app, "/api/recommend_movies", json!({ "title": "Heat" })).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!(404));
    Ok(())
}

#[tokio::test]
async fn disabled_features_are_not_routed() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ApiConfig::default();
    config.features.enable_spam = false;
    let app = build_router(&config, AppState::default());

    let request = Request::builder()
        .method("POST")
        .uri("/api/check_spam")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": "hi" }).to_string()))?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_json_gets_error_payload() -> Result<(), Box<dyn std::error::Error>> {
    let app = app()?;

    for path in ["/api/check_spam", "/api/recommend_movies"] {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from("{not json"))?;
        let (status, body) = send(&app, request).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["code"], json!(400));
        assert!(body["error"].is_string());
    }
    Ok(())
}

#[tokio::test]
async fn raw_upload_over_body_limit_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let config = ApiConfig {
        max_body_size: 64,
        ..ApiConfig::default()
    };
    let app = build_router(&config, AppState::default());

    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze_chat")
        .header("content-type", "text/plain")
        .body(Body::from(CHAT_EXPORT.repeat(4)))?;
    let (status, body) = send(&app, request).await?;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!(413));
    Ok(())
}
