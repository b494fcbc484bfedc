//! AI-backed endpoints over a fake analyzer. Requests that do not persist
//! anything run without a database.

mod common;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use common::{
    body_json, post_json_auth, send, token_for, unreachable_pool, FakeAnalyzer,
};
use rats_core::roles::ROLE_MEMBER;
use serde_json::json;

const BOUNDARY: &str = "rats-test-boundary";

fn member() -> String {
    token_for(21, ROLE_MEMBER)
}

/// Build a multipart body from `(name, content_type, bytes)` parts.
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, content_type, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match content_type {
            Some(ct) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\n\
                     Content-Type: {ct}\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(ai: FakeAnalyzer, parts: &[(&str, Option<&str>, &[u8])]) -> axum::response::Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/food-logs/analyze-image")
        .header(AUTHORIZATION, format!("Bearer {}", member()))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(common::build_test_app_with(unreachable_pool(), ai), request).await
}

// ---------------------------------------------------------------------------
// Text analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyze_text_returns_estimate_without_logging() {
    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/food-logs/analyze",
        &member(),
        json!({ "description": "bowl of oatmeal with berries" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["analysis"]["food_name"], "bowl of oatmeal with berries");
    assert_eq!(json["data"]["analysis"]["calories"], 350.0);
    assert_eq!(json["data"]["fallback"], false);
    assert!(json["data"]["food_log"].is_null());
}

#[tokio::test]
async fn fallback_analysis_is_flagged_and_never_logged() {
    let ai = FakeAnalyzer {
        configured: true,
        fallback: true,
    };
    // `log: true` would hit the database; a fallback must skip it.
    let response = post_json_auth(
        common::build_test_app_with(unreachable_pool(), ai),
        "/api/v1/food-logs/analyze",
        &member(),
        json!({ "description": "mystery stew", "log": true }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["fallback"], true);
    assert!(json["data"]["food_log"].is_null());
}

#[tokio::test]
async fn unconfigured_ai_returns_503() {
    let response = post_json_auth(
        common::build_test_app_with(unreachable_pool(), FakeAnalyzer::unconfigured()),
        "/api/v1/food-logs/analyze",
        &member(),
        json!({ "description": "toast" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn coach_and_generate_also_return_503_when_unconfigured() {
    let cases = [
        ("/api/v1/nutrition/coach", json!({})),
        ("/api/v1/meditation/custom/generate", json!({ "duration_mins": 10 })),
    ];
    for (uri, body) in cases {
        let response = post_json_auth(
            common::build_test_app_with(unreachable_pool(), FakeAnalyzer::unconfigured()),
            uri,
            &member(),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "POST {uri}");
    }
}

// ---------------------------------------------------------------------------
// Image analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_upload_is_analyzed_with_hint() {
    let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    let response = upload(
        FakeAnalyzer::working(),
        &[
            ("image", Some("image/png"), png.as_slice()),
            ("description", None, b"grilled salmon".as_slice()),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["analysis"]["food_name"], "grilled salmon");
    assert_eq!(json["data"]["fallback"], false);
}

#[tokio::test]
async fn image_with_unsupported_type_is_rejected() {
    let response = upload(
        FakeAnalyzer::working(),
        &[("image", Some("image/gif"), b"GIF89a".as_slice())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("image/gif"));
}

#[tokio::test]
async fn missing_image_part_is_rejected() {
    let response = upload(
        FakeAnalyzer::working(),
        &[("description", None, b"just words".as_slice())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_image_is_rejected() {
    let big = vec![0u8; 5 * 1024 * 1024 + 1];
    let response = upload(
        FakeAnalyzer::working(),
        &[("image", Some("image/jpeg"), big.as_slice())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn image_upload_with_unconfigured_ai_returns_503() {
    let response = upload(
        FakeAnalyzer::unconfigured(),
        &[("image", Some("image/jpeg"), b"\xff\xd8\xff".as_slice())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
