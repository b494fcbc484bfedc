//! OAuth linking endpoints up to the point where the platform is called.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, get_auth, post_json_auth, token_for, unreachable_pool, TEST_JWT_SECRET};
use rats_api::auth::oauth_state::{sign_state, verify_state};
use rats_core::roles::ROLE_MEMBER;
use rats_core::social::SocialPlatform;
use reqwest::Url;
use serde_json::json;

const USER_ID: i64 = 31;

fn member() -> String {
    token_for(USER_ID, ROLE_MEMBER)
}

#[tokio::test]
async fn twitter_connect_returns_signed_url_with_pkce() {
    let response = get_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/social/twitter/connect",
        &member(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let state = json["data"]["state"].as_str().unwrap();
    let url = Url::parse(json["data"]["authorization_url"].as_str().unwrap()).unwrap();

    assert_eq!(url.host_str(), Some("twitter.com"));
    let query: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
    assert_eq!(query["client_id"], "twitter-client");
    assert_eq!(query["state"], state);
    assert_eq!(
        query["redirect_uri"],
        "http://localhost:5173/social/twitter/callback"
    );
    assert_eq!(query["code_challenge_method"], "plain");
    assert_eq!(query["code_challenge"].len(), 43);

    let owner = verify_state(TEST_JWT_SECRET, state, SocialPlatform::Twitter, Utc::now()).unwrap();
    assert_eq!(owner, USER_ID);
}

#[tokio::test]
async fn connect_to_unconfigured_platform_returns_503() {
    let response = get_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/social/facebook/connect",
        &member(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn connect_to_unknown_platform_returns_400() {
    let response = get_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/social/myspace/connect",
        &member(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn callback_rejects_tampered_state() {
    let mut state = sign_state(TEST_JWT_SECRET, USER_ID, SocialPlatform::Twitter, Utc::now());
    state.push('x');

    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/social/twitter/callback",
        &member(),
        json!({ "code": "abc", "state": state }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn callback_rejects_state_for_another_platform() {
    let state = sign_state(TEST_JWT_SECRET, USER_ID, SocialPlatform::Instagram, Utc::now());

    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/social/twitter/callback",
        &member(),
        json!({ "code": "abc", "state": state }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn callback_rejects_state_issued_to_another_user() {
    let state = sign_state(TEST_JWT_SECRET, USER_ID + 1, SocialPlatform::Twitter, Utc::now());

    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/social/twitter/callback",
        &member(),
        json!({ "code": "abc", "state": state }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn callback_for_unconfigured_platform_returns_503() {
    let state = sign_state(TEST_JWT_SECRET, USER_ID, SocialPlatform::Facebook, Utc::now());

    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/social/facebook/callback",
        &member(),
        json!({ "code": "abc", "state": state }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
