//! Input validation. Every request here is rejected with 400 before the
//! handler touches the database, so no Postgres is needed.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth, put_json_auth, token_for, unreachable_pool};
use rats_core::roles::ROLE_MEMBER;
use serde_json::json;

fn member() -> String {
    token_for(11, ROLE_MEMBER)
}

async fn assert_rejected(response: axum::response::Response, fragment: &str) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(
        message.contains(fragment),
        "expected '{fragment}' in '{message}'"
    );
}

#[tokio::test]
async fn register_rejects_bad_email_and_short_password() {
    let app = common::build_test_app(unreachable_pool());
    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "email": "not-an-email", "password": "longenough1", "display_name": "Sam" }),
    )
    .await;
    assert_rejected(response, "email").await;

    let app = common::build_test_app(unreachable_pool());
    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "email": "sam@example.com", "password": "short", "display_name": "Sam" }),
    )
    .await;
    assert_rejected(response, "8").await;
}

#[tokio::test]
async fn unknown_reminder_day_is_rejected() {
    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/events/1/reminder-days/5/toggle",
        &member(),
        json!({}),
    )
    .await;

    assert_rejected(response, "Invalid reminder day 5").await;
}

#[tokio::test]
async fn history_rejects_inverted_range() {
    let response = get_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/food-logs/history?from=2026-03-10&to=2026-03-01",
        &member(),
    )
    .await;

    assert_rejected(response, "from must not be after to").await;
}

#[tokio::test]
async fn analyze_rejects_empty_description_and_unknown_meal() {
    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/food-logs/analyze",
        &member(),
        json!({ "description": "" }),
    )
    .await;
    assert_rejected(response, "description").await;

    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/food-logs/analyze",
        &member(),
        json!({ "description": "oatmeal", "meal_type": "brunch" }),
    )
    .await;
    assert_rejected(response, "meal_type").await;
}

#[tokio::test]
async fn progress_duration_must_be_in_range() {
    for secs in [0, 4 * 60 * 60 + 1] {
        let response = post_json_auth(
            common::build_test_app(unreachable_pool()),
            "/api/v1/meditation/progress",
            &member(),
            json!({ "duration_secs": secs }),
        )
        .await;
        assert_rejected(response, "duration_secs").await;
    }
}

#[tokio::test]
async fn progress_cannot_reference_both_sources() {
    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/meditation/progress",
        &member(),
        json!({ "duration_secs": 600, "meditation_id": 1, "custom_meditation_id": 2 }),
    )
    .await;

    assert_rejected(response, "not both").await;
}

#[tokio::test]
async fn custom_meditation_length_is_bounded() {
    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/meditation/custom/generate",
        &member(),
        json!({ "mood": "anxious", "duration_mins": 90 }),
    )
    .await;

    assert_rejected(response, "duration_mins").await;
}

#[tokio::test]
async fn nutrition_profile_ranges_are_enforced() {
    let response = put_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/nutrition/profile",
        &member(),
        json!({
            "sex": "female",
            "age": 9,
            "height_cm": 90.0,
            "weight_kg": 60.0,
            "activity_level": "moderate",
            "goal": "maintain"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("age"));
    assert!(message.contains("height_cm"));
}

#[tokio::test]
async fn nutrition_profile_rejects_unknown_goal() {
    let response = put_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/nutrition/profile",
        &member(),
        json!({
            "sex": "male",
            "age": 30,
            "height_cm": 180.0,
            "weight_kg": 80.0,
            "activity_level": "moderate",
            "goal": "bulk"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn social_post_over_platform_limit_is_rejected() {
    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/social/posts",
        &member(),
        json!({ "platform": "twitter", "content": "a".repeat(281) }),
    )
    .await;

    assert_rejected(response, "280").await;
}

#[tokio::test]
async fn social_post_unknown_platform_is_rejected() {
    let response = post_json_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/social/posts",
        &member(),
        json!({ "platform": "myspace", "content": "hello" }),
    )
    .await;

    assert_rejected(response, "Unsupported platform").await;
}

#[tokio::test]
async fn social_post_list_rejects_unknown_status() {
    let response = get_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/social/posts?status=queued",
        &member(),
    )
    .await;

    assert_rejected(response, "status").await;
}

#[tokio::test]
async fn leaderboard_rejects_unknown_metric() {
    let response = get_auth(
        common::build_test_app(unreachable_pool()),
        "/api/v1/leaderboard?metric=steps",
        &member(),
    )
    .await;

    assert_rejected(response, "Unknown leaderboard metric").await;
}
