//! HTTP-level tests for the OAuth client and the post publisher.

use assert_matches::assert_matches;
use rats_api::social::oauth::OAuthClient;
use rats_api::social::publisher::{HttpPublisher, SocialPublisher};
use rats_api::social::{
    build_http_client, ClientCredentials, PlatformConfig, PlatformEndpoints, SocialConfig,
    SocialError,
};
use rats_core::social::SocialPlatform;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoints(base: &str) -> PlatformEndpoints {
    PlatformEndpoints {
        authorize_url: format!("{base}/authorize"),
        token_url: format!("{base}/token"),
        profile_url: format!("{base}/me"),
        publish_url: format!("{base}/publish"),
        scopes: "read write".to_string(),
    }
}

fn config(server: &MockServer) -> SocialConfig {
    let platform = || PlatformConfig {
        credentials: Some(ClientCredentials {
            client_id: "cid".to_string(),
            client_secret: "csecret".to_string(),
        }),
        endpoints: endpoints(&server.uri()),
    };
    SocialConfig {
        redirect_base_url: "https://app.example/social".to_string(),
        twitter: platform(),
        facebook: platform(),
        instagram: platform(),
    }
}

fn oauth(server: &MockServer) -> OAuthClient {
    OAuthClient::new(build_http_client().unwrap(), config(server))
}

#[tokio::test]
async fn code_exchange_posts_form_and_parses_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .and(body_string_contains("client_secret=csecret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fb-access",
            "expires_in": 5183944
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = oauth(&server)
        .exchange_code(SocialPlatform::Facebook, "the-code", None)
        .await
        .unwrap();

    assert_eq!(tokens.access_token, "fb-access");
    assert_eq!(tokens.refresh_token, None);
    assert_eq!(tokens.expires_in, Some(5183944));
}

#[tokio::test]
async fn twitter_exchange_sends_verifier_and_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header_exists("authorization"))
        .and(body_string_contains("code_verifier=v3rifier"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tw-access",
            "refresh_token": "tw-refresh",
            "expires_in": 7200
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = oauth(&server)
        .exchange_code(SocialPlatform::Twitter, "c", Some("v3rifier"))
        .await
        .unwrap();

    assert_eq!(tokens.refresh_token.as_deref(), Some("tw-refresh"));
}

#[tokio::test]
async fn rejected_code_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let err = oauth(&server)
        .exchange_code(SocialPlatform::Instagram, "stale", None)
        .await
        .unwrap_err();

    assert_matches!(err, SocialError::Api { status: 400, ref body, .. } if body == "invalid_grant");
}

#[tokio::test]
async fn identity_uses_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer tw-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "2244994945", "name": "RATS", "username": "rats_app" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identity = oauth(&server)
        .fetch_identity(SocialPlatform::Twitter, "tw-access")
        .await
        .unwrap();

    assert_eq!(identity.external_account_id, "2244994945");
    assert_eq!(identity.handle.as_deref(), Some("rats_app"));
}

#[tokio::test]
async fn publisher_uses_platform_text_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/publish"))
        .and(header("authorization", "Bearer page-token"))
        .and(body_json(json!({ "message": "Yoga tomorrow!" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "123_456" })))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = HttpPublisher::new(build_http_client().unwrap(), config(&server));
    let id = publisher
        .publish(SocialPlatform::Facebook, "page-token", "Yoga tomorrow!")
        .await
        .unwrap();

    assert_eq!(id, "123_456");
}

#[tokio::test]
async fn publisher_reports_platform_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/publish"))
        .respond_with(ResponseTemplate::new(403).set_body_string("duplicate content"))
        .mount(&server)
        .await;

    let publisher = HttpPublisher::new(build_http_client().unwrap(), config(&server));
    let err = publisher
        .publish(SocialPlatform::Twitter, "t", "hello")
        .await
        .unwrap_err();

    assert_matches!(err, SocialError::Api { status: 403, .. });
}

#[tokio::test]
async fn publisher_requires_an_id_in_the_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let publisher = HttpPublisher::new(build_http_client().unwrap(), config(&server));
    let err = publisher
        .publish(SocialPlatform::Instagram, "t", "hello")
        .await
        .unwrap_err();

    assert_matches!(err, SocialError::Api { .. });
}
