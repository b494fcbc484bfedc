//! OAuth2 authorization-code flow against the social platforms.

use chrono::Duration;
use rats_core::social::{validate_handle, SocialPlatform};
use rats_core::types::Timestamp;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use super::{extract_id, read_json, SocialConfig, SocialError};

/// Tokens returned by a platform's token endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Lifetime in seconds, when the platform reports one.
    pub expires_in: Option<i64>,
}

impl TokenSet {
    pub fn expires_at(&self, now: Timestamp) -> Option<Timestamp> {
        self.expires_in.map(|secs| now + Duration::seconds(secs))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// The linked account as reported by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountIdentity {
    pub external_account_id: String,
    /// `None` when the platform's display name is not a valid handle.
    pub handle: Option<String>,
}

pub struct OAuthClient {
    http: reqwest::Client,
    config: SocialConfig,
}

impl OAuthClient {
    pub fn new(http: reqwest::Client, config: SocialConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &SocialConfig {
        &self.config
    }

    /// Build the URL the user visits to grant access.
    ///
    /// Twitter requires PKCE; pass the verifier's challenge as `pkce_challenge`.
    pub fn authorization_url(
        &self,
        platform: SocialPlatform,
        state: &str,
        pkce_challenge: Option<&str>,
    ) -> Result<String, SocialError> {
        let creds = self.config.credentials(platform)?;
        let endpoints = &self.config.platform(platform).endpoints;

        let mut url = Url::parse(&endpoints.authorize_url)
            .map_err(|e| SocialError::Config(format!("Invalid {platform} authorize URL: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &creds.client_id)
                .append_pair("redirect_uri", &self.config.redirect_uri(platform))
                .append_pair("scope", &endpoints.scopes)
                .append_pair("state", state);
            if let Some(challenge) = pkce_challenge {
                query
                    .append_pair("code_challenge", challenge)
                    .append_pair("code_challenge_method", "plain");
            }
        }
        Ok(url.into())
    }

    /// Exchange an authorization code for tokens (form-encoded POST).
    pub async fn exchange_code(
        &self,
        platform: SocialPlatform,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenSet, SocialError> {
        let creds = self.config.credentials(platform)?;
        let endpoints = &self.config.platform(platform).endpoints;
        let redirect_uri = self.config.redirect_uri(platform);

        let mut form: Vec<(&str, &str)> = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri.as_str()),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
        ];
        if let Some(verifier) = code_verifier {
            form.push(("code_verifier", verifier));
        }

        let mut request = self.http.post(&endpoints.token_url).form(&form);
        if platform == SocialPlatform::Twitter {
            request = request.basic_auth(&creds.client_id, Some(&creds.client_secret));
        }

        let body = read_json(platform, request.send().await?).await?;
        let token: TokenResponse =
            serde_json::from_value(body).map_err(|e| SocialError::Api {
                platform,
                status: 200,
                body: format!("Unexpected token response: {e}"),
            })?;

        tracing::debug!(%platform, has_refresh = token.refresh_token.is_some(), "OAuth code exchanged");

        Ok(TokenSet {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
        })
    }

    /// Fetch the account id and handle for an access token.
    pub async fn fetch_identity(
        &self,
        platform: SocialPlatform,
        access_token: &str,
    ) -> Result<AccountIdentity, SocialError> {
        let endpoints = &self.config.platform(platform).endpoints;
        let response = self
            .http
            .get(&endpoints.profile_url)
            .bearer_auth(access_token)
            .send()
            .await?;
        let body = read_json(platform, response).await?;

        parse_identity(&body).ok_or_else(|| SocialError::Api {
            platform,
            status: 200,
            body: "Profile response has no account id".into(),
        })
    }
}

fn parse_identity(body: &Value) -> Option<AccountIdentity> {
    let external_account_id = extract_id(body)?;
    let obj = body.get("data").unwrap_or(body);
    let handle = obj
        .get("username")
        .or_else(|| obj.get("name"))
        .and_then(Value::as_str)
        .and_then(|h| validate_handle(h).ok());
    Some(AccountIdentity {
        external_account_id,
        handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn identity_from_twitter_shape() {
        let id = parse_identity(&json!({"data": {"id": "2244994945", "username": "rats_app"}}))
            .unwrap();
        assert_eq!(id.external_account_id, "2244994945");
        assert_eq!(id.handle.as_deref(), Some("rats_app"));
    }

    #[test]
    fn display_name_with_spaces_is_not_a_handle() {
        let id = parse_identity(&json!({"id": "10", "name": "Jane Doe"})).unwrap();
        assert_eq!(id.external_account_id, "10");
        assert_eq!(id.handle, None);
    }

    #[test]
    fn missing_id_is_none() {
        assert!(parse_identity(&json!({"username": "x"})).is_none());
    }

    #[test]
    fn token_expiry_is_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let tokens = TokenSet {
            access_token: "a".into(),
            refresh_token: None,
            expires_in: Some(3600),
        };
        assert_eq!(
            tokens.expires_at(now),
            Some(Utc.with_ymd_and_hms(2026, 1, 1, 1, 0, 0).unwrap())
        );
    }
}
