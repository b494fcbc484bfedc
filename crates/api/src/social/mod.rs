//! Social platform integration.
//!
//! - [`oauth`] -- authorization URLs, code exchange and identity lookup.
//! - [`publisher`] -- the [`publisher::SocialPublisher`] seam that posts text.
//!
//! [`SocialHub`] bundles both with the token cipher and lives in `AppState`.

pub mod oauth;
pub mod publisher;

use std::sync::Arc;
use std::time::Duration;

use rats_core::crypto::TokenCipher;
use rats_core::social::SocialPlatform;
use serde_json::Value;

use crate::config::ServerConfig;
use oauth::OAuthClient;
use publisher::{HttpPublisher, SocialPublisher};

/// Timeout for every call to a social platform.
const HTTP_TIMEOUT_SECS: u64 = 15;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform answered with an error status or an unusable body.
    #[error("{platform} API error ({status}): {body}")]
    Api {
        platform: SocialPlatform,
        status: u16,
        body: String,
    },

    /// The platform has no OAuth client configured.
    #[error("{0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// OAuth client credentials registered with a platform.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// URLs of one platform's OAuth and publishing API.
#[derive(Debug, Clone)]
pub struct PlatformEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub profile_url: String,
    pub publish_url: String,
    pub scopes: String,
}

impl PlatformEndpoints {
    pub fn defaults(platform: SocialPlatform) -> Self {
        let (authorize, token, profile, publish, scopes) = match platform {
            SocialPlatform::Twitter => (
                "https://twitter.com/i/oauth2/authorize",
                "https://api.twitter.com/2/oauth2/token",
                "https://api.twitter.com/2/users/me",
                "https://api.twitter.com/2/tweets",
                "tweet.read tweet.write users.read offline.access",
            ),
            SocialPlatform::Facebook => (
                "https://www.facebook.com/v19.0/dialog/oauth",
                "https://graph.facebook.com/v19.0/oauth/access_token",
                "https://graph.facebook.com/v19.0/me?fields=id,name",
                "https://graph.facebook.com/v19.0/me/feed",
                "public_profile,pages_manage_posts",
            ),
            SocialPlatform::Instagram => (
                "https://api.instagram.com/oauth/authorize",
                "https://api.instagram.com/oauth/access_token",
                "https://graph.instagram.com/me?fields=id,username",
                "https://graph.instagram.com/me/media",
                "user_profile,user_media",
            ),
        };
        Self {
            authorize_url: authorize.into(),
            token_url: token.into(),
            profile_url: profile.into(),
            publish_url: publish.into(),
            scopes: scopes.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// `None` when the platform's client id or secret is not set.
    pub credentials: Option<ClientCredentials>,
    pub endpoints: PlatformEndpoints,
}

/// OAuth configuration for every supported platform.
#[derive(Debug, Clone)]
pub struct SocialConfig {
    /// Client URL the platforms redirect back to; `/{platform}/callback` is appended.
    pub redirect_base_url: String,
    pub twitter: PlatformConfig,
    pub facebook: PlatformConfig,
    pub instagram: PlatformConfig,
}

impl SocialConfig {
    /// Load from the environment.
    ///
    /// | Env Var                           | Default                          |
    /// |-----------------------------------|----------------------------------|
    /// | `SOCIAL_REDIRECT_BASE_URL`        | `http://localhost:5173/social`   |
    /// | `{TWITTER,FACEBOOK,INSTAGRAM}_CLIENT_ID`     | unset (platform disabled) |
    /// | `{TWITTER,FACEBOOK,INSTAGRAM}_CLIENT_SECRET` | unset (platform disabled) |
    pub fn from_env() -> Self {
        let redirect_base_url = std::env::var("SOCIAL_REDIRECT_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173/social".into())
            .trim_end_matches('/')
            .to_string();

        let platform = |p: SocialPlatform| {
            let prefix = p.as_str().to_uppercase();
            let read = |suffix: &str| {
                std::env::var(format!("{prefix}_{suffix}"))
                    .ok()
                    .filter(|v| !v.trim().is_empty())
            };
            let credentials = match (read("CLIENT_ID"), read("CLIENT_SECRET")) {
                (Some(client_id), Some(client_secret)) => Some(ClientCredentials {
                    client_id,
                    client_secret,
                }),
                _ => None,
            };
            PlatformConfig {
                credentials,
                endpoints: PlatformEndpoints::defaults(p),
            }
        };

        Self {
            redirect_base_url,
            twitter: platform(SocialPlatform::Twitter),
            facebook: platform(SocialPlatform::Facebook),
            instagram: platform(SocialPlatform::Instagram),
        }
    }

    pub fn platform(&self, platform: SocialPlatform) -> &PlatformConfig {
        match platform {
            SocialPlatform::Twitter => &self.twitter,
            SocialPlatform::Facebook => &self.facebook,
            SocialPlatform::Instagram => &self.instagram,
        }
    }

    /// Credentials for `platform`, or [`SocialError::Config`] when unset.
    pub fn credentials(&self, platform: SocialPlatform) -> Result<&ClientCredentials, SocialError> {
        self.platform(platform)
            .credentials
            .as_ref()
            .ok_or_else(|| SocialError::Config(format!("{platform} linking is not configured")))
    }

    pub fn redirect_uri(&self, platform: SocialPlatform) -> String {
        format!("{}/{}/callback", self.redirect_base_url, platform)
    }
}

// ---------------------------------------------------------------------------
// Hub
// ---------------------------------------------------------------------------

/// Everything the social handlers and the post dispatcher need.
pub struct SocialHub {
    pub oauth: OAuthClient,
    pub cipher: TokenCipher,
    pub publisher: Arc<dyn SocialPublisher>,
}

impl SocialHub {
    /// Build the production hub: HTTP OAuth client and HTTP publisher.
    pub fn new(config: &ServerConfig) -> Result<Self, SocialError> {
        let http = build_http_client()?;
        let publisher = Arc::new(HttpPublisher::new(http.clone(), config.social.clone()));
        Ok(Self::with_publisher(config, http, publisher))
    }

    /// Build a hub around a caller-supplied publisher.
    pub fn with_publisher(
        config: &ServerConfig,
        http: reqwest::Client,
        publisher: Arc<dyn SocialPublisher>,
    ) -> Self {
        Self {
            oauth: OAuthClient::new(http, config.social.clone()),
            cipher: TokenCipher::from_secret(&config.token_encryption_key),
            publisher,
        }
    }
}

pub fn build_http_client() -> Result<reqwest::Client, SocialError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?)
}

/// Read a JSON body, turning non-2xx statuses into [`SocialError::Api`].
async fn read_json(
    platform: SocialPlatform,
    response: reqwest::Response,
) -> Result<Value, SocialError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SocialError::Api {
            platform,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<Value>().await?)
}

/// Pull an id out of `{"id": ..}` or `{"data": {"id": ..}}`. Numeric ids are
/// stringified.
fn extract_id(body: &Value) -> Option<String> {
    let obj = body.get("data").unwrap_or(body);
    match obj.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
