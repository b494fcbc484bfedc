//! Publishing text posts to a linked account.

use async_trait::async_trait;
use rats_core::social::SocialPlatform;
use serde_json::{Map, Value};

use super::{extract_id, read_json, SocialConfig, SocialError};

/// Publishes a post and returns the platform's id for it.
#[async_trait]
pub trait SocialPublisher: Send + Sync {
    async fn publish(
        &self,
        platform: SocialPlatform,
        access_token: &str,
        content: &str,
    ) -> Result<String, SocialError>;
}

/// [`SocialPublisher`] that POSTs JSON to each platform's publish endpoint.
pub struct HttpPublisher {
    http: reqwest::Client,
    config: SocialConfig,
}

impl HttpPublisher {
    pub fn new(http: reqwest::Client, config: SocialConfig) -> Self {
        Self { http, config }
    }
}

/// Name of the text field in each platform's publish body.
fn text_field(platform: SocialPlatform) -> &'static str {
    match platform {
        SocialPlatform::Twitter => "text",
        SocialPlatform::Facebook => "message",
        SocialPlatform::Instagram => "caption",
    }
}

#[async_trait]
impl SocialPublisher for HttpPublisher {
    async fn publish(
        &self,
        platform: SocialPlatform,
        access_token: &str,
        content: &str,
    ) -> Result<String, SocialError> {
        let url = &self.config.platform(platform).endpoints.publish_url;
        let mut body = Map::new();
        body.insert(text_field(platform).into(), Value::String(content.into()));

        let response = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;
        let reply = read_json(platform, response).await?;

        extract_id(&reply).ok_or_else(|| SocialError::Api {
            platform,
            status: 200,
            body: "Publish response has no post id".into(),
        })
    }
}
