use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};
use strum_macros::AsRefStr;

use crate::web::types::{coerce_to_string, ValidEmail};

pub const SUBSCRIPTION_SOURCE: &str = "QorTruth.news";
pub const UTM_SOURCE: &str = "website";

/// Tags the signup with the newsletter the reader asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr)]
pub enum UtmMedium {
    #[serde(rename = "newsletter")]
    #[strum(serialize = "newsletter")]
    Newsletter,
    #[serde(rename = "newsletter+weekend")]
    #[strum(serialize = "newsletter+weekend")]
    NewsletterWeekend,
}

impl From<bool> for UtmMedium {
    fn from(weekend: bool) -> Self {
        if weekend {
            Self::NewsletterWeekend
        } else {
            Self::Newsletter
        }
    }
}

/// The body posted to the provider's subscriptions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionPayload {
    pub email: String,
    pub send_welcome_email: bool,
    pub source: &'static str,
    pub utm_source: &'static str,
    pub utm_medium: UtmMedium,
}

impl SubscriptionPayload {
    pub fn new(email: &ValidEmail, weekend: bool) -> Self {
        Self {
            email: email.as_ref().to_string(),
            send_welcome_email: true,
            source: SUBSCRIPTION_SOURCE,
            utm_source: UTM_SOURCE,
            utm_medium: weekend.into(),
        }
    }
}

/// What came back from the provider. `body` is an empty object if the response wasn't JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn from_parts(status: StatusCode, bytes: &[u8]) -> Self {
        let body = serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Map::new()));
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The provider's own `message` field, if it sent a usable one.
    pub fn message(&self) -> Option<String> {
        self.body
            .get("message")
            .map(coerce_to_string)
            .filter(|msg| !msg.is_empty())
    }
}

/// The seam between the request handler and the newsletter provider.
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// Issues exactly one request, the status of the response is not interpreted here.
    async fn submit_subscription(&self, payload: &SubscriptionPayload)
        -> Result<UpstreamResponse>;
}

#[derive(Debug)]
pub struct BeehiivClient {
    pub http_client: Client,
    pub base_url: reqwest::Url,
    publication_id: SecretString,
    api_key: SecretString,
}

impl BeehiivClient {
    pub fn new<S: AsRef<str>>(
        base_url: S,
        publication_id: SecretString,
        api_key: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        // `Url::join` drops the last path segment unless it ends with a slash.
        let mut base_url = base_url.as_ref().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url =
            reqwest::Url::parse(&base_url).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Reqwest(e.without_url()))?;

        Ok(BeehiivClient {
            http_client,
            base_url,
            publication_id,
            api_key,
        })
    }

    fn subscriptions_url(&self) -> Result<reqwest::Url> {
        self.base_url
            .join(&format!(
                "publications/{}/subscriptions",
                self.publication_id.expose_secret()
            ))
            // The parse error doesn't include the input, so it is safe to surface.
            .map_err(|e| Error::UrlParsing(e.to_string()))
    }
}

#[async_trait]
impl SubscriptionApi for BeehiivClient {
    #[tracing::instrument(
        name = "Submitting subscription to beehiiv",
        skip(self, payload),
        fields(utm_medium = payload.utm_medium.as_ref())
    )]
    async fn submit_subscription(
        &self,
        payload: &SubscriptionPayload,
    ) -> Result<UpstreamResponse> {
        let url = self.subscriptions_url()?;

        let resp = self
            .http_client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Reqwest(e.without_url()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::Reqwest(e.without_url()))?;
        tracing::debug!("beehiiv responded with: {status}");

        Ok(UpstreamResponse::from_parts(status, &bytes))
    }
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

/// Errors never carry the request URL since it contains the publication id.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid beehiiv url: {0}")]
    UrlParsing(String),
    #[error(transparent)]
    Reqwest(reqwest::Error),
}
