//! Access to the message collection on the server

use crate::config::{ClientConfig, CsrfToken};
use crate::error::{InboxError, InboxResult};
use crate::message::{Message, MessageId};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Operations the view model needs from the message service
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Fetch the whole collection, in server order
    async fn list(&self) -> InboxResult<Vec<Message>>;

    /// Fetch one message by id
    async fn get(&self, id: &MessageId) -> InboxResult<Message>;

    /// Store a new message; returns whatever records the server echoes back
    async fn create(&self, draft: &Message) -> InboxResult<Vec<Message>>;
}

/// POST responses may carry the saved record, a list of records, or nothing
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Message>),
    One(Message),
}

impl From<OneOrMany> for Vec<Message> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(messages) => messages,
            OneOrMany::One(message) => vec![message],
        }
    }
}

/// Records echoed by a successful POST. Bodies that are not message-shaped
/// yield nothing; the save itself already went through.
fn parse_created(body: &str) -> Vec<Message> {
    if body.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<OneOrMany>(body) {
        Ok(parsed) => parsed.into(),
        Err(e) => {
            tracing::debug!("Ignoring unrecognised save response: {}", e);
            Vec::new()
        }
    }
}

/// Default headers for every request: JSON content type plus the CSRF header
fn default_headers(csrf: Option<&CsrfToken>) -> InboxResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(csrf) = csrf {
        let (name, value) = csrf.to_header()?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// `MessageStore` backed by the service's JSON REST endpoints
pub struct RestMessageStore {
    client: Client,
    collection_url: Url,
    request_timeout: Option<Duration>,
}

impl RestMessageStore {
    /// Build a store from configuration
    pub fn from_config(config: &ClientConfig) -> InboxResult<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .default_headers(default_headers(config.csrf.as_ref())?)
            .user_agent(config.user_agent.clone());
        if let Some(request_timeout) = config.request_timeout() {
            builder = builder.timeout(request_timeout);
        }

        let client = builder
            .build()
            .map_err(|e| InboxError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            collection_url: config.collection_url()?,
            request_timeout: config.request_timeout(),
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    /// URL of a single message: `rest/{id}`
    pub fn message_url(&self, id: &MessageId) -> InboxResult<Url> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| InboxError::config("Collection URL cannot have path segments"))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }

    /// Map a transport error, reporting timeouts with the configured limit
    fn transport_error(&self, err: reqwest::Error, context: &str) -> InboxError {
        if err.is_timeout() {
            InboxError::timeout(self.request_timeout.unwrap_or_default())
        } else if err.is_decode() {
            InboxError::invalid_response(format!("{}: {}", context, err))
        } else {
            InboxError::from(err)
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> InboxResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e, "Request failed"))?;

        if !response.status().is_success() {
            return Err(InboxError::status(
                response.status().as_u16(),
                response.url().as_str(),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl MessageStore for RestMessageStore {
    async fn list(&self) -> InboxResult<Vec<Message>> {
        tracing::debug!("GET {}", self.collection_url);
        let response = self.send(self.client.get(self.collection_url.clone())).await?;

        let messages: Vec<Message> = response
            .json()
            .await
            .map_err(|e| self.transport_error(e, "Failed to parse message list"))?;

        tracing::debug!("Fetched {} messages", messages.len());
        Ok(messages)
    }

    async fn get(&self, id: &MessageId) -> InboxResult<Message> {
        let url = self.message_url(id)?;
        tracing::debug!("GET {}", url);
        let response = self.send(self.client.get(url)).await?;

        response
            .json()
            .await
            .map_err(|e| self.transport_error(e, &format!("Failed to parse message {}", id)))
    }

    async fn create(&self, draft: &Message) -> InboxResult<Vec<Message>> {
        let body = serde_json::to_string(draft)?;
        tracing::debug!("POST {} ({} bytes)", self.collection_url, body.len());

        let response = self
            .send(self.client.post(self.collection_url.clone()).body(body))
            .await?;

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, "Failed to read save response"))?;
        Ok(parse_created(&text))
    }
}
