//! Timed HTTP client for the message store.
//!
//! Each call performs exactly one round trip and reports how long it took,
//! measured from sending the request until the whole response body has been
//! received. Decoding happens after the clock stops. There are no retries and
//! no caching; every error is returned to the caller.

use std::time::{Duration, Instant};

use reqwest::{RequestBuilder, Url};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::message::{self, Message, MessageCount, PostMessage};
use crate::metrics::{OperationKind, TimingSample};

/// A decoded response together with its round-trip time.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    /// Which call produced this value.
    pub kind: OperationKind,
    /// Round-trip time.
    pub elapsed: Duration,
    /// HTTP status of the response.
    pub status: u16,
    /// Decoded response body.
    pub value: T,
}

impl<T> Timed<T> {
    /// The timing half of this response.
    #[must_use]
    pub fn sample(&self) -> TimingSample {
        TimingSample::new(self.kind, self.elapsed)
    }

    /// Split into the timing sample and the value.
    #[must_use]
    pub fn into_parts(self) -> (TimingSample, T) {
        (TimingSample::new(self.kind, self.elapsed), self.value)
    }
}

/// Client for `POST /messages`, `GET /messages` and `GET /messages/count`.
///
/// Cloning is cheap and clones share one connection pool, so a single client
/// can be handed to every concurrent worker.
#[derive(Debug, Clone)]
pub struct MessageClient {
    http: reqwest::Client,
    messages_url: Url,
    count_url: Url,
}

impl MessageClient {
    /// Build a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid and
    /// [`Error::Http`] if the underlying HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let base = config.url()?;
        let root = base.as_str().trim_end_matches('/');
        let messages_url = Url::parse(&format!("{root}/messages"))
            .map_err(|e| Error::Config(format!("cannot build messages URL: {e}")))?;
        let count_url = Url::parse(&format!("{root}/messages/count"))
            .map_err(|e| Error::Config(format!("cannot build count URL: {e}")))?;

        let mut builder = reqwest::Client::builder().default_headers(config.header_map()?);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            messages_url,
            count_url,
        })
    }

    /// URL used for posting and listing messages.
    #[must_use]
    pub fn messages_url(&self) -> &Url {
        &self.messages_url
    }

    /// Post one message. The response must be JSON; its shape is not checked.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses and non-JSON bodies.
    pub async fn post_message(&self, text: &str) -> Result<Timed<serde_json::Value>> {
        let request = self
            .http
            .post(self.messages_url.clone())
            .json(&PostMessage::new(text));
        self.exchange(OperationKind::PostMessage, request, |body| {
            serde_json::from_slice(body)
        })
        .await
    }

    /// Read messages starting at `offset`. Ordering is up to the store.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses and bodies that are not a list of
    /// messages.
    pub async fn get_messages(&self, offset: u64) -> Result<Timed<Vec<Message>>> {
        let request = self
            .http
            .get(self.messages_url.clone())
            .query(&[("OFFSET", offset)]);
        self.exchange(OperationKind::GetMessages, request, message::decode_messages)
            .await
    }

    /// Read the total number of stored messages.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses and bodies without an `int` field.
    pub async fn get_count(&self) -> Result<Timed<MessageCount>> {
        let request = self.http.get(self.count_url.clone());
        self.exchange(OperationKind::GetCount, request, |body| {
            serde_json::from_slice(body)
        })
        .await
    }

    async fn exchange<T>(
        &self,
        kind: OperationKind,
        request: RequestBuilder,
        decode: impl FnOnce(&[u8]) -> std::result::Result<T, serde_json::Error>,
    ) -> Result<Timed<T>> {
        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let elapsed = start.elapsed();

        debug!(
            operation = %kind,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "round trip complete"
        );

        if !status.is_success() {
            return Err(Error::Status {
                operation: kind,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim_end().to_string(),
            });
        }

        Ok(Timed {
            kind,
            elapsed,
            status: status.as_u16(),
            value: decode(&body)?,
        })
    }
}
