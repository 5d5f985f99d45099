// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OpenSenseMap upload client.
//!
//! One `POST {server}/boxes/{box_id}/data` per attempt. The box id only
//! ever appears unredacted in the request itself; everything logged uses
//! [`OpenSenseMapClient::redacted_url`].

use crate::credentials::{Credentials, REDACTED_BOX_PLACEHOLDER};
use crate::error::UploadError;
use crate::payload::Payload;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub use crate::config::DEFAULT_SERVER_URL;

/// Start of the body returned by the server for an accepted upload.
pub const SUCCESS_MARKER: &str = "Measurements saved in box";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("osem-relay/", env!("CARGO_PKG_VERSION"));

/// Server reply to an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReceipt {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

/// Something that can deliver one payload.
#[async_trait]
pub trait PostRecord: Send + Sync {
    /// Perform a single upload attempt.
    async fn post(&self, payload: &Payload) -> Result<PostReceipt, UploadError>;

    /// Target URL safe for logs.
    fn redacted_url(&self) -> String;
}

#[async_trait]
impl<P: PostRecord + ?Sized> PostRecord for Arc<P> {
    async fn post(&self, payload: &Payload) -> Result<PostReceipt, UploadError> {
        (**self).post(payload).await
    }

    fn redacted_url(&self) -> String {
        (**self).redacted_url()
    }
}

/// reqwest-backed OpenSenseMap client.
#[derive(Debug, Clone)]
pub struct OpenSenseMapClient {
    client: Client,
    server_url: String,
    credentials: Arc<Credentials>,
}

impl OpenSenseMapClient {
    /// Create a client for `server_url` with a per-request `timeout`.
    pub fn new(
        server_url: impl Into<String>,
        credentials: Arc<Credentials>,
        timeout: Duration,
    ) -> Result<Self, UploadError> {
        let mut auth = HeaderValue::from_str(credentials.auth_key())
            .map_err(|_| UploadError::Client("auth key is not a valid header value".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        let server_url = server_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            server_url,
            credentials,
        })
    }

    /// Request URL with the real box id.
    pub fn data_url(&self) -> String {
        format!(
            "{}/boxes/{}/data",
            self.server_url,
            self.credentials.box_id()
        )
    }
}

#[async_trait]
impl PostRecord for OpenSenseMapClient {
    async fn post(&self, payload: &Payload) -> Result<PostReceipt, UploadError> {
        let response = self
            .client
            .post(self.data_url())
            .header(CONTENT_TYPE, payload.content_type)
            .body(payload.body.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        classify_response(status, &body)?;

        Ok(PostReceipt { status, body })
    }

    fn redacted_url(&self) -> String {
        format!(
            "{}/boxes/{}/data",
            self.server_url, REDACTED_BOX_PLACEHOLDER
        )
    }
}

/// Decide whether a server reply means the upload was accepted.
pub fn classify_response(status: u16, body: &str) -> Result<(), UploadError> {
    if status == 429 {
        return Err(UploadError::Throttled);
    }
    if !(200..300).contains(&status) {
        return Err(UploadError::http_status(status, body));
    }

    let text = body.trim_start();
    let text = text.strip_prefix('"').unwrap_or(text);
    if text.starts_with(SUCCESS_MARKER) {
        Ok(())
    } else {
        Err(UploadError::unexpected_response(body))
    }
}
