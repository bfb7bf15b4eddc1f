//! HTTP client for the moderation API
//!
//! Maps HTTP failures back onto `ModerationError` so the console reports the
//! same categories the server produced.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use moderation_core::entities::{
    ModerationAction, ModerationItemId, ModerationQueueItem, ModerationStatus,
};
use moderation_core::wire::{ActionRequest, ActionResponse, ErrorBody};
use moderation_core::ModerationError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::gateway::ModerationGateway;

/// HTTP client for communicating with the moderation API
#[derive(Clone)]
pub struct ModerationClient {
    client: reqwest::Client,
    base_url: String,
}

impl ModerationClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn action_url(&self, item_id: &ModerationItemId) -> String {
        format!(
            "{}/moderation/action/{}",
            self.base_url,
            urlencoding::encode(item_id.as_str())
        )
    }
}

#[async_trait]
impl ModerationGateway for ModerationClient {
    async fn fetch_queue(&self) -> Result<Vec<ModerationQueueItem>, ModerationError> {
        let url = format!("{}/moderation/queue", self.base_url);
        let response = self.client.get(&url).send().await.map_err(transport_error)?;

        handle_json_response(response, "queue").await
    }

    async fn submit_action(
        &self,
        item_id: &ModerationItemId,
        action: ModerationAction,
        reason: Option<&str>,
    ) -> Result<ActionResponse, ModerationError> {
        let response = self
            .client
            .post(self.action_url(item_id))
            .json(&ActionRequest {
                action: action.to_string(),
                reason: reason.map(str::to_string),
            })
            .send()
            .await
            .map_err(transport_error)?;

        handle_json_response(response, item_id.as_str()).await
    }
}

async fn handle_json_response<T: DeserializeOwned>(
    response: reqwest::Response,
    subject: &str,
) -> Result<T, ModerationError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        let error_body = serde_json::from_str::<ErrorBody>(&body).ok();
        tracing::debug!(status = status.as_u16(), body = %body, "API request failed");
        return Err(map_error_response(status, error_body, subject));
    }

    serde_json::from_str(&body)
        .map_err(|e| ModerationError::TransientIo(format!("Malformed API response: {}", e)))
}

fn transport_error(err: reqwest::Error) -> ModerationError {
    if err.is_timeout() {
        ModerationError::TransientIo("Request timed out".to_string())
    } else {
        ModerationError::TransientIo(format!("Request failed: {}", err))
    }
}

/// Translate a failed response into the error taxonomy
pub fn map_error_response(
    status: StatusCode,
    body: Option<ErrorBody>,
    subject: &str,
) -> ModerationError {
    let code = body.as_ref().and_then(|b| b.code.as_deref()).unwrap_or_default();
    let details = body
        .as_ref()
        .and_then(|b| b.details.clone().or_else(|| Some(b.error.clone())))
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::UNAUTHORIZED => ModerationError::Unauthorized("API key was rejected".to_string()),
        StatusCode::FORBIDDEN => ModerationError::Unauthorized(details),
        StatusCode::BAD_REQUEST => match code {
            "missing_item_id" => ModerationError::MissingItemId,
            "validation" => ModerationError::Validation(details),
            _ => ModerationError::InvalidAction(details),
        },
        StatusCode::NOT_FOUND => ModerationError::NotFound(subject.to_string()),
        StatusCode::CONFLICT => ModerationError::InvalidState {
            id: subject.to_string(),
            // Older servers omit the status; anything but pending blocks the action
            status: body
                .and_then(|b| b.current_status)
                .unwrap_or(ModerationStatus::Approved),
        },
        StatusCode::TOO_MANY_REQUESTS => {
            ModerationError::TransientIo("Rate limited, try again shortly".to_string())
        }
        s if s.is_server_error() => ModerationError::TransientIo(details),
        _ => ModerationError::TransientIo(format!("Unexpected response {}: {}", status, details)),
    }
}
