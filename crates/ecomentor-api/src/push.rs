//! Push-token registration with the backend, and the remote push gateway.

use std::time::Duration;

use ecomentor_core::{DeepLink, NotificationContent, Platform};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{ApiClient, ApiError};

/// Expo's public push endpoint.
pub const DEFAULT_GATEWAY_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Linear backoff: after failed attempt `k` wait `k × step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            step: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.step * attempt
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PushTokenRegistration<'a> {
    token: &'a str,
    platform: Platform,
    user_id: Option<i64>,
    device_id: Option<&'a str>,
}

impl ApiClient {
    /// Upsert this device's push token, retrying with linear backoff.
    ///
    /// Returns the number of attempts made on success, or the last error
    /// once every attempt has failed.
    pub async fn upsert_push_token(
        &self,
        token: &str,
        platform: Platform,
        policy: RetryPolicy,
    ) -> Result<u32, ApiError> {
        let body = PushTokenRegistration {
            token,
            platform,
            user_id: None,
            device_id: None,
        };

        let attempts = policy.attempts.max(1);
        let mut attempt = 1;
        loop {
            let req = self.request(Method::POST, "/push-tokens").json(&body);
            match self.execute_unit(req).await {
                Ok(()) => {
                    info!(attempt, "push token registered");
                    return Ok(attempt);
                }
                Err(e) if attempt < attempts => {
                    debug!(attempt, error = %e, "push token upsert failed, retrying");
                    tokio::time::sleep(policy.delay_after(attempt)).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "push token upsert gave up");
                    return Err(e);
                }
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum PushError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("push rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PushPriority {
    Default,
    Normal,
    High,
}

/// Message accepted by the push gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<PushPriority>,
}

impl PushMessage {
    pub fn new(to: &str, content: &NotificationContent) -> Self {
        Self {
            to: to.to_string(),
            title: content.title.clone(),
            body: content.body.clone(),
            data: content.link.to_data(),
            sound: Some("default".into()),
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: PushPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn link(&self) -> Option<DeepLink> {
        DeepLink::from_data(&self.data)
    }
}

/// Ticket returned for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTicket {
    pub id: Option<String>,
}

#[derive(Deserialize)]
struct TicketData {
    status: Option<String>,
    id: Option<String>,
    message: Option<String>,
}

/// Pull the single ticket out of a gateway reply.
///
/// `data` may be an object or a one-element array; top-level `errors` carry
/// the reason when the request as a whole was refused.
pub fn parse_ticket(reply: &Value) -> Result<PushTicket, PushError> {
    let data = match reply.get("data") {
        Some(Value::Array(items)) => items.first(),
        Some(other) => Some(other),
        None => None,
    };
    let ticket = data
        .cloned()
        .and_then(|d| serde_json::from_value::<TicketData>(d).ok());

    if let Some(t) = &ticket
        && t.status.as_deref() == Some("ok")
    {
        return Ok(PushTicket { id: t.id.clone() });
    }

    let reason = ticket
        .and_then(|t| t.message)
        .or_else(|| {
            reply
                .get("errors")?
                .get(0)?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| "send_failed".to_string());
    Err(PushError::Rejected(reason))
}

/// Client for the third-party push delivery gateway.
#[derive(Clone)]
pub struct PushGateway {
    client: reqwest::Client,
    url: String,
}

impl PushGateway {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn send(&self, msg: &PushMessage) -> Result<PushTicket, PushError> {
        debug!(url = %self.url, title = %msg.title, "sending remote push");
        let reply: Value = self.client.post(&self.url).json(msg).send().await?.json().await?;
        let ticket = parse_ticket(&reply)?;
        info!(ticket = ?ticket.id, "remote push accepted");
        Ok(ticket)
    }
}

impl Default for PushGateway {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_URL.to_string())
    }
}
