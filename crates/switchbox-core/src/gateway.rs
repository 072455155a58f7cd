//! HTTP client for the actuator service REST API.
//!
//! This module provides the [`SwitchGateway`] seam the store talks through,
//! and [`HttpGateway`], the reqwest-backed implementation of it. Each
//! operation is a single round trip; no retries happen here, recovery
//! policy belongs to the caller.
//!
//! # Example
//!
//! ```no_run
//! use switchbox_core::gateway::{HttpGateway, SwitchGateway};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpGateway::new("https://apiaaspassmartbox.vercel.app")?;
//! let state = gateway.fetch_status().await?;
//! println!("Power: {}", state.power);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use switchbox_types::{DeviceState, ScheduleDraft, ScheduleState};

use crate::error::{GatewayError, Result};
use crate::wire::{
    PowerTimerPayload, PowerTimerUpdate, SchedulePayload, ScheduleRequest, StatusPayload,
    TimerRequest,
};

/// The command/query surface of the actuator service.
///
/// This trait enables writing code that works against both the real HTTP
/// service and a mock for testing. Every operation maps transport, protocol,
/// and parse failures into a [`GatewayError`] instead of panicking past the
/// boundary.
#[async_trait]
pub trait SwitchGateway: Send + Sync {
    /// Fetch the full authoritative device state.
    async fn fetch_status(&self) -> Result<DeviceState>;

    /// Flip the actuator's power. The service decides any timer side
    /// effects and reports them back.
    async fn toggle(&self) -> Result<PowerTimerUpdate>;

    /// Start a one-shot countdown of `minutes` (fractional minutes allowed,
    /// must be positive; callers pre-validate).
    async fn start_timer(&self, minutes: f64) -> Result<PowerTimerUpdate>;

    /// Submit a clock schedule. Only called with a submit-valid draft.
    async fn set_schedule(&self, draft: &ScheduleDraft) -> Result<ScheduleState>;

    /// Clear the clock schedule. The response carries no state; the result
    /// is deterministic.
    async fn clear_schedule(&self) -> Result<()>;
}

/// HTTP implementation of [`SwitchGateway`].
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a new gateway client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the actuator service
    ///   (e.g., "https://apiaaspassmartbox.vercel.app")
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_url(base_url)?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Transport {
                url: base_url.clone(),
                source: e,
            })?;
        Ok(Self { client, base_url })
    }

    /// Create a gateway with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = normalize_url(base_url)?;
        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| GatewayError::Transport {
                    url: url.clone(),
                    source: e,
                })?;
        handle_response(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response =
            self.client
                .post(&url)
                .send()
                .await
                .map_err(|e| GatewayError::Transport {
                    url: url.clone(),
                    source: e,
                })?;
        handle_response(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            GatewayError::Transport {
                url: url.clone(),
                source: e,
            }
        })?;
        handle_response(response).await
    }

    async fn post_ack(&self, path: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        let response =
            self.client
                .post(&url)
                .send()
                .await
                .map_err(|e| GatewayError::Transport {
                    url: url.clone(),
                    source: e,
                })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(protocol_error(status, response).await)
        }
    }
}

#[async_trait]
impl SwitchGateway for HttpGateway {
    async fn fetch_status(&self) -> Result<DeviceState> {
        let payload: StatusPayload = self.get("/api/status").await?;
        payload.into_state()
    }

    async fn toggle(&self) -> Result<PowerTimerUpdate> {
        let payload: PowerTimerPayload = self.post_empty("/api/toggle").await?;
        payload.into_update()
    }

    async fn start_timer(&self, minutes: f64) -> Result<PowerTimerUpdate> {
        let payload: PowerTimerPayload = self
            .post_json("/api/schedule", &TimerRequest { minutes })
            .await?;
        payload.into_update()
    }

    async fn set_schedule(&self, draft: &ScheduleDraft) -> Result<ScheduleState> {
        let payload: SchedulePayload = self
            .post_json("/api/set-schedule", &ScheduleRequest::from_draft(draft))
            .await?;
        payload.into_schedule()
    }

    async fn clear_schedule(&self) -> Result<()> {
        self.post_ack("/api/clear-schedule").await
    }
}

fn normalize_url(base_url: &str) -> Result<String> {
    // Normalize URL (remove trailing slash)
    let base_url = base_url.trim_end_matches('/').to_string();

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(GatewayError::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }
    Ok(base_url)
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))
    } else {
        Err(protocol_error(status, response).await)
    }
}

async fn protocol_error(status: reqwest::StatusCode, response: reqwest::Response) -> GatewayError {
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| status.to_string());

    GatewayError::Protocol {
        status: status.as_u16(),
        message,
    }
}
