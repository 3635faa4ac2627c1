use std::fmt;
use std::time::Duration;

use graft_core::PageId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The engine only ever runs code in the page's own top-level context.
const EXECUTION_WORLD_PAGE: &str = "page";

/// One request to run code inside a page's script context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub target_page: PageId,
    pub execution_world: &'static str,
    pub code: String,
    pub args: Vec<Value>,
}

impl ExecuteRequest {
    pub fn new(target_page: PageId, code: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            target_page,
            execution_world: EXECUTION_WORLD_PAGE,
            code: code.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeError {
    pub kind: BridgeFailureKind,
    pub message: String,
}

impl BridgeError {
    pub(crate) fn new(kind: BridgeFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeFailureKind {
    /// The host rejected the request (page gone, permission denied).
    Rejected,
    HttpStatus(u16),
    Timeout,
    InvalidResponse,
    Network,
}

impl fmt::Display for BridgeFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeFailureKind::Rejected => write!(f, "rejected by host"),
            BridgeFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            BridgeFailureKind::Timeout => write!(f, "timeout"),
            BridgeFailureKind::InvalidResponse => write!(f, "invalid response"),
            BridgeFailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Capability-scoped access to a page's execution context: send code, get a
/// result back or a failure. The engine's only way into a page.
#[async_trait::async_trait]
pub trait PageBridge: Send + Sync {
    async fn execute(&self, request: ExecuteRequest) -> Result<Value, BridgeError>;
}

/// Connection settings for the bridge host.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl BridgeSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Bridge speaking the execution protocol as JSON over HTTP to the host that
/// owns the actual pages. The host answers `{"result": ...}` on success or
/// `{"error": "..."}` when it rejects the request.
#[derive(Debug, Clone)]
pub struct HttpBridge {
    settings: BridgeSettings,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpBridge {
    pub fn new(settings: BridgeSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, BridgeError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| BridgeError::new(BridgeFailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl PageBridge for HttpBridge {
    async fn execute(&self, request: ExecuteRequest) -> Result<Value, BridgeError> {
        let client = self.build_client()?;

        let response = client
            .post(&self.settings.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::new(
                BridgeFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body: ExecuteResponse = response
            .json()
            .await
            .map_err(|err| BridgeError::new(BridgeFailureKind::InvalidResponse, err.to_string()))?;

        if let Some(error) = body.error {
            return Err(BridgeError::new(BridgeFailureKind::Rejected, error));
        }
        Ok(body.result.unwrap_or(Value::Null))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> BridgeError {
    if err.is_timeout() {
        return BridgeError::new(BridgeFailureKind::Timeout, err.to_string());
    }
    BridgeError::new(BridgeFailureKind::Network, err.to_string())
}
