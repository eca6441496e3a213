//! HTTP client for the layout-parsing service.
//!
//! One POST per call, no retries: the service is expected to run locally
//! and a failure usually means it is not started. Failures are classified
//! into transport errors (nothing came back), HTTP errors (non-200) and
//! application errors (200 with a non-zero `errorCode`) so the caller can
//! print the right diagnostic.

use crate::config::ClientConfig;
use crate::error::LayoutError;
use crate::request::LayoutRequest;
use crate::response::LayoutResponse;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Client bound to one service host.
#[derive(Debug, Clone)]
pub struct LayoutClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl LayoutClient {
    pub fn new(config: ClientConfig) -> Result<Self, LayoutError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LayoutError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL requests are posted to.
    pub fn endpoint_url(&self) -> String {
        self.config.endpoint_url()
    }

    /// Send `request` and validate the answer.
    ///
    /// Returns the parsed response only when the service answered 200 with
    /// `errorCode` 0. A body without `errorCode` is treated as code -1 and
    /// therefore as an application error.
    pub async fn call(&self, request: &LayoutRequest) -> Result<LayoutResponse, LayoutError> {
        let url = self.endpoint_url();
        let progress = self.config.progress();
        progress.on_request_start(&url);
        info!(
            "POST {} (fileType {}, {} bytes payload)",
            url,
            request.file_type,
            request.file.len()
        );

        let start = Instant::now();
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(&url, e))?;

        let status = response.status();
        progress.on_response_status(status.as_u16());
        debug!(
            "HTTP {} after {}ms",
            status.as_u16(),
            start.elapsed().as_millis()
        );

        let body = response.text().await.map_err(|e| self.classify(&url, e))?;

        if status != reqwest::StatusCode::OK {
            warn!("Service answered HTTP {}", status.as_u16());
            return Err(LayoutError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let raw: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| LayoutError::InvalidResponse(format!("body is not JSON: {e}")))?;
        let parsed = LayoutResponse::from_value(raw);
        progress.on_response_envelope(&parsed.log_id, parsed.error_code);

        if !parsed.is_success() {
            warn!(
                "API error {} (logId {}): {}",
                parsed.error_code, parsed.log_id, parsed.error_msg
            );
            return Err(LayoutError::Api {
                code: parsed.error_code,
                message: parsed.error_msg,
                log_id: parsed.log_id,
            });
        }

        info!(
            "Layout parsing succeeded in {}ms (logId {})",
            start.elapsed().as_millis(),
            parsed.log_id
        );
        Ok(parsed)
    }

    /// Connection problems win over timeouts: a connect timeout means the
    /// host is unreachable, not that parsing was slow.
    fn classify(&self, url: &str, e: reqwest::Error) -> LayoutError {
        if e.is_connect() {
            LayoutError::ConnectionFailed {
                host: self.config.host.clone(),
                detail: error_chain(&e),
            }
        } else if e.is_timeout() {
            LayoutError::Timeout {
                secs: self.config.timeout_secs,
            }
        } else {
            LayoutError::RequestFailed {
                url: url.to_string(),
                detail: error_chain(&e),
            }
        }
    }
}

/// `e` and its sources joined with ": ".
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}
