//! Client configuration.
//!
//! Everything that used to be a module-level constant in a throwaway test
//! script (host, endpoint, timeout) lives in [`ClientConfig`] and is passed
//! explicitly down the call chain. Built via [`ClientConfigBuilder`].

use crate::error::LayoutError;
use crate::progress::{NoopProgressCallback, ProbeProgressCallback, ProgressCallback};
use std::fmt;

/// Default base URL of the layout-parsing service.
pub const DEFAULT_HOST: &str = "http://127.0.0.1:58811";

/// Path of the layout-parsing operation on the service.
pub const LAYOUT_PARSING_ENDPOINT: &str = "/layout-parsing";

/// Default request timeout. Multi-page PDFs can take minutes to parse.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for a [`crate::client::LayoutClient`].
///
/// # Example
/// ```rust
/// use layout_probe::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .host("http://10.0.0.5:8080")
///     .timeout_secs(120)
///     .build()
///     .unwrap();
/// assert_eq!(config.timeout_secs, 120);
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the service, scheme included. Default: [`DEFAULT_HOST`].
    pub host: String,

    /// Path appended to `host`. Default: [`LAYOUT_PARSING_ENDPOINT`].
    pub endpoint: String,

    /// Whole-request timeout in seconds. Default: 300.
    pub timeout_secs: u64,

    /// Ask the service for visualization images (`outputImages`). Default: true.
    pub visualize: bool,

    /// Receives request and materialization events. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            endpoint: LAYOUT_PARSING_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            visualize: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("visualize", &self.visualize)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ProbeProgressCallback>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// `{host}{endpoint}`, tolerating a trailing `/` on the host.
    pub fn endpoint_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if self.endpoint.starts_with('/') {
            format!("{}{}", host, self.endpoint)
        } else {
            format!("{}/{}", host, self.endpoint)
        }
    }

    /// The configured callback, or a no-op one.
    pub(crate) fn progress(&self) -> &dyn ProbeProgressCallback {
        match self.progress_callback.as_deref() {
            Some(cb) => cb,
            None => &NoopProgressCallback,
        }
    }
}

/// Builder for [`ClientConfig`].
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ClientConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into().trim().to_string();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn visualize(mut self, v: bool) -> Self {
        self.config.visualize = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, LayoutError> {
        let c = &self.config;
        let authority = c
            .host
            .strip_prefix("http://")
            .or_else(|| c.host.strip_prefix("https://"));
        match authority {
            None => {
                return Err(LayoutError::InvalidConfig(format!(
                    "host must start with http:// or https://, got '{}'",
                    c.host
                )));
            }
            Some(rest) if rest.trim_matches('/').is_empty() => {
                return Err(LayoutError::InvalidConfig(format!(
                    "host '{}' has no address",
                    c.host
                )));
            }
            Some(_) => {}
        }
        if c.timeout_secs == 0 {
            return Err(LayoutError::InvalidConfig(
                "timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
