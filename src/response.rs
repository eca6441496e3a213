//! Views over the layout-parsing response.
//!
//! The raw JSON is kept as-is in [`LayoutResponse`] so it can be dumped
//! verbatim to `full_response.json`. Envelope fields are read leniently:
//! the service is never assumed to send a well-formed body. Page results
//! are deserialised on demand; every page field is optional on the wire.

use crate::error::LayoutError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// `errorCode` used when the service omits it. Non-zero, so it reads as failure.
pub const MISSING_ERROR_CODE: i64 = -1;

/// `logId` used when the service omits it.
pub const MISSING_LOG_ID: &str = "N/A";

/// A parsed 200 response.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResponse {
    pub error_code: i64,
    pub error_msg: String,
    pub log_id: String,
    raw: Value,
}

impl LayoutResponse {
    /// Read the envelope out of a response body, defaulting absent fields.
    pub fn from_value(raw: Value) -> Self {
        let error_code = raw
            .get("errorCode")
            .and_then(integral_code)
            .unwrap_or(MISSING_ERROR_CODE);
        let error_msg = raw
            .get("errorMsg")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let log_id = match raw.get("logId") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => MISSING_LOG_ID.to_string(),
            Some(other) => other.to_string(),
        };
        Self {
            error_code,
            error_msg,
            log_id,
            raw,
        }
    }

    /// True when `errorCode` is 0.
    pub fn is_success(&self) -> bool {
        self.error_code == 0
    }

    /// The unmodified response body.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// `result.layoutParsingResults`, in order. Missing levels yield no pages.
    pub fn pages(&self) -> Result<Vec<PageResult>, LayoutError> {
        let results = match self
            .raw
            .get("result")
            .and_then(|r| r.get("layoutParsingResults"))
        {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(v) => v,
        };
        Vec::<PageResult>::deserialize(results)
            .map_err(|e| LayoutError::InvalidResponse(format!("layoutParsingResults: {e}")))
    }
}

/// One entry of `layoutParsingResults`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageResult {
    #[serde(deserialize_with = "null_as_default")]
    pub markdown: MarkdownResult,
    /// Visualization name → base64 image.
    #[serde(deserialize_with = "null_as_default")]
    pub output_images: Map<String, Value>,
    /// Arbitrary structured layout data.
    pub pruned_result: Value,
}

/// `markdown` of a page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkdownResult {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    /// Image name (may contain `/`) → base64 image.
    #[serde(deserialize_with = "null_as_default")]
    pub images: Map<String, Value>,
}

/// `errorCode` as an integer. Integral floats such as `0.0` count too.
fn integral_code(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| {
        v.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Python-style truthiness: null, false, 0, "", [] and {} are empty.
pub fn is_empty_value(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
