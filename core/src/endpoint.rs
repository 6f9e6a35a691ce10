//! Parameterized HTTP endpoints.
//!
//! # Design
//! An `Endpoint` binds a method, a URL template with `{name}` placeholders and
//! a shared transport. Each call collects its parameters in a fresh
//! `RequestOptions`, resolves them into an `HttpRequest` and performs exactly
//! one round trip. Nothing is cached or retried.
//!
//! Placeholders without a matching parameter are left in the URL as-is.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use url::{form_urlencoded, Url};

use crate::error::{ApiError, ParamError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Per-call request parameters.
///
/// Path parameters are keyed, so setting the same key twice keeps the last
/// value, and are substituted in key order. Query parameters keep their
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    path_params: BTreeMap<String, Value>,
    query_params: Vec<(String, Value)>,
    body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.path_params.insert(key.into(), value.into());
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// One HTTP operation against a templated URL.
#[derive(Clone)]
pub struct Endpoint {
    method: HttpMethod,
    url_template: String,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("url_template", &self.url_template)
            .finish_non_exhaustive()
    }
}

impl Endpoint {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        url_template: impl Into<String>,
        method: HttpMethod,
    ) -> Self {
        Self {
            method,
            url_template: url_template.into(),
            transport,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Resolve `options` into a request without sending it.
    pub fn build_request(&self, options: RequestOptions) -> Result<HttpRequest> {
        let path = resolve_path(&self.url_template, &options.path_params)?;
        let url = append_query(&path, &options.query_params)?;

        Ok(HttpRequest {
            method: self.method,
            url,
            body: options.body,
        })
    }

    /// Build the request and send it through the transport.
    pub fn execute(&self, options: RequestOptions) -> Result<HttpResponse> {
        let request = self.build_request(options)?;
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.transport.send(request).map_err(ApiError::Transport)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

/// Substitute every `{key}` occurrence in `template` with its parameter value.
fn resolve_path(template: &str, params: &BTreeMap<String, Value>) -> Result<String> {
    let mut resolved = template.to_string();
    for (key, value) in params {
        let value = serialize_param(key, value).map_err(ApiError::BuildUrl)?;
        resolved = resolved.replace(&format!("{{{key}}}"), value);
    }
    Ok(resolved)
}

/// Append query parameters in order. The path itself is only validated, never
/// re-serialized, so unfilled placeholders and path values stay verbatim.
fn append_query(path: &str, params: &[(String, Value)]) -> Result<String> {
    Url::parse(path).map_err(|source| ApiError::RequestConstruction {
        url: path.to_string(),
        source,
    })?;

    if params.is_empty() {
        return Ok(path.to_string());
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        let value = serialize_param(key, value).map_err(ApiError::BuildUrl)?;
        query.append_pair(key, value);
    }

    let separator = match path.find('?') {
        None => "?",
        Some(_) if path.ends_with('?') || path.ends_with('&') => "",
        Some(_) => "&",
    };
    Ok(format!("{path}{separator}{}", query.finish()))
}

fn serialize_param<'a>(key: &str, value: &'a Value) -> std::result::Result<&'a str, ParamError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(ParamError::UnsupportedType {
            key: key.to_string(),
            kind: value_kind(other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
