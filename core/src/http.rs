//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. The client builds an `HttpRequest`,
//! hands it to a `Transport`, and gets an `HttpResult` back. A transport never
//! fails with `Err`: network errors are folded into `HttpResult::error` so the
//! client can always pass the outcome on to the completion callback.
//!
//! `UreqTransport` is the blocking default. Tests substitute any closure of
//! type `Fn(HttpRequest) -> HttpResult`.

use tracing::warn;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// The outcome of one request/response cycle.
///
/// `status` is `0` and `error` is set when no response was received at all.
#[derive(Debug, Clone, Default)]
pub struct HttpResult {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub data: Vec<u8>,
    pub error: Option<String>,
}

impl HttpResult {
    /// A result for a request that never produced a response.
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// True when a response arrived with a 2xx status.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup; returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// True when the response declares a JSON body.
    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
    }
}

/// Executes a single HTTP request.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> HttpResult;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> HttpResult + Send + Sync,
{
    fn execute(&self, request: HttpRequest) -> HttpResult {
        self(request)
    }
}

/// Blocking transport backed by `ureq`.
///
/// Status codes are never turned into errors, so 4xx/5xx responses reach the
/// caller with their headers and body intact.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a preconfigured agent (timeouts, proxy, TLS). The agent should
    /// have `http_status_as_error` disabled.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> HttpResult {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let body = body.unwrap_or_default();

        let response = match method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &headers).call(),
            HttpMethod::Post => with_headers(self.agent.post(&url), &headers).send(&body[..]),
            HttpMethod::Put => with_headers(self.agent.put(&url), &headers).send(&body[..]),
            HttpMethod::Delete => {
                with_headers(self.agent.delete(&url).force_send_body(), &headers).send(&body[..])
            }
        };

        let mut response = match response {
            Ok(response) => response,
            Err(err) => {
                warn!(%err, method = method.as_str(), %url, "transport error");
                return HttpResult::transport_error(err.to_string());
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        match response.body_mut().read_to_vec() {
            Ok(data) => HttpResult {
                status,
                headers,
                data,
                error: None,
            },
            Err(err) => {
                warn!(%err, %url, "failed to read response body");
                HttpResult {
                    status,
                    headers,
                    data: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }
}
