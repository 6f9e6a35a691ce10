//! Blocking `HttpTransport` backed by ureq.
//!
//! ureq's status-code-as-error behavior is disabled: 4xx/5xx responses come
//! back as data so `AccountClient` can map them.

use std::time::Duration;

use crate::config::DEFAULT_TIMEOUT;
use crate::http::{Body, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpTransport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = match (request.method, request.body) {
            (HttpMethod::Get, _) => self.agent.get(&request.url).call(),
            (HttpMethod::Delete, _) => self.agent.delete(&request.url).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&request.url)
                .content_type("application/json")
                .send(&body[..]),
            (HttpMethod::Post, None) => self.agent.post(&request.url).send_empty(),
        }?;

        let status = response.status().as_u16();
        let body = Body::from_reader(response.into_body().into_reader());
        Ok(HttpResponse { status, body })
    }
}
