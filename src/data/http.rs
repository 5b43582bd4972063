//! Blocking HTTP transport.
//!
//! Both fetchers talk to the network only through `HttpTransport`, so they
//! can be driven offline by `ReplayTransport` in tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::data::outcome::FetchError;

/// Fixed per-request timeout. There is exactly one attempt per request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status code and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The HTTP capability the fetchers need.
///
/// Implementations return `Err` only when no response was received; status
/// checks are left to the caller.
pub trait HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;

    fn post_json(&self, url: &str, body: &Value, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError>;
}

/// Production transport on `reqwest::blocking`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(format!("GET {url} failed: {e}")))?;
        read_response(url, resp)
    }

    fn post_json(&self, url: &str, body: &Value, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        let mut req = self.client.post(url).json(body);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = req
            .send()
            .map_err(|e| FetchError::Transport(format!("POST {url} failed: {e}")))?;
        read_response(url, resp)
    }
}

fn read_response(url: &str, resp: reqwest::blocking::Response) -> Result<HttpResponse, FetchError> {
    let status = resp.status().as_u16();
    let body = resp
        .text()
        .map_err(|e| FetchError::Transport(format!("failed to read body from {url}: {e}")))?;
    Ok(HttpResponse { status, body })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A request as seen by `ReplayTransport`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

/// Transport that answers from canned responses and records every request.
///
/// Unknown URLs fail with a transport error, the same way an unreachable
/// host would.
#[derive(Debug, Default)]
pub struct ReplayTransport {
    responses: HashMap<(Method, String), Result<HttpResponse, FetchError>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl ReplayTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_get(mut self, url: impl Into<String>, response: HttpResponse) -> Self {
        self.responses.insert((Method::Get, url.into()), Ok(response));
        self
    }

    pub fn with_post(mut self, url: impl Into<String>, response: HttpResponse) -> Self {
        self.responses.insert((Method::Post, url.into()), Ok(response));
        self
    }

    pub fn with_failure(mut self, method: Method, url: impl Into<String>, error: FetchError) -> Self {
        self.responses.insert((method, url.into()), Err(error));
        self
    }

    /// Every request made so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self, method: Method) -> usize {
        self.requests.borrow().iter().filter(|r| r.method == method).count()
    }

    fn answer(&self, request: RecordedRequest) -> Result<HttpResponse, FetchError> {
        let key = (request.method, request.url.clone());
        self.requests.borrow_mut().push(request);
        match self.responses.get(&key) {
            Some(response) => response.clone(),
            None => Err(FetchError::Transport(format!("no route to {}", key.1))),
        }
    }
}

impl HttpTransport for ReplayTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.answer(RecordedRequest {
            method: Method::Get,
            url: url.to_string(),
            body: None,
            headers: Vec::new(),
        })
    }

    fn post_json(&self, url: &str, body: &Value, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        self.answer(RecordedRequest {
            method: Method::Post,
            url: url.to_string(),
            body: Some(body.clone()),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }
}
