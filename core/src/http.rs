//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe a request and its response as plain data. The core
//! crate builds `HttpRequest` values and reacts to `HttpResponse` values
//! without touching the network; the host executes the round-trip and
//! reports ready-state transitions back.
//!
//! All fields use owned types (`String`, `Vec`) so values can cross the FFI
//! boundary without lifetime concerns.

use crate::error::ApiError;

/// HTTP method for a request. The factory only ever produces `Post`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

/// Whether the host should execute the request without blocking the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Async,
    Sync,
}

/// Lifecycle stage reported by the host while a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    Unsent = 0,
    Opened = 1,
    HeadersReceived = 2,
    Loading = 3,
    Done = 4,
}

impl TryFrom<u8> for ReadyState {
    type Error = ApiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ReadyState::Unsent),
            1 => Ok(ReadyState::Opened),
            2 => Ok(ReadyState::HeadersReceived),
            3 => Ok(ReadyState::Loading),
            4 => Ok(ReadyState::Done),
            other => Err(ApiError::InvalidReadyState(other)),
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `RequestFactory::build`. The caller attaches a body and is
/// responsible for sending it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub mode: RequestMode,
}

impl HttpRequest {
    /// First header value whose name matches `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Partial responses (bodies seen while `Loading`) are allowed; only the
/// response reported with `ReadyState::Done` is considered final.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
