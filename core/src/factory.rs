//! Preconfigured JSON POST requests with completion callbacks.
//!
//! # Design
//! `RequestFactory` only stamps out `PostRequest` values; it holds the header
//! defaults and nothing else. A `PostRequest` owns the request descriptor,
//! the optional completion callback and the debug flag. The host sends the
//! request and reports each ready-state transition through
//! `on_state_change`, or hands the finished round-trip to `complete` for a
//! typed result.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::config::FactoryConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ReadyState, RequestMode};

/// Zero-argument completion callback.
pub type Callback = Box<dyn FnMut() + Send>;

/// Receives the raw response body on every state change of a debug request.
pub trait DebugNotifier {
    fn notify(&self, body: &str);
}

impl<F> DebugNotifier for F
where
    F: Fn(&str),
{
    fn notify(&self, body: &str) {
        self(body)
    }
}

/// Default notifier: emits the body as an INFO event on `otutils::debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl DebugNotifier for TracingNotifier {
    fn notify(&self, body: &str) {
        info!(target: "otutils::debug", body, "response body");
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestFactory {
    config: FactoryConfig,
}

impl RequestFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FactoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Build a POST request bound to `url`.
    ///
    /// The request is asynchronous iff `callback` is supplied. The URL is
    /// taken verbatim.
    pub fn build(&self, url: &str, callback: Option<Callback>, debug_mode: bool) -> PostRequest {
        let mode = if callback.is_some() {
            RequestMode::Async
        } else {
            RequestMode::Sync
        };
        debug!(url, ?mode, debug_mode, "building POST request");

        PostRequest {
            request: HttpRequest {
                method: HttpMethod::Post,
                url: url.to_string(),
                headers: vec![
                    ("Accept".to_string(), self.config.accept.clone()),
                    ("Content-Type".to_string(), self.config.content_type.clone()),
                ],
                body: None,
                mode,
            },
            callback,
            debug: debug_mode,
            notifier: Box::new(TracingNotifier),
            fired: false,
        }
    }
}

/// A configured request waiting to be sent by the host.
pub struct PostRequest {
    request: HttpRequest,
    callback: Option<Callback>,
    debug: bool,
    notifier: Box<dyn DebugNotifier + Send>,
    fired: bool,
}

impl fmt::Debug for PostRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostRequest")
            .field("request", &self.request)
            .field("has_callback", &self.callback.is_some())
            .field("debug", &self.debug)
            .field("fired", &self.fired)
            .finish()
    }
}

impl PostRequest {
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn is_async(&self) -> bool {
        self.request.mode == RequestMode::Async
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.set_body(body);
        self
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.request.body = Some(body.into());
    }

    pub fn with_json_body<T: Serialize>(self, payload: &T) -> Result<Self, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.with_body(body))
    }

    pub fn with_notifier(mut self, notifier: impl DebugNotifier + Send + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Hand the descriptor to the host for sending. Drops the callback.
    pub fn into_request(self) -> HttpRequest {
        self.request
    }

    /// React to a ready-state transition reported by the host.
    ///
    /// Does nothing unless a callback was supplied. Returns `true` when this
    /// transition ran the callback, which happens at most once: on `Done`
    /// with status 200.
    pub fn on_state_change(&mut self, state: ReadyState, response: &HttpResponse) -> bool {
        let Some(callback) = self.callback.as_mut() else {
            return false;
        };
        trace!(url = %self.request.url, ?state, status = response.status, "state change");

        if self.debug {
            self.notifier.notify(&response.body);
        }
        if state == ReadyState::Done && response.status == 200 && !self.fired {
            self.fired = true;
            callback();
            return true;
        }
        false
    }

    /// Finish the round-trip with a typed outcome.
    ///
    /// A response is reported as a `Done` transition first, so the callback
    /// and debug notifier behave exactly as with `on_state_change`.
    pub fn complete<E: fmt::Display>(
        &mut self,
        result: Result<HttpResponse, E>,
    ) -> Result<HttpResponse, ApiError> {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %self.request.url, error = %e, "transport failed");
                return Err(ApiError::Transport(e.to_string()));
            }
        };
        self.on_state_change(ReadyState::Done, &response);
        check_status(&response)?;
        Ok(response)
    }
}

/// Map anything but 200 to `ApiError::HttpError`.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Check for 200 and decode the body as JSON.
pub fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
