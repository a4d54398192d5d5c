//! Request helpers for pages talking to the graph database's JSON plugins.
//!
//! # Overview
//! Two independent tools:
//! - `RequestFactory` builds preconfigured JSON POST requests and wires an
//!   optional completion callback to the request's ready-state transitions.
//! - `query_param` pulls one value out of a URL's query string.
//!
//! # Design
//! - Host-does-IO: the core never opens a socket. The host sends the
//!   `HttpRequest`, then reports state changes (`PostRequest::on_state_change`)
//!   or the finished round-trip (`PostRequest::complete`).
//! - `complete` yields a typed result so callers can tell success, a non-200
//!   status and a transport failure apart.
//! - The query lookup takes the URL as an argument; the host supplies the
//!   current page location.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod factory;
pub mod http;
pub mod query;

pub use config::FactoryConfig;
pub use endpoint::ExtensionEndpoint;
pub use error::ApiError;
pub use factory::{
    check_status, parse_json, Callback, DebugNotifier, PostRequest, RequestFactory, TracingNotifier,
};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ReadyState, RequestMode};
pub use query::{query_param, QueryString};
