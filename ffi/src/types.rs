//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use otutils_core::{ApiError, HttpMethod, HttpRequest, RequestMode};

/// Opaque handle to a `RequestFactory`.
pub struct FfiFactory {
    pub(crate) inner: otutils_core::RequestFactory,
}

/// Opaque handle to a `PostRequest` built by `otu_request_new`.
pub struct FfiPostRequest {
    pub(crate) inner: otutils_core::PostRequest,
}

/// Completion callback supplied by C. Receives the `user_data` pointer that
/// was passed to `otu_request_new`.
pub type FfiCallback = Option<extern "C" fn(user_data: *mut c_void)>;

/// Carries the C caller's `user_data` into the boxed Rust callback.
pub(crate) struct UserData(pub(crate) *mut c_void);

// The pointer is only handed back to the C callback; the caller owns
// whatever it points to.
unsafe impl Send for UserData {}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Post = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A snapshot of a request's descriptor for the C host to send.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
    pub is_async: bool,
}

/// Move a string onto the C heap. `None` if it holds an interior NUL.
fn c_string(s: String) -> Option<*mut c_char> {
    CString::new(s).ok().map(CString::into_raw)
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    ///
    /// Returns `None` if any field holds an interior NUL. Nothing is
    /// allocated on the C side until every field has converted.
    pub(crate) fn from_core(req: HttpRequest) -> Option<*mut Self> {
        let url = CString::new(req.url).ok()?;
        let body = req.body.map(CString::new).transpose().ok()?;
        let headers = req
            .headers
            .into_iter()
            .map(|(k, v)| Some((CString::new(k).ok()?, CString::new(v).ok()?)))
            .collect::<Option<Vec<_>>>()?;

        let headers_len = headers.len() as u32;
        let headers = if headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: k.into_raw(),
                    value: v.into_raw(),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Some(Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: url.into_raw(),
            headers,
            headers_len,
            body: body.map_or(std::ptr::null_mut(), CString::into_raw),
            is_async: req.mode == RequestMode::Async,
        })))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller builds this on the stack; the FFI layer reads but does not
/// free these fields. A null `body` reads as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned across the boundary.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Transport = 2,
    InvalidReadyState = 3,
    Serialization = 4,
    Deserialization = 5,
    Config = 6,
    Panic = 7,
    NullArg = 8,
    /// A string was not UTF-8 on the way in, or held an interior NUL on the
    /// way out.
    InvalidString = 9,
}

impl From<&ApiError> for FfiErrorCode {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::HttpError { .. } => FfiErrorCode::Http,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::InvalidReadyState(_) => FfiErrorCode::InvalidReadyState,
            ApiError::SerializationError(_) => FfiErrorCode::Serialization,
            ApiError::DeserializationError(_) => FfiErrorCode::Deserialization,
            ApiError::Config(_) => FfiErrorCode::Config,
        }
    }
}

/// Result envelope for `otu_request_complete`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `body` holds
/// the response body. On failure `error_message` is a human-readable C
/// string; `http_status` and `body` are set for `Http` errors. A body that
/// cannot cross as a C string turns the result into `InvalidString`.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub body: *mut c_char,
}

impl FfiResult {
    pub(crate) fn ok(status: u16, body: String) -> *mut Self {
        let Some(body) = c_string(body) else {
            return Self::interior_nul(status);
        };
        Box::into_raw(Box::new(FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: status,
            body,
        }))
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let error_code = FfiErrorCode::from(&err);
        let msg = err.to_string();
        let (http_status, body) = match err {
            ApiError::HttpError { status, body } => (status, Some(body)),
            _ => (0, None),
        };
        let body = match body.map(CString::new).transpose() {
            Ok(body) => body,
            Err(_) => return Self::interior_nul(http_status),
        };
        let Some(error_message) = c_string(msg) else {
            return Self::interior_nul(http_status);
        };
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message,
            http_status,
            body: body.map_or(std::ptr::null_mut(), CString::into_raw),
        }))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    pub(crate) fn invalid_string(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::InvalidString, 0, &format!("{name} is not valid UTF-8"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, 0, msg)
    }

    fn interior_nul(http_status: u16) -> *mut Self {
        Self::failure(
            FfiErrorCode::InvalidString,
            http_status,
            "response contains an interior NUL byte",
        )
    }

    /// `msg` comes from this crate and never holds a NUL.
    fn failure(error_code: FfiErrorCode, http_status: u16, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: c_string(msg.to_string()).unwrap_or(std::ptr::null_mut()),
            http_status,
            body: std::ptr::null_mut(),
        }))
    }
}
