//! C-ABI wrapper around `otutils-core`.
//!
//! # Overview
//! Lets a non-Rust host (an embedded browser shell, a native page runner)
//! build preconfigured JSON POST requests, drive their ready-state
//! transitions with a C completion callback, and read query parameters out
//! of the page location it supplies.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The host owns the network: it reads the descriptor from
//!   `otu_request_describe`, sends it, then reports back through
//!   `otu_request_on_state_change` or `otu_request_complete`.
//! - The C caller owns all returned pointers and must call the matching
//!   `otu_*_free` function to release them.

pub mod types;

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use otutils_core::{query_param, Callback, FactoryConfig, HttpResponse, ReadyState, RequestFactory};

use types::*;

/// Borrow a C string as `&str`. Returns `None` for invalid UTF-8.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string that outlives
/// the returned reference.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Factory lifecycle
// ---------------------------------------------------------------------------

/// Create a factory with the default header values.
///
/// The caller must free the returned pointer with `otu_factory_free`.
#[unsafe(no_mangle)]
pub extern "C" fn otu_factory_new() -> *mut FfiFactory {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiFactory {
            inner: RequestFactory::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a factory from a JSON config such as
/// `{"content_type":"application/json"}`.
///
/// Returns null if `config_json` is null, not UTF-8 or not a valid config.
#[unsafe(no_mangle)]
pub extern "C" fn otu_factory_from_config_json(config_json: *const c_char) -> *mut FfiFactory {
    catch_unwind(|| {
        if config_json.is_null() {
            return std::ptr::null_mut();
        }
        let Some(raw) = (unsafe { borrow_str(config_json) }) else {
            return std::ptr::null_mut();
        };
        match FactoryConfig::from_json(raw) {
            Ok(config) => Box::into_raw(Box::new(FfiFactory {
                inner: RequestFactory::with_config(config),
            })),
            Err(e) => {
                tracing::debug!(error = %e, "rejecting factory config");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a factory. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn otu_factory_free(factory: *mut FfiFactory) {
    if !factory.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(factory) });
        });
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Build a POST request bound to `url`.
///
/// A non-null `callback` makes the request asynchronous; it is invoked with
/// `user_data` once the request reaches `Done` with status 200. With `debug`
/// set, every state change logs the response body.
/// Returns null if `factory` or `url` is null, or if `url` is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn otu_request_new(
    factory: *const FfiFactory,
    url: *const c_char,
    callback: FfiCallback,
    user_data: *mut c_void,
    debug: bool,
) -> *mut FfiPostRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if factory.is_null() || url.is_null() {
            return std::ptr::null_mut();
        }
        let factory = unsafe { &*factory };
        let Some(url) = (unsafe { borrow_str(url) }) else {
            return std::ptr::null_mut();
        };

        let callback: Option<Callback> = callback.map(|f| {
            let data = UserData(user_data);
            Box::new(move || {
                let data = &data;
                f(data.0)
            }) as Callback
        });
        let req = factory.inner.build(url, callback, debug);
        Box::into_raw(Box::new(FfiPostRequest { inner: req }))
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Attach a body to the request. The body is sent as-is.
///
/// Returns false if `req` or `body` is null, or if `body` is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn otu_request_set_body(req: *mut FfiPostRequest, body: *const c_char) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if req.is_null() || body.is_null() {
            return false;
        }
        let Some(body) = (unsafe { borrow_str(body) }) else {
            return false;
        };
        let req = unsafe { &mut *req };
        req.inner.set_body(body);
        true
    }))
    .unwrap_or(false)
}

/// Snapshot the request's descriptor so the host can send it.
///
/// Returns null if `req` is null or a field holds an interior NUL byte.
/// Free with `otu_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn otu_request_describe(req: *const FfiPostRequest) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if req.is_null() {
            return std::ptr::null_mut();
        }
        let req = unsafe { &*req };
        FfiHttpRequest::from_core(req.inner.request().clone()).unwrap_or(std::ptr::null_mut())
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Convert an `FfiHttpResponse` to a core `HttpResponse`.
///
/// A null body reads as empty; a body that is not UTF-8 yields `None`.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> Option<HttpResponse> {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { borrow_str(resp.body) }?.to_string()
    };
    Some(HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    })
}

/// Report a ready-state transition (0..=4) with the response seen so far.
#[unsafe(no_mangle)]
pub extern "C" fn otu_request_on_state_change(
    req: *mut FfiPostRequest,
    ready_state: u8,
    response: *const FfiHttpResponse,
) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        if req.is_null() || response.is_null() {
            return FfiErrorCode::NullArg;
        }
        let state = match ReadyState::try_from(ready_state) {
            Ok(state) => state,
            Err(e) => return FfiErrorCode::from(&e),
        };
        let Some(resp) = ffi_response_to_core(unsafe { &*response }) else {
            return FfiErrorCode::InvalidString;
        };
        let req = unsafe { &mut *req };
        req.inner.on_state_change(state, &resp);
        FfiErrorCode::Ok
    }))
    .unwrap_or(FfiErrorCode::Panic)
}

/// Finish the request with a typed outcome.
///
/// Pass the final `response`, or a non-null `transport_error` describing why
/// the host could not complete the round-trip (`response` is then ignored).
/// Free the result with `otu_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn otu_request_complete(
    req: *mut FfiPostRequest,
    response: *const FfiHttpResponse,
    transport_error: *const c_char,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if req.is_null() {
            return FfiResult::null_arg("req");
        }
        let req = unsafe { &mut *req };
        let outcome = if !transport_error.is_null() {
            match unsafe { borrow_str(transport_error) } {
                Some(msg) => Err(msg.to_string()),
                None => return FfiResult::invalid_string("transport_error"),
            }
        } else if response.is_null() {
            return FfiResult::null_arg("response");
        } else {
            match ffi_response_to_core(unsafe { &*response }) {
                Some(resp) => Ok(resp),
                None => return FfiResult::invalid_string("response body"),
            }
        };
        match req.inner.complete(outcome) {
            Ok(resp) => FfiResult::ok(resp.status, resp.body),
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in otu_request_complete"))
}

/// Free a request built by `otu_request_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn otu_request_free(req: *mut FfiPostRequest) {
    if !req.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(req) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Look up `name` in the query string of `url`.
///
/// Returns null when the key is absent, either argument is null or not
/// UTF-8, or the value cannot be represented as a C string.
/// Free a non-null result with `otu_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn otu_query_param(url: *const c_char, name: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        if url.is_null() || name.is_null() {
            return std::ptr::null_mut();
        }
        let (Some(url), Some(name)) = (unsafe { borrow_str(url) }, unsafe { borrow_str(name) }) else {
            return std::ptr::null_mut();
        };
        match query_param(url, name) {
            Some(value) => CString::new(value).map_or(std::ptr::null_mut(), CString::into_raw),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `otu_request_describe`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn otu_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers: Box<[FfiHeader]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiResult` returned by `otu_request_complete`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn otu_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.body.is_null() {
            drop(unsafe { CString::from_raw(result.body) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn otu_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    extern "C" fn bump(user_data: *mut c_void) {
        let counter = unsafe { &*(user_data as *const AtomicUsize) };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn c_str<'a>(ptr: *const c_char) -> &'a str {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
    }

    fn new_request(factory: *const FfiFactory, counter: Option<&AtomicUsize>) -> *mut FfiPostRequest {
        let url = CString::new("http://localhost:7474/db/data/ext/treeJsons/graphdb/getTree").unwrap();
        match counter {
            Some(c) => otu_request_new(
                factory,
                url.as_ptr(),
                Some(bump),
                c as *const AtomicUsize as *mut c_void,
                false,
            ),
            None => otu_request_new(factory, url.as_ptr(), None, std::ptr::null_mut(), false),
        }
    }

    #[test]
    fn factory_new_and_free() {
        let factory = otu_factory_new();
        assert!(!factory.is_null());
        otu_factory_free(factory);
    }

    #[test]
    fn factory_free_null_is_safe() {
        otu_factory_free(std::ptr::null_mut());
    }

    #[test]
    fn factory_from_config_json() {
        let cfg = CString::new(r#"{"content_type":"application/json"}"#).unwrap();
        let factory = otu_factory_from_config_json(cfg.as_ptr());
        assert!(!factory.is_null());

        let req = new_request(factory, None);
        let desc = otu_request_describe(req);
        let d = unsafe { &*desc };
        let headers = unsafe { std::slice::from_raw_parts(d.headers, d.headers_len as usize) };
        assert_eq!(c_str(headers[1].value), "application/json");

        otu_free_request(desc);
        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn factory_from_bad_config_returns_null() {
        let cfg = CString::new("not json").unwrap();
        assert!(otu_factory_from_config_json(cfg.as_ptr()).is_null());
        assert!(otu_factory_from_config_json(std::ptr::null()).is_null());
    }

    #[test]
    fn request_new_null_args_return_null() {
        let factory = otu_factory_new();
        let url = CString::new("http://x").unwrap();
        assert!(otu_request_new(std::ptr::null(), url.as_ptr(), None, std::ptr::null_mut(), false).is_null());
        assert!(otu_request_new(factory, std::ptr::null(), None, std::ptr::null_mut(), false).is_null());
        otu_factory_free(factory);
    }

    #[test]
    fn describe_async_request_with_body() {
        let factory = otu_factory_new();
        let counter = AtomicUsize::new(0);
        let req = new_request(factory, Some(&counter));
        let body = CString::new(r#"{"treeId":"t1"}"#).unwrap();
        assert!(otu_request_set_body(req, body.as_ptr()));

        let desc = otu_request_describe(req);
        assert!(!desc.is_null());
        let d = unsafe { &*desc };
        assert!(matches!(d.method, FfiHttpMethod::Post));
        assert!(d.is_async);
        assert_eq!(
            c_str(d.url),
            "http://localhost:7474/db/data/ext/treeJsons/graphdb/getTree"
        );
        assert_eq!(c_str(d.body), r#"{"treeId":"t1"}"#);

        assert_eq!(d.headers_len, 2);
        let headers = unsafe { std::slice::from_raw_parts(d.headers, 2) };
        assert_eq!(c_str(headers[0].key), "Accept");
        assert_eq!(c_str(headers[0].value), "");
        assert_eq!(c_str(headers[1].key), "Content-Type");
        assert_eq!(c_str(headers[1].value), "Application/json");

        otu_free_request(desc);
        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn describe_sync_request_has_no_body() {
        let factory = otu_factory_new();
        let req = new_request(factory, None);
        let desc = otu_request_describe(req);
        let d = unsafe { &*desc };
        assert!(!d.is_async);
        assert!(d.body.is_null());

        otu_free_request(desc);
        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn callback_runs_once_on_done_200() {
        let factory = otu_factory_new();
        let counter = AtomicUsize::new(0);
        let req = new_request(factory, Some(&counter));
        let body = CString::new("{}").unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };

        for state in [1u8, 2, 3] {
            assert_eq!(otu_request_on_state_change(req, state, &resp), FfiErrorCode::Ok);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(otu_request_on_state_change(req, 4, &resp), FfiErrorCode::Ok);
        assert_eq!(otu_request_on_state_change(req, 4, &resp), FfiErrorCode::Ok);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn callback_skipped_on_404() {
        let factory = otu_factory_new();
        let counter = AtomicUsize::new(0);
        let req = new_request(factory, Some(&counter));
        let resp = FfiHttpResponse {
            status: 404,
            body: std::ptr::null(),
        };
        assert_eq!(otu_request_on_state_change(req, 4, &resp), FfiErrorCode::Ok);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn on_state_change_rejects_bad_input() {
        let factory = otu_factory_new();
        let req = new_request(factory, None);
        let resp = FfiHttpResponse {
            status: 200,
            body: std::ptr::null(),
        };
        assert_eq!(otu_request_on_state_change(req, 9, &resp), FfiErrorCode::InvalidReadyState);
        assert_eq!(otu_request_on_state_change(req, 4, std::ptr::null()), FfiErrorCode::NullArg);
        assert_eq!(otu_request_on_state_change(std::ptr::null_mut(), 4, &resp), FfiErrorCode::NullArg);

        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn complete_success() {
        let factory = otu_factory_new();
        let counter = AtomicUsize::new(0);
        let req = new_request(factory, Some(&counter));
        let body = CString::new(r#"{"ok":true}"#).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = otu_request_complete(req, &resp, std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(r.http_status, 200);
        assert_eq!(c_str(r.body), r#"{"ok":true}"#);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        otu_free_result(result);
        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn complete_http_error_keeps_status_and_body() {
        let factory = otu_factory_new();
        let req = new_request(factory, None);
        let body = CString::new("no such plugin").unwrap();
        let resp = FfiHttpResponse {
            status: 404,
            body: body.as_ptr(),
        };
        let result = otu_request_complete(req, &resp, std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 404);
        assert_eq!(c_str(r.body), "no such plugin");
        assert!(!r.error_message.is_null());

        otu_free_result(result);
        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn complete_transport_error() {
        let factory = otu_factory_new();
        let req = new_request(factory, None);
        let msg = CString::new("connection refused").unwrap();
        let result = otu_request_complete(req, std::ptr::null(), msg.as_ptr());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Transport);
        assert_eq!(c_str(r.error_message), "transport failed: connection refused");
        assert!(r.body.is_null());

        otu_free_result(result);
        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn complete_null_args() {
        let result = otu_request_complete(std::ptr::null_mut(), std::ptr::null(), std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        otu_free_result(result);

        let factory = otu_factory_new();
        let req = new_request(factory, None);
        let result = otu_request_complete(req, std::ptr::null(), std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        otu_free_result(result);
        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn invalid_utf8_is_rejected_not_emptied() {
        let bad = CString::new(vec![0xffu8, 0xfe]).unwrap();
        let url = CString::new("http://h/p?=secret&a=1").unwrap();
        assert!(otu_query_param(url.as_ptr(), bad.as_ptr()).is_null());
        assert!(otu_query_param(bad.as_ptr(), url.as_ptr()).is_null());

        let factory = otu_factory_new();
        let bad_url = CString::new(vec![b'h', 0xff, b'x']).unwrap();
        assert!(otu_request_new(factory, bad_url.as_ptr(), None, std::ptr::null_mut(), false).is_null());
        assert!(otu_factory_from_config_json(bad.as_ptr()).is_null());

        let req = new_request(factory, None);
        assert!(!otu_request_set_body(req, bad.as_ptr()));

        let resp = FfiHttpResponse {
            status: 200,
            body: bad.as_ptr(),
        };
        assert_eq!(otu_request_on_state_change(req, 4, &resp), FfiErrorCode::InvalidString);

        let result = otu_request_complete(req, &resp, std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::InvalidString);
        otu_free_result(result);

        let result = otu_request_complete(req, std::ptr::null(), bad.as_ptr());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::InvalidString);
        otu_free_result(result);

        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn empty_key_only_matches_when_asked_for() {
        let url = CString::new("http://h/p?=secret&a=1").unwrap();
        let empty = CString::new("").unwrap();
        let v = otu_query_param(url.as_ptr(), empty.as_ptr());
        assert_eq!(c_str(v), "secret");
        otu_free_string(v);
    }

    #[test]
    fn interior_nul_in_body_is_an_error() {
        let result = FfiResult::ok(200, "a\0b".to_string());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidString);
        assert!(r.body.is_null());
        otu_free_result(result);

        let result = FfiResult::from_error(otutils_core::ApiError::HttpError {
            status: 500,
            body: "x\0y".to_string(),
        });
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidString);
        assert_eq!(r.http_status, 500);
        otu_free_result(result);
    }

    #[test]
    fn describe_with_interior_nul_url_returns_null() {
        let factory = otu_factory_new();
        let mut post = unsafe { &*factory }.inner.build("http://h/\0x", None, false);
        post.set_body("{}");
        let req = Box::into_raw(Box::new(FfiPostRequest { inner: post }));
        assert!(otu_request_describe(req).is_null());
        otu_request_free(req);
        otu_factory_free(factory);
    }

    #[test]
    fn query_param_found_and_absent() {
        let url = CString::new("http://localhost/page?foo=1&foo=2&bar=x%20y").unwrap();
        let foo = CString::new("foo").unwrap();
        let bar = CString::new("bar").unwrap();
        let missing = CString::new("missing").unwrap();

        let v = otu_query_param(url.as_ptr(), foo.as_ptr());
        assert_eq!(c_str(v), "1");
        otu_free_string(v);

        let v = otu_query_param(url.as_ptr(), bar.as_ptr());
        assert_eq!(c_str(v), "x%20y");
        otu_free_string(v);

        assert!(otu_query_param(url.as_ptr(), missing.as_ptr()).is_null());
        assert!(otu_query_param(std::ptr::null(), foo.as_ptr()).is_null());
    }

    #[test]
    fn round_trip_against_mock_server() {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener).await
            })
            .unwrap();
        });

        let factory = otu_factory_new();
        let counter = AtomicUsize::new(0);
        let url = CString::new(format!(
            "http://{addr}/db/data/ext/studyJsons/graphdb/getStudyList"
        ))
        .unwrap();
        let req = otu_request_new(
            factory,
            url.as_ptr(),
            Some(bump),
            &counter as *const AtomicUsize as *mut c_void,
            false,
        );
        let body = CString::new("{}").unwrap();
        otu_request_set_body(req, body.as_ptr());

        // Play the C host: read the descriptor and send it.
        let desc = otu_request_describe(req);
        let d = unsafe { &*desc };
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        let mut builder = agent.post(c_str(d.url));
        for h in unsafe { std::slice::from_raw_parts(d.headers, d.headers_len as usize) } {
            builder = builder.header(c_str(h.key), c_str(h.value));
        }
        let mut response = builder.send(c_str(d.body).as_bytes()).unwrap();
        let status = response.status().as_u16();
        let text = CString::new(response.body_mut().read_to_string().unwrap()).unwrap();
        otu_free_request(desc);

        let resp = FfiHttpResponse {
            status,
            body: text.as_ptr(),
        };
        let result = otu_request_complete(req, &resp, std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(c_str(r.body).contains("getStudyList"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        otu_free_result(result);
        otu_request_free(req);
        otu_factory_free(factory);
    }
}
