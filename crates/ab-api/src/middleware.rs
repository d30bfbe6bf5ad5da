//! advert-board/crates/ab-api/src/middleware.rs
//!
//! Request logging and caller-identity extraction.

use actix_web::middleware::Logger;
use actix_web::HttpRequest;

/// Header the transport layer uses to inject the authenticated owner id.
/// The engine treats the value as an opaque string.
pub const OWNER_UUID_HEADER: &str = "x-owner-uuid";

/// Returns a standard set of middleware for the Advert-Board API.
pub fn standard_middleware() -> Logger {
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

/// Reads the caller identity injected by the transport, if any.
/// An absent or empty header means the call is unauthenticated.
pub fn caller_uuid(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(OWNER_UUID_HEADER)?
        .to_str()
        .ok()
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
