/// Middleware modules for the API server
///
/// - `security`: security response headers
/// - `request_log`: request start/finish logging with request ids
///
/// Bearer authentication lives in [`crate::app`] next to the router, since
/// it needs the application state.

pub mod request_log;
pub mod security;
