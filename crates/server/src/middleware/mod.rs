//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS (any origin, as the mobile app and web preview both call in)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)

pub mod request_id;

pub use request_id::request_id_middleware;
