//! Middleware shared by every router.
//!
//! - [`panic`]: converts handler panics into JSON `500` responses
//!
//! Request timing lives in `appbase_observability::timing_middleware`.

pub mod panic;

pub use panic::handle_panic;
