//! Authentication
//!
//! Bearer API keys resolve to an `Actor`, which handlers receive through
//! request extensions.

mod api_key;

pub use api_key::auth_middleware;
