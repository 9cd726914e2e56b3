//! Authentication module
//!
//! The platform authenticates every request with a single static API key sent
//! in the `x-api-key` header. The key is opaque to this crate: it is never
//! logged, never printed and never mutated after construction.

mod api_key;

pub use api_key::{ApiKey, API_KEY_HEADER};
