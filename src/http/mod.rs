//! HTTP client module
//!
//! Thin layer over `reqwest` that every platform call goes through.
//!
//! # Features
//!
//! - **Authentication**: the API key is attached to every request
//! - **Status classification**: non-2xx responses become typed errors
//! - **Connection reuse**: one pooled client per run

mod client;

pub(crate) use client::decode_json;
pub use client::{HttpClient, RequestConfig, API_PREFIX};
