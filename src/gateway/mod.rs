//! Remote state gateway
//!
//! This module provides:
//! - `RemoteStateGateway` for link → document and document → link
//! - `StateStore`, the authenticated store behind it
//! - `HttpStateStore` (feature `http`) and `MemoryStateStore`

#[cfg(feature = "http")]
mod http;
mod input;
mod memory;
mod remote;
mod store;

#[cfg(feature = "http")]
pub use http::HttpStateStore;
pub use input::{bare_query_state, DecodeMode, QueryParams, ViewerInput, JSON_URL_PARAM};
pub use memory::MemoryStateStore;
pub use remote::RemoteStateGateway;
pub use store::{pointer_from_body, StateStore};
