//! Contracts for the collaborators generated actions talk to.
//!
//! - [`HttpClient`]: performs the REST calls.
//! - [`ActionContext`]: the host store's `commit`/`dispatch` capability.

pub mod context;
pub mod http;

pub use context::*;
pub use http::*;
