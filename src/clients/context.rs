//! The host store's side of a running action.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::framework::{ActionOutcome, CrudError, Payload, State};

/// What the host store runtime hands to every running action.
///
/// `commit` applies a mutation synchronously; `dispatch` runs another action of
/// the same module and resolves with its result.
#[async_trait]
pub trait ActionContext: Send + Sync {
    fn commit(&self, mutation: &str, payload: Payload) -> Result<(), CrudError>;

    async fn dispatch(&self, action: &str, data: Value) -> ActionOutcome;

    /// A snapshot of the module state.
    fn state(&self) -> State;
}

pub type SharedContext = Arc<dyn ActionContext>;
