//! Shapes shared by the module descriptor and the host store.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::CrudError;
use crate::clients::SharedContext;

/// Module state: a mapping from state key to JSON value.
pub type State = Map<String, Value>;

/// What an action resolves to. `Ok(None)` means the error handler swallowed a failure.
pub type ActionOutcome = Result<Option<Value>, CrudError>;

pub type Mutation = Arc<dyn Fn(&mut State, &Payload) -> Result<(), CrudError> + Send + Sync>;

pub type Action = Arc<dyn Fn(SharedContext, Value) -> BoxFuture<'static, ActionOutcome> + Send + Sync>;

pub type Getter = Arc<dyn Fn(&State) -> Value + Send + Sync>;

/// Boxes an async closure into an [`Action`].
pub fn action_fn<F, Fut>(f: F) -> Action
where
    F: Fn(SharedContext, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionOutcome> + Send + 'static,
{
    Arc::new(move |ctx: SharedContext, data: Value| f(ctx, data).boxed())
}

pub fn mutation_fn<F>(f: F) -> Mutation
where
    F: Fn(&mut State, &Payload) -> Result<(), CrudError> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub type Mutations = BTreeMap<String, Mutation>;
pub type Actions = BTreeMap<String, Action>;
pub type Getters = BTreeMap<String, Getter>;

/// The payload every mutation receives.
///
/// Generated actions always commit `{data, action_data}`: `data` is the mapped
/// response, `action_data` what the caller passed to the action. Direct commits
/// (custom actions, tests) usually carry `data` only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_data: Option<Value>,
}

impl Payload {
    pub fn new(data: Value, action_data: Value) -> Self {
        Self {
            data,
            action_data: Some(action_data),
        }
    }

    pub fn data(data: Value) -> Self {
        Self {
            data,
            action_data: None,
        }
    }

    /// The identifier a delete keys on: the action data when present, else `data`.
    pub fn key(&self) -> &Value {
        self.action_data.as_ref().unwrap_or(&self.data)
    }
}

impl From<Value> for Payload {
    fn from(data: Value) -> Self {
        Payload::data(data)
    }
}

impl From<bool> for Payload {
    fn from(flag: bool) -> Self {
        Payload::data(Value::Bool(flag))
    }
}

/// JavaScript-style truthiness, used by loading-flag mutations.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_key_prefers_action_data() {
        assert_eq!(Payload::new(Value::Null, json!(2)).key(), &json!(2));
        assert_eq!(Payload::data(json!(3)).key(), &json!(3));
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("yes")));
        assert!(truthy(&json!({})));
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(false)));
    }
}
