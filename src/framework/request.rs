//! Turning a CRUD verb into an HTTP request descriptor.
//!
//! | verb       | method | url                          | body        |
//! |------------|--------|------------------------------|-------------|
//! | fetchItems | GET    | `/{resource}`                |             |
//! | getItem    | GET    | `/{resource}/{actionData}`   |             |
//! | createItem | POST   | `/{resource}`                | actionData  |
//! | updateItem | PUT    | `/{resource}/{actionData.id}`| actionData  |
//! | deleteItem | DELETE | `/{resource}/{actionData}`   |             |
//!
//! A custom API definition hook may then rewrite any part of the descriptor.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::error::CrudError;
use super::verb::CrudVerb;
use crate::clients::{HttpRequest, Method};

/// Maps a response body to a value.
pub type Mapper = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// `(descriptor, resource, verb, action_data) -> descriptor`. Its result is used verbatim.
pub type CustomApiDefinition =
    Arc<dyn Fn(RequestDescriptor, &str, CrudVerb, &Value) -> RequestDescriptor + Send + Sync>;

/// Ready-made response mappers.
pub mod mappers {
    use super::Mapper;
    use serde_json::Value;
    use std::sync::Arc;

    pub fn identity() -> Mapper {
        Arc::new(|value| value)
    }

    /// Picks `response[key]`, yielding `null` when the key is absent.
    ///
    /// Suits envelope responses such as `{"books": [...]}`.
    pub fn field(key: impl Into<String>) -> Mapper {
        let key = key.into();
        Arc::new(move |mut value| match value.get_mut(&key) {
            Some(inner) => inner.take(),
            None => Value::Null,
        })
    }
}

/// Everything needed to perform one call and interpret its response.
///
/// `data_mapper` produces the action's return value, `state_mapper` the value
/// committed into module state.
#[derive(Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub params: Option<Map<String, Value>>,
    pub body: Option<Value>,
    pub data_mapper: Mapper,
    pub state_mapper: Mapper,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: None,
            body: None,
            data_mapper: mappers::identity(),
            state_mapper: mappers::identity(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_data_mapper(mut self, mapper: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.data_mapper = Arc::new(mapper);
        self
    }

    pub fn with_state_mapper(mut self, mapper: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.state_mapper = Arc::new(mapper);
        self
    }

    pub fn to_http_request(&self) -> HttpRequest {
        HttpRequest {
            method: self.method,
            url: self.url.clone(),
            params: self.params.clone(),
            data: self.body.clone(),
        }
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Builds descriptors for one module: knows the id attribute and the override hook.
#[derive(Clone)]
pub struct ApiDefinition {
    id_attribute: String,
    custom: Option<CustomApiDefinition>,
}

impl ApiDefinition {
    pub fn new(id_attribute: impl Into<String>, custom: Option<CustomApiDefinition>) -> Self {
        Self {
            id_attribute: id_attribute.into(),
            custom,
        }
    }

    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    /// Builds the descriptor for `verb` on `resource`, then applies the override hook.
    pub fn build(
        &self,
        resource: &str,
        verb: CrudVerb,
        action_data: &Value,
    ) -> Result<RequestDescriptor, CrudError> {
        let descriptor = match verb {
            CrudVerb::FetchItems => RequestDescriptor::new(Method::Get, format!("/{resource}")),
            CrudVerb::GetItem => RequestDescriptor::new(
                Method::Get,
                format!("/{resource}/{}", path_segment(verb, action_data)?),
            ),
            CrudVerb::CreateItem => RequestDescriptor::new(Method::Post, format!("/{resource}"))
                .with_body(action_data.clone()),
            CrudVerb::UpdateItem => {
                let id = action_data.get(&self.id_attribute).ok_or_else(|| {
                    CrudError::InvalidActionData {
                        action: verb.to_string(),
                        reason: format!("missing '{}' attribute", self.id_attribute),
                    }
                })?;
                RequestDescriptor::new(
                    Method::Put,
                    format!("/{resource}/{}", path_segment(verb, id)?),
                )
                .with_body(action_data.clone())
            }
            CrudVerb::DeleteItem => RequestDescriptor::new(
                Method::Delete,
                format!("/{resource}/{}", path_segment(verb, action_data)?),
            ),
        };

        Ok(match &self.custom {
            Some(custom) => custom(descriptor, resource, verb, action_data),
            None => descriptor,
        })
    }
}

impl fmt::Debug for ApiDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiDefinition")
            .field("id_attribute", &self.id_attribute)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

/// Largest float that still holds every integer below it exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

fn path_segment(verb: CrudVerb, value: &Value) -> Result<String, CrudError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(match n.as_f64() {
            // `2.0` names the same item as `2`.
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        }),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(CrudError::InvalidActionData {
            action: verb.to_string(),
            reason: format!("cannot use {other} as a path segment"),
        }),
    }
}
