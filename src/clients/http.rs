//! The HTTP collaborator the engine calls into.
//!
//! The engine never opens a socket. Whatever performs the request (a `reqwest`
//! wrapper, an in-process router, [`MockHttpClient`](crate::framework::mock::MockHttpClient))
//! implements [`HttpClient`] and is handed to the module builder.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, EnumString};

use crate::framework::RequestError;

/// The methods the five CRUD verbs map onto.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// `{method, url, params, data}` as handed to the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: None,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }
}

/// A response exposing its decoded `data` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub data: Value,
}

impl HttpResponse {
    pub fn ok(data: Value) -> Self {
        Self { status: 200, data }
    }

    pub fn with_status(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into [`RequestError::Status`].
    pub fn error_for_status(self) -> Result<Self, RequestError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(RequestError::Status {
                status: self.status,
                body: self.data,
            })
        }
    }
}

/// Performs one HTTP exchange.
///
/// Cancellation and timeouts are the implementor's concern; the engine awaits
/// whatever future this returns.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn call(&self, request: HttpRequest) -> Result<HttpResponse, RequestError>;
}
