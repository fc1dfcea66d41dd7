//! # Mock Framework
//!
//! Test doubles for the two collaborators a module needs.
//!
//! - [`MockHttpClient`]: answers requests from a queue of expectations.
//! - [`TestStore`]: a minimal host for one module. It holds the state, applies
//!   mutations, runs actions and records every commit.
//!
//! # Example
//! ```ignore
//! let http = MockHttpClient::new();
//! http.expect_post("/books").return_ok(json!({ "id": 7, "title": "X" }));
//!
//! let module = CrudModule::new("books", http.client())?
//!     .with_update_state_after_action(true)
//!     .with_refresh_after_action(false)
//!     .get_module();
//!
//! let store = TestStore::new(module);
//! store.dispatch("createBook", json!({ "title": "X" })).await?;
//!
//! assert_eq!(store.get("books"), json!([{ "id": 7, "title": "X" }]));
//! http.verify(); // Ensures all expectations were met
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use paste::paste;
use serde_json::Value;
use tracing::debug;

use super::error::{CrudError, RequestError};
use super::module::Module;
use super::types::{ActionOutcome, Actions, Mutations, Payload, State};
use crate::clients::{ActionContext, HttpClient, HttpRequest, HttpResponse, Method, SharedContext};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// HTTP
// =============================================================================

type Responder = Arc<dyn Fn(&HttpRequest) -> Result<HttpResponse, RequestError> + Send + Sync>;

/// An expected request and the answer to give it.
struct Expectation {
    method: Method,
    url: String,
    respond: Responder,
}

/// An [`HttpClient`] answering from queued expectations, in order.
///
/// Clones share the queue and the request log, so a test can keep one handle
/// while the module owns another (see [`MockHttpClient::client`]).
///
/// A request that does not match the next expectation fails with
/// [`RequestError::Unexpected`].
#[derive(Clone, Default)]
pub struct MockHttpClient {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

macro_rules! expect_methods {
    ($($method:ident),*) => {
        paste! {
            $(
                /// Expects a request with this method to `url`.
                pub fn [<expect_ $method:lower>](&self, url: impl Into<String>) -> ExpectationBuilder {
                    self.expect(Method::$method, url)
                }
            )*
        }
    };
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared handle for [`CrudModule::new`](super::CrudModule::new).
    pub fn client(&self) -> Arc<dyn HttpClient> {
        Arc::new(self.clone())
    }

    pub fn expect(&self, method: Method, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            url: url.into(),
            expectations: self.expectations.clone(),
        }
    }

    expect_methods!(Get, Post, Put, Patch, Delete);

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = lock(&self.expectations);
        if !exps.is_empty() {
            let pending: Vec<String> = exps.iter().map(|e| format!("{} {}", e.method, e.url)).collect();
            panic!("Not all expectations were met. {} remaining: {pending:?}", exps.len());
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn call(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        lock(&self.requests).push(request.clone());
        let expectation = lock(&self.expectations).pop_front();

        match expectation {
            Some(exp) if exp.method == request.method && exp.url == request.url => {
                debug!(method = %request.method, url = %request.url, "Mock answering");
                (exp.respond)(&request)
            }
            Some(exp) => Err(RequestError::Unexpected(format!(
                "expected {} {}, got {} {}",
                exp.method, exp.url, request.method, request.url
            ))),
            None => Err(RequestError::Unexpected(format!(
                "{} {}",
                request.method, request.url
            ))),
        }
    }
}

/// Builder for one expectation. Nothing is queued until a `return_*` call.
pub struct ExpectationBuilder {
    method: Method,
    url: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    /// Answers `200` with `data`.
    pub fn return_ok(self, data: Value) {
        self.return_status(200, data);
    }

    /// Answers with an arbitrary status; non-2xx becomes an error in the action.
    pub fn return_status(self, status: u16, data: Value) {
        self.return_with(move |_| Ok(HttpResponse::with_status(status, data.clone())));
    }

    /// Fails the call itself, as a dropped connection would.
    pub fn return_err(self, error: RequestError) {
        self.return_with(move |_| Err(error.clone()));
    }

    /// Computes the answer when the request arrives.
    pub fn return_with<F>(self, respond: F)
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, RequestError> + Send + Sync + 'static,
    {
        lock(&self.expectations).push_back(Expectation {
            method: self.method,
            url: self.url,
            respond: Arc::new(respond),
        });
    }
}

// =============================================================================
// STORE
// =============================================================================

struct StoreInner {
    state: Mutex<State>,
    mutations: Mutations,
    actions: Actions,
    commits: Mutex<Vec<(String, Payload)>>,
}

/// A single-module host implementing [`ActionContext`].
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct TestStore {
    inner: Arc<StoreInner>,
}

impl TestStore {
    pub fn new(module: Module) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(module.state),
                mutations: module.mutations,
                actions: module.actions,
                commits: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Runs action `name` with `data`.
    pub async fn dispatch(&self, name: &str, data: Value) -> ActionOutcome {
        ActionContext::dispatch(self, name, data).await
    }

    /// `state[key]`, or `null` when absent.
    pub fn get(&self, key: &str) -> Value {
        lock(&self.inner.state).get(key).cloned().unwrap_or(Value::Null)
    }

    /// Overwrites one state slot without going through a mutation.
    pub fn set(&self, key: &str, value: Value) {
        lock(&self.inner.state).insert(key.to_string(), value);
    }

    /// Names of the mutations committed so far, in order.
    pub fn commits(&self) -> Vec<String> {
        lock(&self.inner.commits).iter().map(|(name, _)| name.clone()).collect()
    }

    /// Committed mutations with their payloads.
    pub fn commit_log(&self) -> Vec<(String, Payload)> {
        lock(&self.inner.commits).clone()
    }
}

#[async_trait]
impl ActionContext for TestStore {
    fn commit(&self, mutation: &str, payload: Payload) -> Result<(), CrudError> {
        let apply = self
            .inner
            .mutations
            .get(mutation)
            .ok_or_else(|| CrudError::UnknownMutation(mutation.to_string()))?;
        apply(&mut lock(&self.inner.state), &payload)?;
        lock(&self.inner.commits).push((mutation.to_string(), payload));
        Ok(())
    }

    async fn dispatch(&self, action: &str, data: Value) -> ActionOutcome {
        let run = self
            .inner
            .actions
            .get(action)
            .cloned()
            .ok_or_else(|| CrudError::UnknownAction(action.to_string()))?;
        let ctx: SharedContext = Arc::new(self.clone());
        run(ctx, data).await
    }

    fn state(&self) -> State {
        lock(&self.inner.state).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_http_client_with_expectations() {
        let mock = MockHttpClient::new();
        mock.expect_get("/books").return_ok(json!([]));
        mock.expect_delete("/books/1").return_status(404, json!({ "error": "gone" }));

        let client = mock.client();
        let response = client.call(HttpRequest::new(Method::Get, "/books")).await.unwrap();
        assert_eq!(response.data, json!([]));

        let response = client
            .call(HttpRequest::new(Method::Delete, "/books/1"))
            .await
            .unwrap();
        assert_eq!(response.status, 404);

        assert_eq!(mock.requests().len(), 2);
        mock.verify();
    }

    #[tokio::test]
    async fn test_mismatched_request_is_unexpected() {
        let mock = MockHttpClient::new();
        mock.expect_post("/books").return_ok(json!({}));

        let err = mock
            .call(HttpRequest::new(Method::Get, "/books"))
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Unexpected(_)));

        let err = mock
            .call(HttpRequest::new(Method::Get, "/books"))
            .await
            .unwrap_err();
        assert_eq!(err, RequestError::Unexpected("GET /books".into()));
    }

    #[test]
    #[should_panic(expected = "Not all expectations were met")]
    fn test_verify_reports_pending() {
        let mock = MockHttpClient::new();
        mock.expect_put("/books/1").return_ok(json!({}));
        mock.verify();
    }

    #[tokio::test]
    async fn test_return_with_sees_the_request() {
        let mock = MockHttpClient::new();
        mock.expect_post("/books")
            .return_with(|req| Ok(HttpResponse::ok(req.data.clone().unwrap_or_default())));

        let response = mock
            .call(HttpRequest::new(Method::Post, "/books").with_data(json!({ "title": "X" })))
            .await
            .unwrap();
        assert_eq!(response.data, json!({ "title": "X" }));
    }
}
