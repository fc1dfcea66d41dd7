#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use crud_bindings::framework::mock::MockHttpClient;
use crud_bindings::framework::{ActionKind, CrudError, CrudModule};
use crud_bindings::lifecycle::setup_tracing;
use serde_json::Value;

/// A `books` module talking to `http`, with default options.
pub fn books(http: &MockHttpClient) -> CrudModule {
    setup_tracing();
    CrudModule::new("books", http.client()).expect("valid resource")
}

/// One handler invocation: `(kind, error or data, resource)`.
pub type Call = (String, String, String);

/// Collects handler invocations for later assertions.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// An error handler that records and swallows.
    pub fn swallowing(&self) -> impl Fn(&ActionKind, CrudError, &str) -> Result<(), CrudError> + Send + Sync + 'static {
        let calls = self.calls.clone();
        move |kind: &ActionKind, err: CrudError, resource: &str| {
            calls
                .lock()
                .unwrap()
                .push((kind.to_string(), err.to_string(), resource.to_string()));
            Ok(())
        }
    }

    /// An error handler that records and re-raises.
    pub fn rethrowing(&self) -> impl Fn(&ActionKind, CrudError, &str) -> Result<(), CrudError> + Send + Sync + 'static {
        let calls = self.calls.clone();
        move |kind: &ActionKind, err: CrudError, resource: &str| {
            calls
                .lock()
                .unwrap()
                .push((kind.to_string(), err.to_string(), resource.to_string()));
            Err(err)
        }
    }

    /// A success handler recording the state-mapped data.
    pub fn success(&self) -> impl Fn(&ActionKind, &Value, &str) + Send + Sync + 'static {
        let calls = self.calls.clone();
        move |kind: &ActionKind, data: &Value, resource: &str| {
            calls
                .lock()
                .unwrap()
                .push((kind.to_string(), data.to_string(), resource.to_string()));
        }
    }
}
