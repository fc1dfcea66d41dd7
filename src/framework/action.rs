//! # Action Units
//!
//! An [`ActionUnit`] is the unit of generation: one verb (or one custom action)
//! for one resource. It contributes three things to a module:
//!
//! - a state entry for its loading flag,
//! - a mutation setting that flag,
//! - an async action that raises the flag, does its work, and lowers the flag.
//!
//! ## Execution protocol (CRUD units)
//!
//! 1. commit the loading flag `true`
//! 2. build the [`RequestDescriptor`](super::RequestDescriptor)
//! 3. call the [`HttpClient`]
//! 4. on success: commit the result (per [`CommitPolicy`]), optionally dispatch a
//!    re-fetch and await it, call the success handler, return the mapped data
//! 5. on failure: hand the error to the error handler. A failed re-fetch has
//!    already been through the fetch action's handler and is returned as is.
//! 6. always commit the loading flag `false`
//!
//! Fatal errors (state-shape, configuration) skip step 5 and go straight back to
//! the caller; step 6 still runs.
//!
//! Concurrent invocations of the same unit are not deduplicated. Each one
//! toggles the shared flag, so the last one to settle decides its final value.

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use super::error::CrudError;
use super::request::ApiDefinition;
use super::resource_name::{LoadingFlag, ResourceName};
use super::types::{truthy, Action, ActionOutcome, Actions, Mutation, Mutations, Payload, State};
use super::verb::{ActionKind, CrudVerb};
use crate::clients::{HttpClient, SharedContext};

/// Called with `(kind, state-mapped data, resource)` after a successful CRUD action.
pub type SuccessHandler = Arc<dyn Fn(&ActionKind, &Value, &str) + Send + Sync>;

/// Called with `(kind, error, resource)` after a failed action.
///
/// Returning `Err` re-raises; returning `Ok(())` swallows the error and the
/// action resolves to `None`.
pub type ErrorHandler = Arc<dyn Fn(&ActionKind, CrudError, &str) -> Result<(), CrudError> + Send + Sync>;

/// The body of a custom action.
pub type CustomAction = Action;

pub fn default_success_handler() -> SuccessHandler {
    Arc::new(|_: &ActionKind, _: &Value, _: &str| {})
}

/// Re-raises every error.
pub fn default_error_handler() -> ErrorHandler {
    Arc::new(|_: &ActionKind, err: CrudError, _: &str| Err(err))
}

/// When a successful action writes its result into state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitPolicy {
    pub commit_state: bool,
    pub update_state_after_action: bool,
    pub refresh_after_action: bool,
}

impl CommitPolicy {
    /// fetch/get follow `commit_state`; create/update/delete also need `update_state_after_action`.
    pub fn commits(&self, verb: CrudVerb) -> bool {
        if verb.is_mutating() {
            self.commit_state && self.update_state_after_action
        } else {
            self.commit_state
        }
    }

    pub fn refreshes(&self, verb: CrudVerb) -> bool {
        self.refresh_after_action && verb.is_mutating()
    }
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self {
            commit_state: true,
            update_state_after_action: false,
            refresh_after_action: true,
        }
    }
}

pub(crate) struct CrudOperation {
    pub verb: CrudVerb,
    pub commit_mutation: String,
    pub api: ApiDefinition,
    pub http: Arc<dyn HttpClient>,
    pub policy: CommitPolicy,
    /// The fetch-all action to dispatch after a mutating verb, if the module has one.
    pub refresh_action: Option<String>,
}

pub(crate) enum Operation {
    Crud(CrudOperation),
    Custom(CustomAction),
}

struct UnitInner {
    kind: ActionKind,
    action_name: String,
    loading: LoadingFlag,
    initial_flag: Value,
    resource: ResourceName,
    operation: Operation,
    on_success: SuccessHandler,
    on_error: ErrorHandler,
}

/// One verb wrapped with its loading flag and its success/error hooks.
#[derive(Clone)]
pub struct ActionUnit {
    inner: Arc<UnitInner>,
}

impl ActionUnit {
    pub(crate) fn crud(
        resource: ResourceName,
        action_name: String,
        loading: LoadingFlag,
        operation: CrudOperation,
        on_success: SuccessHandler,
        on_error: ErrorHandler,
    ) -> Self {
        Self {
            inner: Arc::new(UnitInner {
                kind: ActionKind::Crud(operation.verb),
                action_name,
                loading,
                initial_flag: Value::Null,
                resource,
                operation: Operation::Crud(operation),
                on_success,
                on_error,
            }),
        }
    }

    pub(crate) fn custom(
        resource: ResourceName,
        action_name: String,
        loading: LoadingFlag,
        action: CustomAction,
        on_error: ErrorHandler,
    ) -> Self {
        Self {
            inner: Arc::new(UnitInner {
                kind: ActionKind::Custom(action_name.clone()),
                action_name,
                loading,
                initial_flag: Value::Bool(false),
                resource,
                operation: Operation::Custom(action),
                on_success: default_success_handler(),
                on_error,
            }),
        }
    }

    pub fn kind(&self) -> &ActionKind {
        &self.inner.kind
    }

    pub fn verb(&self) -> Option<CrudVerb> {
        self.inner.kind.verb()
    }

    pub fn action_name(&self) -> &str {
        &self.inner.action_name
    }

    pub fn loading_flag(&self) -> &LoadingFlag {
        &self.inner.loading
    }

    /// `{loading.state_key: null}` (`false` for custom units).
    pub fn state(&self) -> State {
        let mut state = State::new();
        state.insert(
            self.inner.loading.state_key.clone(),
            self.inner.initial_flag.clone(),
        );
        state
    }

    /// The loading-flag mutation: stores the truthiness of `payload.data`.
    pub fn mutations(&self) -> Mutations {
        let key = self.inner.loading.state_key.clone();
        let mutation: Mutation = Arc::new(move |state: &mut State, payload: &Payload| {
            state.insert(key.clone(), Value::Bool(truthy(&payload.data)));
            Ok(())
        });

        let mut mutations = Mutations::new();
        mutations.insert(self.inner.loading.mutation.clone(), mutation);
        mutations
    }

    pub fn actions(&self) -> Actions {
        let unit = self.clone();
        let action: Action = Arc::new(move |ctx: SharedContext, data: Value| {
            let unit = unit.clone();
            async move { unit.execute(ctx, data).await }.boxed()
        });

        let mut actions = Actions::new();
        actions.insert(self.inner.action_name.clone(), action);
        actions
    }

    /// Runs the action with guaranteed loading-flag release.
    #[instrument(
        name = "action",
        skip(self, ctx, action_data),
        fields(resource = %self.inner.resource.original, action = %self.inner.action_name)
    )]
    pub async fn execute(&self, ctx: SharedContext, action_data: Value) -> ActionOutcome {
        let unit = &self.inner;
        debug!(%action_data, "Executing");
        ctx.commit(&unit.loading.mutation, Payload::from(true))?;

        let result = match &unit.operation {
            Operation::Crud(operation) => self.perform(operation, &ctx, action_data).await,
            Operation::Custom(action) => action(ctx.clone(), action_data)
                .await
                .map_err(Failure::Raised),
        };

        let outcome = match result {
            Ok(value) => {
                info!("Action ok");
                Ok(value)
            }
            Err(Failure::Refresh(err)) => {
                warn!(error = %err, "Refresh failed");
                Err(err)
            }
            Err(Failure::Raised(err)) if err.is_fatal() => {
                warn!(error = %err, "Action halted");
                Err(err)
            }
            Err(Failure::Raised(err)) => {
                warn!(error = %err, "Action failed");
                (unit.on_error)(&unit.kind, err, &unit.resource.original).map(|()| None)
            }
        };

        let released = ctx.commit(&unit.loading.mutation, Payload::from(false));
        match (outcome, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), released) => {
                if let Err(release_err) = released {
                    warn!(error = %release_err, "Failed to release loading flag");
                }
                Err(err)
            }
        }
    }

    async fn perform(
        &self,
        operation: &CrudOperation,
        ctx: &SharedContext,
        action_data: Value,
    ) -> Result<Option<Value>, Failure> {
        let unit = &self.inner;
        let (state_data, returned) = self
            .request(operation, ctx, action_data)
            .await
            .map_err(Failure::Raised)?;

        if operation.policy.refreshes(operation.verb) {
            match &operation.refresh_action {
                Some(fetch) => {
                    debug!(%fetch, "Refreshing collection");
                    ctx.dispatch(fetch, json!(null))
                        .await
                        .map_err(Failure::Refresh)?;
                }
                None => debug!("No fetch action generated, skipping refresh"),
            }
        }

        (unit.on_success)(&unit.kind, &state_data, &unit.resource.original);
        Ok(Some(returned))
    }

    /// Sends the request and commits its result, returning the state-mapped
    /// and data-mapped response.
    async fn request(
        &self,
        operation: &CrudOperation,
        ctx: &SharedContext,
        action_data: Value,
    ) -> Result<(Value, Value), CrudError> {
        let unit = &self.inner;
        let descriptor = operation
            .api
            .build(&unit.resource.original, operation.verb, &action_data)?;
        debug!(?descriptor, "Sending request");

        let response = operation
            .http
            .call(descriptor.to_http_request())
            .await?
            .error_for_status()?;

        let state_data = (descriptor.state_mapper)(response.data.clone());

        if operation.policy.commits(operation.verb) {
            ctx.commit(
                &operation.commit_mutation,
                Payload::new(state_data.clone(), action_data),
            )?;
        }

        Ok((state_data, (descriptor.data_mapper)(response.data)))
    }
}

/// Why an action did not complete.
enum Failure {
    /// Not yet seen by any error handler.
    Raised(CrudError),
    /// Re-raised by the refresh, whose own handler already saw it.
    Refresh(CrudError),
}

impl fmt::Debug for ActionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionUnit")
            .field("kind", &self.inner.kind)
            .field("action", &self.inner.action_name)
            .field("loading", &self.inner.loading)
            .finish_non_exhaustive()
    }
}
