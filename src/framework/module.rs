//! # Module Builder
//!
//! [`CrudModule`] is the configuration record for one resource. It is a plain
//! value: every setter consumes `self` and returns the updated copy, and
//! [`CrudModule::get_module`] reads it without changing it.
//!
//! ```ignore
//! let module = CrudModule::new("books", http)?
//!     .with_update_state_after_action(true)
//!     .on_action_error(|kind, err, resource| {
//!         warn!(%kind, %resource, error = %err, "Request failed");
//!         Ok(())
//!     })
//!     .get_module();
//! ```
//!
//! ## Merge order
//!
//! State, mutations and actions are assembled in layers, later layers
//! shadowing earlier ones on key collisions:
//!
//! 1. the action units (loading flags, flag mutations, verb actions)
//! 2. the collection slots and collection mutations
//! 3. custom actions registered with [`CrudModule::create_custom_action`]
//! 4. additional state, actions and mutations
//!
//! Actions of verbs outside the action selection are left out of layer 1.
//! Their loading flags and mutations stay.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::action::{
    default_error_handler, default_success_handler, ActionUnit, CommitPolicy, CustomAction,
    ErrorHandler, SuccessHandler,
};
use super::error::{ConfigError, CrudError};
use super::factory::{ActionUnitFactory, UnitConfig};
use super::module_factory::CrudModuleFactory;
use super::options::ModuleOptions;
use super::request::{ApiDefinition, CustomApiDefinition, RequestDescriptor};
use super::resource_name::{LoadingFlag, ModuleNames, ResourceName};
use super::types::{action_fn, mutation_fn, ActionOutcome, Actions, Getters, Mutations, Payload, State};
use super::verb::{ActionKind, CrudVerb};
use crate::clients::{HttpClient, SharedContext};

#[derive(Clone)]
struct CustomActionEntry {
    name: String,
    loading: LoadingFlag,
    action: CustomAction,
}

/// Configuration for one resource's module.
#[derive(Clone)]
pub struct CrudModule {
    resource: ResourceName,
    options: ModuleOptions,
    selection: Vec<CrudVerb>,
    http: Arc<dyn HttpClient>,
    custom_api_definition: Option<CustomApiDefinition>,
    on_success: SuccessHandler,
    on_error: ErrorHandler,
    additional_state: State,
    additional_actions: Actions,
    additional_mutations: Mutations,
    custom_actions: Vec<CustomActionEntry>,
}

impl CrudModule {
    /// A module for `resource` with default options.
    ///
    /// Fails if the resource name is empty or not an ASCII word.
    pub fn new(resource: &str, http: Arc<dyn HttpClient>) -> Result<Self, ConfigError> {
        Ok(Self {
            resource: ResourceName::new(resource)?,
            options: ModuleOptions::default(),
            selection: CrudVerb::all(),
            http,
            custom_api_definition: None,
            on_success: default_success_handler(),
            on_error: default_error_handler(),
            additional_state: State::new(),
            additional_actions: Actions::new(),
            additional_mutations: Mutations::new(),
            custom_actions: Vec::new(),
        })
    }

    pub fn resource(&self) -> &ResourceName {
        &self.resource
    }

    pub fn options(&self) -> &ModuleOptions {
        &self.options
    }

    pub fn names(&self) -> ModuleNames {
        self.resource.names()
    }

    pub fn selection(&self) -> &[CrudVerb] {
        &self.selection
    }

    pub fn with_http(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = http;
        self
    }

    pub fn with_id_attribute(mut self, id_attribute: impl Into<String>) -> Self {
        self.options.id_attribute = id_attribute.into();
        self
    }

    pub fn with_commit_state(mut self, commit_state: bool) -> Self {
        self.options.commit_state = commit_state;
        self
    }

    pub fn with_update_state_after_action(mut self, update: bool) -> Self {
        self.options.update_state_after_action = update;
        self
    }

    pub fn with_refresh_after_action(mut self, refresh: bool) -> Self {
        self.options.refresh_after_action = refresh;
        self
    }

    /// Restricts the generated actions to `verbs`.
    pub fn with_action_selection(mut self, verbs: impl IntoIterator<Item = CrudVerb>) -> Self {
        let mut selection = Vec::new();
        for verb in verbs {
            if !selection.contains(&verb) {
                selection.push(verb);
            }
        }
        self.options.action_selection = Some(selection.iter().map(ToString::to_string).collect());
        self.selection = selection;
        self
    }

    /// Replaces every option at once, validating the action selection.
    pub fn with_options(mut self, options: ModuleOptions) -> Result<Self, ConfigError> {
        self.selection = options.selection()?;
        self.options = options;
        Ok(self)
    }

    pub fn with_custom_api_definition<F>(mut self, hook: F) -> Self
    where
        F: Fn(RequestDescriptor, &str, CrudVerb, &Value) -> RequestDescriptor + Send + Sync + 'static,
    {
        self.custom_api_definition = Some(Arc::new(hook));
        self
    }

    pub fn on_action_success<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ActionKind, &Value, &str) + Send + Sync + 'static,
    {
        self.on_success = Arc::new(handler);
        self
    }

    /// Return `Ok(())` from `handler` to swallow the error.
    pub fn on_action_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ActionKind, CrudError, &str) -> Result<(), CrudError> + Send + Sync + 'static,
    {
        self.on_error = Arc::new(handler);
        self
    }

    pub fn with_additional_state(mut self, state: State) -> Self {
        self.additional_state = state;
        self
    }

    pub fn with_additional_actions(mut self, actions: Actions) -> Self {
        self.additional_actions = actions;
        self
    }

    pub fn with_additional_mutations(mut self, mutations: Mutations) -> Self {
        self.additional_mutations = mutations;
        self
    }

    /// Registers `action` under `name`, wrapped with its own loading flag and
    /// the module's error handler.
    ///
    /// The flag lives in `loading_state` (initially `false`) and is set by
    /// `loading_mutation`. Whatever the action resolves to is passed through.
    pub fn create_custom_action<F, Fut>(
        mut self,
        name: impl Into<String>,
        action: F,
        loading_state: impl Into<String>,
        loading_mutation: impl Into<String>,
    ) -> Self
    where
        F: Fn(SharedContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionOutcome> + Send + 'static,
    {
        let name = name.into();
        self.custom_actions.retain(|entry| entry.name != name);
        self.custom_actions.push(CustomActionEntry {
            name,
            loading: LoadingFlag::new(loading_state, loading_mutation),
            action: action_fn(action),
        });
        self
    }

    /// A factory stamping out copies of this configuration for other resources.
    pub fn get_factory(&self) -> CrudModuleFactory {
        CrudModuleFactory::new(self.clone())
    }

    /// Builds the module descriptor. Calling it again yields an equivalent module.
    pub fn get_module(&self) -> Module {
        let factory = self.unit_factory();
        let names = factory.names().clone();

        let units = factory.create_all();
        let custom_units: Vec<ActionUnit> = self
            .custom_actions
            .iter()
            .map(|entry| factory.create_custom(&entry.name, entry.loading.clone(), entry.action.clone()))
            .collect();

        let mut state = State::new();
        let mut mutations = Mutations::new();
        let mut actions = Actions::new();

        for unit in &units {
            state.extend(unit.state());
            mutations.extend(unit.mutations());
            if unit.verb().is_some_and(|verb| self.selection.contains(&verb)) {
                actions.extend(unit.actions());
            }
        }

        state.insert(names.items_state.clone(), Value::Null);
        state.insert(names.current_item_state.clone(), Value::Null);
        mutations.extend(collection_mutations(&names, &self.options.id_attribute));

        for unit in &custom_units {
            state.extend(unit.state());
            mutations.extend(unit.mutations());
            actions.extend(unit.actions());
        }

        state.extend(self.additional_state.clone());
        mutations.extend(self.additional_mutations.clone());
        actions.extend(self.additional_actions.clone());

        debug!(
            resource = %self.resource.original,
            state = state.len(),
            mutations = mutations.len(),
            actions = actions.len(),
            "Built module"
        );

        Module {
            namespaced: true,
            state,
            actions,
            mutations,
            getters: Getters::new(),
        }
    }

    fn unit_factory(&self) -> ActionUnitFactory {
        ActionUnitFactory::new(UnitConfig {
            resource: self.resource.clone(),
            api: ApiDefinition::new(
                self.options.id_attribute.clone(),
                self.custom_api_definition.clone(),
            ),
            http: self.http.clone(),
            policy: CommitPolicy {
                commit_state: self.options.commit_state,
                update_state_after_action: self.options.update_state_after_action,
                refresh_after_action: self.options.refresh_after_action,
            },
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            selection: self.selection.clone(),
        })
    }

    pub(crate) fn renamed(mut self, resource: ResourceName) -> Self {
        self.resource = resource;
        self
    }
}

impl fmt::Debug for CrudModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudModule")
            .field("resource", &self.resource)
            .field("options", &self.options)
            .field("custom_api_definition", &self.custom_api_definition.is_some())
            .field(
                "custom_actions",
                &self.custom_actions.iter().map(|s| &s.name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

fn collection_mutations(names: &ModuleNames, id_attribute: &str) -> Mutations {
    let items_key = names.items_state.clone();
    let current_key = names.current_item_state.clone();
    let mut mutations = Mutations::new();

    let key = items_key.clone();
    mutations.insert(
        names.mutations.set_items.clone(),
        mutation_fn(move |state, payload| {
            state.insert(key.clone(), payload.data.clone());
            Ok(())
        }),
    );

    mutations.insert(
        names.mutations.set_current_item.clone(),
        mutation_fn(move |state, payload| {
            state.insert(current_key.clone(), payload.data.clone());
            Ok(())
        }),
    );

    let key = items_key.clone();
    mutations.insert(
        names.mutations.add_item.clone(),
        mutation_fn(move |state, payload| {
            let slot = state.entry(key.clone()).or_insert(Value::Null);
            if slot.is_null() {
                *slot = Value::Array(Vec::new());
            }
            slot.as_array_mut()
                .ok_or_else(|| CrudError::StateShape { key: key.clone() })?
                .push(payload.data.clone());
            Ok(())
        }),
    );

    let key = items_key.clone();
    let id = id_attribute.to_string();
    mutations.insert(
        names.mutations.update_item.clone(),
        mutation_fn(move |state, payload| {
            let items = items_mut(state, &key)?;
            let Some(incoming) = payload.data.get(&id) else {
                debug!(%key, "Update payload has no id, nothing replaced");
                return Ok(());
            };
            match items
                .iter_mut()
                .find(|item| item.get(&id).is_some_and(|own| same_id(own, incoming)))
            {
                Some(existing) => *existing = payload.data.clone(),
                None => debug!(%key, %incoming, "No item to update"),
            }
            Ok(())
        }),
    );

    let key = items_key;
    let id = id_attribute.to_string();
    mutations.insert(
        names.mutations.delete_item.clone(),
        mutation_fn(move |state, payload| {
            let target = payload.key();
            items_mut(state, &key)?
                .retain(|item| !item.get(&id).is_some_and(|own| same_id(own, target)));
            Ok(())
        }),
    );

    mutations
}

/// Ids are equal when their values are, with `2` and `2.0` the same number.
fn same_id(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_f64() || y.is_f64() => {
            x.as_f64() == y.as_f64()
        }
        _ => a == b,
    }
}

fn items_mut<'a>(state: &'a mut State, key: &str) -> Result<&'a mut Vec<Value>, CrudError> {
    state
        .get_mut(key)
        .and_then(Value::as_array_mut)
        .ok_or_else(|| CrudError::StateShape { key: key.to_string() })
}

/// The generated bundle handed to a host store runtime.
#[derive(Clone)]
pub struct Module {
    pub namespaced: bool,
    pub state: State,
    pub actions: Actions,
    pub mutations: Mutations,
    /// Always empty.
    pub getters: Getters,
}

impl Module {
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }

    pub fn mutation_names(&self) -> Vec<&str> {
        self.mutations.keys().map(String::as_str).collect()
    }

    /// Applies mutation `name` to `state`.
    pub fn commit(&self, state: &mut State, name: &str, payload: &Payload) -> Result<(), CrudError> {
        let mutation = self
            .mutations
            .get(name)
            .ok_or_else(|| CrudError::UnknownMutation(name.to_string()))?;
        mutation(state, payload)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("namespaced", &self.namespaced)
            .field("state", &self.state)
            .field("actions", &self.action_names())
            .field("mutations", &self.mutation_names())
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .finish()
    }
}
