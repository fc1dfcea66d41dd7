//! Stamps out the standard action units for one resource.

use std::sync::Arc;

use super::action::{ActionUnit, CommitPolicy, CrudOperation, CustomAction, ErrorHandler, SuccessHandler};
use super::request::ApiDefinition;
use super::resource_name::{LoadingFlag, ModuleNames, ResourceName};
use super::verb::CrudVerb;
use crate::clients::HttpClient;

/// Configuration shared by every unit of a module.
#[derive(Clone)]
pub struct UnitConfig {
    pub resource: ResourceName,
    pub api: ApiDefinition,
    pub http: Arc<dyn HttpClient>,
    pub policy: CommitPolicy,
    pub on_success: SuccessHandler,
    pub on_error: ErrorHandler,
    /// Verbs whose actions the module exposes.
    pub selection: Vec<CrudVerb>,
}

pub struct ActionUnitFactory {
    config: UnitConfig,
    names: ModuleNames,
}

impl ActionUnitFactory {
    pub fn new(config: UnitConfig) -> Self {
        let names = config.resource.names();
        Self { config, names }
    }

    pub fn names(&self) -> &ModuleNames {
        &self.names
    }

    /// The unit for `verb`, named after the resource.
    pub fn create(&self, verb: CrudVerb) -> ActionUnit {
        let verb_names = self.names.verb(verb);
        let refresh_action = self
            .config
            .selection
            .contains(&CrudVerb::FetchItems)
            .then(|| self.names.action(CrudVerb::FetchItems).to_string());

        ActionUnit::crud(
            self.config.resource.clone(),
            verb_names.action.clone(),
            verb_names.loading.clone(),
            CrudOperation {
                verb,
                commit_mutation: verb_names.commit_mutation.clone(),
                api: self.config.api.clone(),
                http: self.config.http.clone(),
                policy: self.config.policy,
                refresh_action,
            },
            self.config.on_success.clone(),
            self.config.on_error.clone(),
        )
    }

    /// All five standard units, in verb order.
    pub fn create_all(&self) -> Vec<ActionUnit> {
        CrudVerb::all().into_iter().map(|verb| self.create(verb)).collect()
    }

    /// A unit wrapping a caller-supplied action with the same loading and error scaffolding.
    pub fn create_custom(&self, name: &str, loading: LoadingFlag, action: CustomAction) -> ActionUnit {
        ActionUnit::custom(
            self.config.resource.clone(),
            name.to_string(),
            loading,
            action,
            self.config.on_error.clone(),
        )
    }
}
