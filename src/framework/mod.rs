//! The binding-generation engine.
//!
//! This module turns a resource name and a handful of options into a
//! [`Module`]: state, mutations and async actions performing CRUD against an
//! HTTP backend.
//!
//! # Main Components
//!
//! - [`ResourceName`] / [`ModuleNames`] - Every identifier derived from a resource
//! - [`ApiDefinition`] - Builds the [`RequestDescriptor`] for each [`CrudVerb`]
//! - [`ActionUnit`] - One verb with its loading flag and success/error hooks
//! - [`ActionUnitFactory`] - Creates the five standard units for a resource
//! - [`CrudModule`] - Configuration record and module builder
//! - [`CrudModuleFactory`] - Copies one configuration across resources
//!
//! # Testing
//!
//! See [`mock`] module for an HTTP double and a minimal host store.

pub mod action;
pub mod error;
pub mod factory;
pub mod inflection;
pub mod mock;
pub mod module;
pub mod module_factory;
pub mod options;
pub mod request;
pub mod resource_name;
pub mod types;
pub mod verb;

pub use action::{
    default_error_handler, default_success_handler, ActionUnit, CommitPolicy, CustomAction,
    ErrorHandler, SuccessHandler,
};
pub use error::{ConfigError, CrudError, RequestError};
pub use factory::{ActionUnitFactory, UnitConfig};
pub use module::{CrudModule, Module};
pub use module_factory::CrudModuleFactory;
pub use options::ModuleOptions;
pub use request::{mappers, ApiDefinition, CustomApiDefinition, Mapper, RequestDescriptor};
pub use resource_name::{CollectionMutations, LoadingFlag, ModuleNames, ResourceName, VerbNames};
pub use types::{
    action_fn, mutation_fn, truthy, Action, ActionOutcome, Actions, Getter, Getters, Mutation,
    Mutations, Payload, State,
};
pub use verb::{ActionKind, CrudVerb};
