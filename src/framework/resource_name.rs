//! Resource names and every identifier derived from them.
//!
//! A module for resource `"book"` (or `"books"`) exposes state `books`,
//! `currentBook`, mutations `SET_BOOKS`, `ADD_BOOK`, actions `fetchBooks`,
//! `createBook`, and so on. All of those strings come from [`ModuleNames`].

use serde::Serialize;

use super::error::ConfigError;
use super::inflection::{capitalize, plural, singular};
use super::verb::CrudVerb;

/// The three forms of a resource name.
///
/// `original` is used verbatim in URLs and handler callbacks; `singular` and
/// `plural` are capitalized fragments for building identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceName {
    pub original: String,
    pub singular: String,
    pub plural: String,
}

impl ResourceName {
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        validate(name)?;
        Ok(Self {
            original: name.to_string(),
            singular: capitalize(&singular(name)),
            plural: capitalize(&plural(name)),
        })
    }

    /// Key of the cached collection, e.g. `books`.
    pub fn items_key(&self) -> String {
        self.plural.to_lowercase()
    }

    /// Key of the current item, e.g. `currentBook`.
    pub fn current_item_key(&self) -> String {
        format!("current{}", self.singular)
    }

    pub fn names(&self) -> ModuleNames {
        ModuleNames::new(self)
    }
}

fn validate(name: &str) -> Result<(), ConfigError> {
    let Some(first) = name.chars().next() else {
        return Err(ConfigError::EmptyResourceName);
    };
    let word_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !first.is_ascii_alphabetic() || !word_chars {
        return Err(ConfigError::InvalidResourceName(name.to_string()));
    }
    Ok(())
}

/// A loading flag: the state key holding the boolean and the mutation that sets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LoadingFlag {
    pub mutation: String,
    pub state_key: String,
}

impl LoadingFlag {
    pub fn new(state_key: impl Into<String>, mutation: impl Into<String>) -> Self {
        Self {
            mutation: mutation.into(),
            state_key: state_key.into(),
        }
    }
}

/// Names of the four collection mutations plus `setCurrentItem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionMutations {
    pub set_items: String,
    pub set_current_item: String,
    pub add_item: String,
    pub update_item: String,
    pub delete_item: String,
}

/// Every identifier generated for one verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerbNames {
    pub verb: CrudVerb,
    pub action: String,
    pub loading: LoadingFlag,
    /// The collection mutation committed with the verb's result.
    pub commit_mutation: String,
}

/// The complete identifier table for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleNames {
    pub items_state: String,
    pub current_item_state: String,
    pub mutations: CollectionMutations,
    pub verbs: Vec<VerbNames>,
}

impl ModuleNames {
    pub fn new(resource: &ResourceName) -> Self {
        let plural = &resource.plural;
        let singular = &resource.singular;
        let plural_upper = plural.to_uppercase();
        let singular_upper = singular.to_uppercase();

        let mutations = CollectionMutations {
            set_items: format!("SET_{plural_upper}"),
            set_current_item: format!("SET_CURRENT_{singular_upper}"),
            add_item: format!("ADD_{singular_upper}"),
            update_item: format!("UPDATE_{singular_upper}"),
            delete_item: format!("DELETE_{singular_upper}"),
        };

        let verbs = CrudVerb::all()
            .into_iter()
            .map(|verb| {
                let (action, loading, commit_mutation) = match verb {
                    CrudVerb::FetchItems => (
                        format!("fetch{plural}"),
                        LoadingFlag::new(
                            format!("fetching{plural}"),
                            format!("SET_FETCHING_{plural_upper}"),
                        ),
                        &mutations.set_items,
                    ),
                    CrudVerb::GetItem => (
                        format!("get{singular}"),
                        LoadingFlag::new(
                            format!("getting{singular}"),
                            format!("SET_GETTING_{singular_upper}"),
                        ),
                        &mutations.set_current_item,
                    ),
                    CrudVerb::CreateItem => (
                        format!("create{singular}"),
                        LoadingFlag::new(
                            format!("creating{singular}"),
                            format!("SET_CREATING_{singular_upper}"),
                        ),
                        &mutations.add_item,
                    ),
                    CrudVerb::UpdateItem => (
                        format!("update{singular}"),
                        LoadingFlag::new(
                            format!("updating{singular}"),
                            format!("SET_UPDATING_{singular_upper}"),
                        ),
                        &mutations.update_item,
                    ),
                    CrudVerb::DeleteItem => (
                        format!("delete{singular}"),
                        LoadingFlag::new(
                            format!("deleting{singular}"),
                            format!("SET_DELETING_{singular_upper}"),
                        ),
                        &mutations.delete_item,
                    ),
                };
                VerbNames {
                    verb,
                    action,
                    loading,
                    commit_mutation: commit_mutation.clone(),
                }
            })
            .collect();

        Self {
            items_state: resource.items_key(),
            current_item_state: resource.current_item_key(),
            mutations,
            verbs,
        }
    }

    pub fn verb(&self, verb: CrudVerb) -> &VerbNames {
        // `verbs` is built from `CrudVerb::all()`, so every verb is present.
        self.verbs
            .iter()
            .find(|names| names.verb == verb)
            .unwrap_or_else(|| unreachable!("missing names for {verb}"))
    }

    pub fn action(&self, verb: CrudVerb) -> &str {
        &self.verb(verb).action
    }
}
