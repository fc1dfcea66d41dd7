//! The closed set of CRUD verbs, plus the open "custom" kind used by handlers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

use super::error::ConfigError;

/// One of the five standard operations a module generates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, AsRefStr, EnumIter,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum CrudVerb {
    FetchItems,
    GetItem,
    CreateItem,
    UpdateItem,
    DeleteItem,
}

impl CrudVerb {
    /// Every verb, in generation order.
    pub fn all() -> Vec<CrudVerb> {
        CrudVerb::iter().collect()
    }

    /// Parses a verb name, reporting unknown names as a configuration error.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        CrudVerb::from_str(name).map_err(|_| ConfigError::InvalidVerb(name.to_string()))
    }

    /// Create, update and delete change the backend's collection.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            CrudVerb::CreateItem | CrudVerb::UpdateItem | CrudVerb::DeleteItem
        )
    }
}

impl fmt::Display for CrudVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// What an action unit runs: a standard verb or a caller-supplied action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Crud(CrudVerb),
    Custom(String),
}

impl ActionKind {
    pub fn verb(&self) -> Option<CrudVerb> {
        match self {
            ActionKind::Crud(verb) => Some(*verb),
            ActionKind::Custom(_) => None,
        }
    }
}

impl From<CrudVerb> for ActionKind {
    fn from(verb: CrudVerb) -> Self {
        ActionKind::Crud(verb)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Crud(verb) => verb.fmt(f),
            ActionKind::Custom(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbs_use_camel_case_names() {
        assert_eq!(CrudVerb::FetchItems.to_string(), "fetchItems");
        assert_eq!(CrudVerb::parse("deleteItem"), Ok(CrudVerb::DeleteItem));
        assert_eq!(
            CrudVerb::parse("patchItem"),
            Err(ConfigError::InvalidVerb("patchItem".into()))
        );
    }

    #[test]
    fn test_only_create_update_delete_mutate() {
        let mutating: Vec<_> = CrudVerb::all()
            .into_iter()
            .filter(|v| v.is_mutating())
            .collect();
        assert_eq!(
            mutating,
            vec![CrudVerb::CreateItem, CrudVerb::UpdateItem, CrudVerb::DeleteItem]
        );
    }

    #[test]
    fn test_action_kind_display() {
        assert_eq!(ActionKind::from(CrudVerb::GetItem).to_string(), "getItem");
        assert_eq!(
            ActionKind::Custom("fetchFilteredBooks".into()).to_string(),
            "fetchFilteredBooks"
        );
    }
}
