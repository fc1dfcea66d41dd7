//! The serializable part of a module's configuration.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::verb::CrudVerb;

/// Policy flags and identity settings, loadable from a JSON document.
///
/// ```json
/// { "idAttribute": "uuid", "updateStateAfterAction": true, "actionSelection": ["fetchItems", "getItem"] }
/// ```
///
/// Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleOptions {
    pub id_attribute: String,
    pub commit_state: bool,
    pub update_state_after_action: bool,
    pub refresh_after_action: bool,
    /// Verb names to generate actions for; `None` means all five.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_selection: Option<Vec<String>>,
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            id_attribute: "id".to_string(),
            commit_state: true,
            update_state_after_action: false,
            refresh_after_action: true,
            action_selection: None,
        }
    }
}

impl ModuleOptions {
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(document)
            .map_err(|e| ConfigError::InvalidOptions(e.to_string()))?;
        options.selection()?;
        Ok(options)
    }

    /// The selected verbs, in declaration order with duplicates dropped.
    pub fn selection(&self) -> Result<Vec<CrudVerb>, ConfigError> {
        let Some(names) = &self.action_selection else {
            return Ok(CrudVerb::all());
        };

        let mut verbs = Vec::with_capacity(names.len());
        for name in names {
            let verb = CrudVerb::parse(name)?;
            if !verbs.contains(&verb) {
                verbs.push(verb);
            }
        }
        Ok(verbs)
    }
}
