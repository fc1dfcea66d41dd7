//! Error types for the binding engine.
//!
//! Three families, matching when a fault can be detected:
//! - [`ConfigError`]: raised while a module is being configured or built.
//! - [`RequestError`]: raised by the HTTP collaborator while an action runs.
//! - [`CrudError::StateShape`]: raised by a collection mutation that found
//!   something other than a sequence in the collection slot.

use thiserror::Error;

/// Faults in the configuration surface. Always fatal, always construction-time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("resource name must not be empty")]
    EmptyResourceName,

    #[error("invalid resource name '{0}': expected an ASCII word")]
    InvalidResourceName(String),

    #[error("{0} is not a valid CRUD action")]
    InvalidVerb(String),

    #[error("invalid module options: {0}")]
    InvalidOptions(String),
}

/// Failures reported by the HTTP collaborator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    /// The backend answered outside the 2xx range.
    #[error("request failed with status {status}")]
    Status {
        status: u16,
        body: serde_json::Value,
    },

    /// The request never produced a response (network, DNS, refused...).
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but could not be interpreted.
    #[error("malformed response: {0}")]
    Decode(String),

    /// A mocked collaborator received a call it was not told to expect.
    #[error("unexpected request: {0}")]
    Unexpected(String),
}

/// Umbrella error returned by generated actions and mutations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CrudError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("state.{key} is not an array of objects")]
    StateShape { key: String },

    #[error("invalid action data for {action}: {reason}")]
    InvalidActionData { action: String, reason: String },

    #[error("unknown mutation: {0}")]
    UnknownMutation(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("{0}")]
    Custom(String),
}

impl CrudError {
    /// True for faults that must halt instead of being handed to an error handler.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CrudError::Config(_) | CrudError::StateShape { .. })
    }

    pub fn is_request(&self) -> bool {
        matches!(self, CrudError::Request(_))
    }
}

impl From<String> for CrudError {
    fn from(msg: String) -> Self {
        CrudError::Custom(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_shape_message_names_the_slot() {
        let err = CrudError::StateShape { key: "books".into() };
        assert_eq!(err.to_string(), "state.books is not an array of objects");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_request_errors_are_not_fatal() {
        let err: CrudError = RequestError::Transport("connection refused".into()).into();
        assert!(err.is_request());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_invalid_verb_message() {
        let err = ConfigError::InvalidVerb("patchItem".into());
        assert_eq!(err.to_string(), "patchItem is not a valid CRUD action");
    }
}
