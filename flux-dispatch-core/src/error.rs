//! Errors surfaced at the `dispatch` and `create_store` call sites

use thiserror::Error;

/// Everything that can go wrong while creating a store or dispatching to it.
///
/// All variants describe programmer errors. When one is returned the store's
/// state is exactly what it was before the call and no listener has run.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The action failed [`Action::validate`](crate::Action::validate)
    #[error("malformed action: {reason}")]
    MalformedAction { reason: String },

    /// A slice reducer produced `null`, which downstream readers cannot use
    #[error("reducer for slice `{key}` returned null while handling `{action}`")]
    UndefinedSlice { key: String, action: String },

    /// The root reducer produced `null` as the whole state
    #[error("root reducer returned null while handling `{action}`")]
    UndefinedState { action: String },

    /// Composite state had the wrong JSON type
    #[error("expected {expected} state, found {found}")]
    InvalidState {
        expected: &'static str,
        found: &'static str,
    },

    /// A slice was read that the state does not contain
    #[error("state has no slice `{key}`")]
    MissingSlice { key: String },

    /// A typed slice could not be converted to or from JSON
    #[error("slice `{key}` failed to convert")]
    SliceCodec {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// `dispatch` was called from inside a reducer, a middleware hook or
    /// [`Store::middleware`](crate::Store::middleware)
    #[error("cannot dispatch `{action}` while a reducer is running")]
    DispatchWhileReducing { action: String },

    /// A fallible reducer rejected the action
    #[error("reducer failed on `{action}`: {message}")]
    Reducer { action: String, message: String },
}

impl StoreError {
    /// Build a [`StoreError::Reducer`] for the named action.
    pub fn reducer(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Reducer {
            action: action.into(),
            message: message.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedAction {
            reason: reason.into(),
        }
    }
}

/// Short name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
