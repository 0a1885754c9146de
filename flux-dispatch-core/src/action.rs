//! Action trait for type-safe state transitions

use std::fmt::Debug;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{json_kind, StoreError};

/// Trait for actions that can be dispatched to the store
///
/// Actions represent intents to change state. They should be:
/// - Clone: Actions may be logged, replayed, or sent to multiple handlers
/// - Debug: For debugging and logging
/// - Send + 'static: For dispatch from any thread
///
/// Use `#[derive(Action)]` from `flux-dispatch-macros` to auto-implement this trait.
pub trait Action: Clone + Debug + Send + 'static {
    /// The discriminant used for logging, filtering and matching
    fn name(&self) -> &str;

    /// Sentinel dispatched once when a store is created or its reducer is
    /// replaced. Reducers must treat it as unrecognized.
    fn init() -> Self;

    /// Check that the action is well formed before any reducer sees it
    fn validate(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Human-readable action summaries for the action log
///
/// The default implementation uses the `Debug` representation.
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

/// Discriminant carried by [`JsonAction::init`]
pub const INIT_ACTION_TYPE: &str = "@@flux/INIT";

/// A dynamically shaped action: a JSON object with a string `"type"` field
/// and any payload fields alongside it.
///
/// ```
/// use flux_dispatch_core::{Action, JsonAction};
/// use serde_json::json;
///
/// let action = JsonAction::new(json!({ "type": "ADD_TODO", "id": 0, "text": "Learn Redux" })).unwrap();
/// assert_eq!(action.name(), "ADD_TODO");
/// assert_eq!(action.get("text"), Some(&json!("Learn Redux")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JsonAction(Value);

impl JsonAction {
    /// Wrap a JSON value, rejecting anything without a string `"type"`.
    pub fn new(value: Value) -> Result<Self, StoreError> {
        let action = Self(value);
        action.validate()?;
        Ok(action)
    }

    /// Build an action of the given type with payload fields.
    pub fn of_type(kind: &str, payload: Map<String, Value>) -> Self {
        let mut fields = payload;
        fields.insert("type".to_string(), Value::String(kind.to_string()));
        Self(Value::Object(fields))
    }

    /// Wrap a JSON value without checking it. Malformed actions built this
    /// way are rejected by `dispatch`.
    pub fn from_raw(value: Value) -> Self {
        Self(value)
    }

    /// Payload field lookup
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Action for JsonAction {
    fn name(&self) -> &str {
        self.0.get("type").and_then(Value::as_str).unwrap_or("")
    }

    fn init() -> Self {
        Self::of_type(INIT_ACTION_TYPE, Map::new())
    }

    fn validate(&self) -> Result<(), StoreError> {
        let fields = self.0.as_object().ok_or_else(|| {
            StoreError::malformed(format!(
                "expected an object, found {}",
                json_kind(&self.0)
            ))
        })?;
        match fields.get("type") {
            Some(Value::String(kind)) if !kind.is_empty() => Ok(()),
            Some(Value::String(_)) => Err(StoreError::malformed("`type` is empty")),
            Some(other) => Err(StoreError::malformed(format!(
                "`type` must be a string, found {}",
                json_kind(other)
            ))),
            None => Err(StoreError::malformed("missing `type` field")),
        }
    }
}

impl ActionSummary for JsonAction {
    fn summary(&self) -> String {
        self.0.to_string()
    }
}

impl TryFrom<Value> for JsonAction {
    type Error = StoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
