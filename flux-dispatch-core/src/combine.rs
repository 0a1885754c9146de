//! Reducer composition over string-keyed state
//!
//! [`CombineReducers`] turns a set of slice reducers into one reducer over a
//! JSON object whose keys are the slice names. Each slice reducer only ever
//! sees its own slice, so slices can be written independently of each other.
//!
//! ```
//! use flux_dispatch_core::{combine_reducers, select, typed, Action, JsonAction, Reducer};
//! use serde_json::{json, Value};
//!
//! fn todos(state: Option<&Vec<String>>, action: &JsonAction) -> Vec<String> {
//!     let mut todos = state.cloned().unwrap_or_default();
//!     if action.name() == "ADD_TODO" {
//!         todos.push(action.get("text").and_then(Value::as_str).unwrap_or_default().to_string());
//!     }
//!     todos
//! }
//!
//! fn visibility_filter(state: Option<&String>, action: &JsonAction) -> String {
//!     match (action.name(), action.get("filter").and_then(Value::as_str)) {
//!         ("SET_VISIBILITY_FILTER", Some(filter)) => filter.to_string(),
//!         _ => state.cloned().unwrap_or_else(|| "SHOW_ALL".to_string()),
//!     }
//! }
//!
//! let todo_app = combine_reducers()
//!     .slice("todos", typed(todos))
//!     .slice("visibilityFilter", typed(visibility_filter));
//!
//! let state = todo_app.reduce(None, &JsonAction::init()).unwrap();
//! assert_eq!(state, json!({ "todos": [], "visibilityFilter": "SHOW_ALL" }));
//!
//! let add = JsonAction::new(json!({ "type": "ADD_TODO", "text": "Learn Redux" })).unwrap();
//! let state = todo_app.reduce(Some(&state), &add).unwrap();
//! let todos: Vec<String> = select(&state, "todos").unwrap();
//! assert_eq!(todos, vec!["Learn Redux"]);
//! ```

use std::collections::HashSet;
use std::marker::PhantomData;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::Action;
use crate::error::{json_kind, StoreError};
use crate::reducer::Reducer;

/// A type-erased reducer, as stored by [`CombineReducers`]
pub type BoxReducer<S, A> = Box<dyn Reducer<S, A> + Send + Sync>;

/// Root reducer built from named slice reducers
///
/// Slices run in the order they were added. The produced state always has
/// exactly one key per slice; keys in the incoming state that no slice owns
/// are dropped (and reported once through `tracing`).
///
/// `CombineReducers` is itself a `Reducer<Value, A>`, so combined reducers
/// can be nested as slices of another combinator.
pub struct CombineReducers<A> {
    slices: Vec<(String, BoxReducer<Value, A>)>,
    reported_keys: Mutex<HashSet<String>>,
}

/// Start an empty [`CombineReducers`] builder.
pub fn combine_reducers<A>() -> CombineReducers<A> {
    CombineReducers::new()
}

impl<A> Default for CombineReducers<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for CombineReducers<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombineReducers")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<A> CombineReducers<A> {
    pub fn new() -> Self {
        Self {
            slices: Vec::new(),
            reported_keys: Mutex::new(HashSet::new()),
        }
    }

    /// Add a slice. Adding a key twice replaces the earlier reducer but keeps
    /// its position.
    pub fn slice<R>(mut self, key: impl Into<String>, reducer: R) -> Self
    where
        R: Reducer<Value, A> + Send + Sync + 'static,
    {
        self.insert(key.into(), Box::new(reducer));
        self
    }

    fn insert(&mut self, key: String, reducer: BoxReducer<Value, A>) {
        match self.slices.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => {
                tracing::debug!(key = %key, "replacing slice reducer");
                entry.1 = reducer;
            }
            None => self.slices.push((key, reducer)),
        }
    }

    /// Slice keys in evaluation order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    fn report_unexpected_keys(&self, previous: &Map<String, Value>) {
        let unexpected = previous
            .keys()
            .filter(|key| !self.slices.iter().any(|(k, _)| k == *key));
        for key in unexpected {
            if self.reported_keys.lock().insert(key.clone()) {
                tracing::warn!(key = %key, "state has a key with no slice reducer; it will be dropped");
            }
        }
    }
}

impl<A, K> FromIterator<(K, BoxReducer<Value, A>)> for CombineReducers<A>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, BoxReducer<Value, A>)>>(iter: I) -> Self {
        let mut combined = Self::new();
        for (key, reducer) in iter {
            combined.insert(key.into(), reducer);
        }
        combined
    }
}

impl<A: Action> Reducer<Value, A> for CombineReducers<A> {
    fn reduce(&self, state: Option<&Value>, action: &A) -> Result<Value, StoreError> {
        let empty = Map::new();
        let previous = match state {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(StoreError::InvalidState {
                    expected: "object",
                    found: json_kind(other),
                })
            }
        };
        self.report_unexpected_keys(previous);

        let mut next = Map::new();
        for (key, reducer) in &self.slices {
            let slice = previous.get(key).filter(|value| !value.is_null());
            let reduced = reducer
                .reduce(slice, action)
                .map_err(|err| err.in_slice(key))?;
            if reduced.is_null() {
                return Err(StoreError::UndefinedSlice {
                    key: key.clone(),
                    action: action.name().to_string(),
                });
            }
            next.insert(key.clone(), reduced);
        }

        Ok(Value::Object(next))
    }
}

impl StoreError {
    /// Qualify slice-related errors with the enclosing slice key, so nested
    /// combinators report paths like `app.todos`.
    fn in_slice(self, outer: &str) -> Self {
        let qualify = |key: String| {
            if key.is_empty() {
                outer.to_string()
            } else {
                format!("{outer}.{key}")
            }
        };
        match self {
            StoreError::UndefinedSlice { key, action } => StoreError::UndefinedSlice {
                key: qualify(key),
                action,
            },
            StoreError::SliceCodec { key, source } => StoreError::SliceCodec {
                key: qualify(key),
                source,
            },
            StoreError::MissingSlice { key } => StoreError::MissingSlice { key: qualify(key) },
            other => other,
        }
    }
}

/// Slice reducer over a serde type. See [`typed`].
pub struct Typed<T, A, F> {
    f: F,
    _marker: PhantomData<fn(Option<&T>, &A) -> T>,
}

impl<T, A, F> std::fmt::Debug for Typed<T, A, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typed")
            .field("slice", &std::any::type_name::<T>())
            .finish()
    }
}

/// Adapt a reducer over a serde type into a JSON slice reducer.
///
/// The incoming slice is deserialized into `T`, reduced, and serialized back.
/// Conversion failures are reported as [`StoreError::SliceCodec`].
pub fn typed<T, A, F>(f: F) -> Typed<T, A, F>
where
    T: Serialize + DeserializeOwned,
    F: Fn(Option<&T>, &A) -> T,
{
    Typed {
        f,
        _marker: PhantomData,
    }
}

impl<T, A, F> Reducer<Value, A> for Typed<T, A, F>
where
    T: Serialize + DeserializeOwned,
    F: Fn(Option<&T>, &A) -> T,
{
    fn reduce(&self, state: Option<&Value>, action: &A) -> Result<Value, StoreError> {
        let previous = state
            .map(T::deserialize)
            .transpose()
            .map_err(codec_error)?;
        let next = (self.f)(previous.as_ref(), action);
        serde_json::to_value(&next).map_err(codec_error)
    }
}

fn codec_error(source: serde_json::Error) -> StoreError {
    StoreError::SliceCodec {
        key: String::new(),
        source,
    }
}

/// Read one slice of a combined state as a typed value.
pub fn select<T: DeserializeOwned>(state: &Value, key: &str) -> Result<T, StoreError> {
    let map = state.as_object().ok_or(StoreError::InvalidState {
        expected: "object",
        found: json_kind(state),
    })?;
    let slice = map.get(key).ok_or_else(|| StoreError::MissingSlice {
        key: key.to_string(),
    })?;
    T::deserialize(slice).map_err(|source| StoreError::SliceCodec {
        key: key.to_string(),
        source,
    })
}
