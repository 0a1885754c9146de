//! Core traits and types for flux-dispatch
//!
//! This crate provides the foundational abstractions for centralized state
//! management following a Redux-inspired architecture.
//!
//! # Core Concepts
//!
//! - **Action**: Plain values that describe a state change
//! - **Reducer**: Pure function from previous state and action to next state
//! - **Store**: Single owner of the state tree; dispatches actions and
//!   notifies listeners
//! - **CombineReducers**: Builds a root reducer out of one reducer per state key
//! - **Middleware**: Hooks around every dispatch (logging, recording)
//!
//! # Basic Example
//!
//! ```
//! use flux_dispatch_core::prelude::*;
//! use serde_json::json;
//!
//! fn counter(state: Option<&i64>, action: &JsonAction) -> i64 {
//!     let state = state.copied().unwrap_or(0);
//!     match action.name() {
//!         "INCREMENT" => state + 1,
//!         "DECREMENT" => state - 1,
//!         _ => state,
//!     }
//! }
//!
//! let root = combine_reducers().slice("counter", typed(counter));
//! let store = create_store(root, None).unwrap();
//!
//! store.dispatch(JsonAction::new(json!({ "type": "INCREMENT" })).unwrap()).unwrap();
//! assert_eq!(*store.get_state(), json!({ "counter": 1 }));
//! ```
//!
//! # Listener Pattern
//!
//! Listeners receive no arguments. They read the state they care about from
//! a store handle they captured, and may dispatch follow-up actions; the
//! nested dispatch finishes before the remaining listeners run.
//!
//! ```
//! use flux_dispatch_core::prelude::*;
//! use serde_json::json;
//!
//! # fn counter(state: Option<&i64>, action: &JsonAction) -> i64 {
//! #     let state = state.copied().unwrap_or(0);
//! #     if action.name() == "INCREMENT" { state + 1 } else { state }
//! # }
//! let store = create_store(combine_reducers().slice("counter", typed(counter)), None).unwrap();
//!
//! let weak = store.downgrade();
//! let render = store.subscribe(move || {
//!     if let Some(store) = weak.upgrade() {
//!         println!("counter = {}", store.get_state()["counter"]);
//!     }
//! });
//!
//! store.dispatch(JsonAction::new(json!({ "type": "INCREMENT" })).unwrap()).unwrap();
//! render.unsubscribe();
//! ```

pub mod action;
pub mod combine;
pub mod error;
pub mod ids;
pub mod immutable;
pub mod logger;
pub mod reducer;
pub mod store;
pub mod testing;

// Core trait exports
pub use action::{Action, ActionSummary, JsonAction, INIT_ACTION_TYPE};
pub use error::StoreError;
pub use reducer::{reducer_fn, try_reducer, Reducer, TryReducer};

// Combinator exports
pub use combine::{combine_reducers, select, typed, BoxReducer, CombineReducers, Typed};

// Store exports
pub use store::{
    create_store, ComposedMiddleware, Listener, Middleware, NoopMiddleware, Store, Unsubscribe,
    WeakStore,
};

// Logging exports
pub use logger::{
    glob_match, ActionLog, ActionLogConfig, ActionLogEntry, ActionLoggerConfig,
    ActionLoggerMiddleware,
};

pub use ids::IdGenerator;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionSummary, JsonAction};
    pub use crate::combine::{combine_reducers, select, typed, CombineReducers};
    pub use crate::error::StoreError;
    pub use crate::ids::IdGenerator;
    pub use crate::immutable::{appended, removed, replaced};
    pub use crate::logger::{ActionLoggerConfig, ActionLoggerMiddleware};
    pub use crate::reducer::{reducer_fn, try_reducer, Reducer};
    pub use crate::store::{
        create_store, ComposedMiddleware, Middleware, NoopMiddleware, Store, Unsubscribe,
    };
}
