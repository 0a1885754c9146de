//! flux-dispatch: Redux-style state management for Rust
//!
//! One store owns the state tree. State only changes through dispatched
//! actions, which a pure reducer turns into the next state; subscribers are
//! told after every change. Large state trees are split into slices with
//! [`combine_reducers`], each slice owning one key.
//!
//! # Example
//! ```
//! use flux_dispatch::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(rename_all = "SCREAMING_SNAKE_CASE")]
//! enum CounterAction {
//!     #[action(init)]
//!     Init,
//!     Increment,
//!     Decrement,
//! }
//!
//! fn counter(state: Option<&i64>, action: &CounterAction) -> i64 {
//!     let state = state.copied().unwrap_or(0);
//!     match action {
//!         CounterAction::Increment => state + 1,
//!         CounterAction::Decrement => state - 1,
//!         CounterAction::Init => state,
//!     }
//! }
//!
//! let store = create_store(counter, None).unwrap();
//! store.dispatch(CounterAction::Increment).unwrap();
//! assert_eq!(*store.get_state(), 1);
//! assert_eq!(CounterAction::Increment.name(), "INCREMENT");
//! ```

// Re-export everything from core
pub use flux_dispatch_core::*;

// Re-export derive macros
pub use flux_dispatch_macros::Action;

/// Prelude for convenient imports
pub mod prelude {
    // Traits
    pub use flux_dispatch_core::{Action, ActionSummary, Middleware, Reducer};

    // Actions
    pub use flux_dispatch_core::{JsonAction, INIT_ACTION_TYPE};

    // Store
    pub use flux_dispatch_core::{
        create_store, ComposedMiddleware, NoopMiddleware, Store, StoreError, Unsubscribe,
        WeakStore,
    };

    // Reducers
    pub use flux_dispatch_core::immutable::{appended, removed, replaced};
    pub use flux_dispatch_core::{
        combine_reducers, reducer_fn, select, try_reducer, typed, CombineReducers, IdGenerator,
    };

    // Logging
    pub use flux_dispatch_core::{ActionLoggerConfig, ActionLoggerMiddleware};

    // Derive macros
    pub use flux_dispatch_macros::Action;
}
