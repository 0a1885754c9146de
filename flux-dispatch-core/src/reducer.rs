//! Reducer trait and adapters
//!
//! A reducer computes the next state from the previous one and an action.
//! It never touches the previous state: it builds and returns a new value,
//! or a copy of the old one when the action is not meant for it.
//!
//! ```
//! use flux_dispatch_core::{Action, Reducer};
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction { Init, Increment, Decrement }
//!
//! impl Action for CounterAction {
//!     fn name(&self) -> &str {
//!         match self {
//!             CounterAction::Init => "Init",
//!             CounterAction::Increment => "Increment",
//!             CounterAction::Decrement => "Decrement",
//!         }
//!     }
//!     fn init() -> Self { CounterAction::Init }
//! }
//!
//! fn counter(state: Option<&i64>, action: &CounterAction) -> i64 {
//!     let state = state.copied().unwrap_or(0);
//!     match action {
//!         CounterAction::Increment => state + 1,
//!         CounterAction::Decrement => state - 1,
//!         _ => state,
//!     }
//! }
//!
//! assert_eq!(counter.reduce(None, &CounterAction::init()).unwrap(), 0);
//! assert_eq!(counter.reduce(Some(&1), &CounterAction::Increment).unwrap(), 2);
//! ```

use std::marker::PhantomData;

use crate::error::StoreError;

/// Computes next state from previous state and an action
///
/// `state` is `None` the first time a reducer runs; the reducer supplies its
/// own default then. Reducers must be total: actions they do not recognize
/// return the incoming state unchanged.
///
/// Every `Fn(Option<&S>, &A) -> S` is a reducer that never fails. Wrap
/// fallible functions with [`try_reducer`].
pub trait Reducer<S, A> {
    fn reduce(&self, state: Option<&S>, action: &A) -> Result<S, StoreError>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(Option<&S>, &A) -> S,
{
    #[inline]
    fn reduce(&self, state: Option<&S>, action: &A) -> Result<S, StoreError> {
        Ok(self(state, action))
    }
}

/// Pin a closure's argument types so it can be used as a reducer.
///
/// Closures passed straight to a generic `R: Reducer<S, A>` parameter need
/// annotated arguments; routing them through here lets inference do it.
#[inline]
pub fn reducer_fn<S, A, F>(f: F) -> F
where
    F: Fn(Option<&S>, &A) -> S,
{
    f
}

/// A reducer that may reject an action. See [`try_reducer`].
pub struct TryReducer<S, A, F> {
    f: F,
    _marker: PhantomData<fn(Option<&S>, &A) -> S>,
}

impl<S, A, F> std::fmt::Debug for TryReducer<S, A, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryReducer").finish_non_exhaustive()
    }
}

/// Use a function returning `Result` as a reducer.
///
/// An `Err` aborts the dispatch: the store keeps its previous state and
/// listeners are not notified.
pub fn try_reducer<S, A, F>(f: F) -> TryReducer<S, A, F>
where
    F: Fn(Option<&S>, &A) -> Result<S, StoreError>,
{
    TryReducer {
        f,
        _marker: PhantomData,
    }
}

impl<S, A, F> Reducer<S, A> for TryReducer<S, A, F>
where
    F: Fn(Option<&S>, &A) -> Result<S, StoreError>,
{
    #[inline]
    fn reduce(&self, state: Option<&S>, action: &A) -> Result<S, StoreError> {
        (self.f)(state, action)
    }
}
