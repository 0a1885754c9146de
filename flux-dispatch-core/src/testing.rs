//! Test utilities for stores and reducers
//!
//! - [`ListenerProbe`]: hands out listeners that record when they were called
//! - [`RecordingMiddleware`]: keeps every action that reached the reducer
//! - Assertion macros for verifying dispatched actions
//!
//! # Example
//!
//! ```
//! use flux_dispatch_core::testing::{ListenerProbe, RecordingMiddleware};
//! use flux_dispatch_core::{assert_dispatched, Action, Store};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum CounterAction { Init, Add(i32) }
//!
//! impl Action for CounterAction {
//!     fn name(&self) -> &str {
//!         match self {
//!             CounterAction::Init => "Init",
//!             CounterAction::Add(_) => "Add",
//!         }
//!     }
//!     fn init() -> Self { CounterAction::Init }
//! }
//!
//! fn counter(state: Option<&i32>, action: &CounterAction) -> i32 {
//!     let state = state.copied().unwrap_or(0);
//!     match action {
//!         CounterAction::Add(n) => state + n,
//!         CounterAction::Init => state,
//!     }
//! }
//!
//! let store = Store::with_middleware(counter, None, RecordingMiddleware::new()).unwrap();
//! let probe = ListenerProbe::new();
//! let _subscription = store.subscribe(probe.listener("view"));
//!
//! store.dispatch(CounterAction::Add(2)).unwrap();
//!
//! assert_eq!(probe.count("view"), 1);
//! let actions = store.middleware(|m| m.actions());
//! assert_dispatched!(actions, CounterAction::Add(2));
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::action::Action;
use crate::store::Middleware;

/// Records listener invocations by label, in call order.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct ListenerProbe {
    calls: Arc<Mutex<Vec<String>>>,
}

impl ListenerProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that records `label` each time it is called
    pub fn listener(&self, label: impl Into<String>) -> impl Fn() + Send + Sync + 'static {
        let calls = Arc::clone(&self.calls);
        let label = label.into();
        move || calls.lock().push(label.clone())
    }

    /// Every recorded call, oldest first
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// How many times the listener labelled `label` ran
    pub fn count(&self, label: &str) -> usize {
        self.calls.lock().iter().filter(|l| *l == label).count()
    }

    pub fn total(&self) -> usize {
        self.calls.lock().len()
    }

    /// Forget recorded calls, e.g. between the arrange and act phases
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// Middleware that keeps a copy of every action and its `state_changed` flag.
///
/// Read it back through [`Store::middleware`](crate::Store::middleware).
#[derive(Debug, Clone)]
pub struct RecordingMiddleware<A> {
    actions: Vec<A>,
    changes: Vec<bool>,
}

impl<A> Default for RecordingMiddleware<A> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            changes: Vec::new(),
        }
    }
}

impl<A: Clone> RecordingMiddleware<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions seen by `before`, oldest first
    pub fn actions(&self) -> Vec<A> {
        self.actions.clone()
    }

    /// `state_changed` per completed dispatch. Shorter than
    /// [`actions`](Self::actions) when a reducer failed.
    pub fn changes(&self) -> &[bool] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<A: Action> Middleware<A> for RecordingMiddleware<A> {
    fn before(&mut self, action: &A) {
        self.actions.push(action.clone());
    }

    fn after(&mut self, _action: &A, state_changed: bool) {
        self.changes.push(state_changed);
    }
}

/// Assert that an action matching the pattern was dispatched.
///
/// # Example
///
/// ```
/// use flux_dispatch_core::assert_dispatched;
///
/// #[derive(Debug)]
/// enum Action { Increment, SetValue(i32) }
///
/// let actions = vec![Action::Increment, Action::SetValue(42)];
/// assert_dispatched!(actions, Action::Increment);
/// assert_dispatched!(actions, Action::SetValue(n) if *n > 40);
/// ```
#[macro_export]
macro_rules! assert_dispatched {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be dispatched, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that no action matching the pattern was dispatched.
#[macro_export]
macro_rules! assert_not_dispatched {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected no action matching `{}` to be dispatched, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Count the dispatched actions matching the pattern.
#[macro_export]
macro_rules! count_dispatched {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}
