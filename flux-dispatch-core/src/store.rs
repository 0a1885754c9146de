//! Centralized state store with reducer pattern

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use scopeguard::defer;

use crate::action::Action;
use crate::error::StoreError;
use crate::reducer::Reducer;

/// A registered change listener
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Centralized state store with Redux-like reducer pattern
///
/// The store holds the application state and provides a single point
/// for state transitions through the `dispatch` method. State is handed out
/// as `Arc<S>` snapshots; a dispatch never modifies a snapshot, it installs a
/// new one.
///
/// `Store` is a handle: clones share the same state, reducer and listeners,
/// so listeners can capture a clone (or a [`WeakStore`]) and dispatch.
///
/// # Type Parameters
/// * `S` - The application state type
/// * `A` - The action type (must implement `Action`)
/// * `R` - The root reducer
/// * `M` - Middleware wrapped around every dispatch
///
/// # Example
/// ```
/// use flux_dispatch_core::{Action, Store};
///
/// #[derive(Clone, Debug)]
/// enum CounterAction { Init, Increment, Decrement }
///
/// impl Action for CounterAction {
///     fn name(&self) -> &str {
///         match self {
///             CounterAction::Init => "Init",
///             CounterAction::Increment => "Increment",
///             CounterAction::Decrement => "Decrement",
///         }
///     }
///     fn init() -> Self { CounterAction::Init }
/// }
///
/// fn counter(state: Option<&i32>, action: &CounterAction) -> i32 {
///     let state = state.copied().unwrap_or(0);
///     match action {
///         CounterAction::Increment => state + 1,
///         CounterAction::Decrement => state - 1,
///         CounterAction::Init => state,
///     }
/// }
///
/// let store = Store::new(counter).unwrap();
/// let unsubscribe = store.subscribe(|| println!("changed"));
///
/// store.dispatch(CounterAction::Increment).unwrap();
/// assert_eq!(*store.get_state(), 1);
///
/// unsubscribe.unsubscribe();
/// ```
pub struct Store<S, A, R, M = NoopMiddleware> {
    shared: Arc<Shared<S, A, R, M>>,
}

struct Shared<S, A, R, M> {
    /// Serializes dispatch across threads; re-entrant so listeners may
    /// dispatch on the same thread.
    core: ReentrantMutex<Core<S, R, M>>,
    listeners: Arc<Mutex<ListenerRegistry>>,
    _marker: PhantomData<fn(A)>,
}

struct Core<S, R, M> {
    state: RefCell<Arc<S>>,
    reducer: RefCell<R>,
    middleware: RefCell<M>,
    /// Set while middleware or the reducer runs
    reducing: Cell<bool>,
    change_detector: Cell<fn(&S, &S) -> bool>,
}

/// A JSON `null` root state counts as undefined
fn ensure_defined<S: Any, A: Action>(state: &S, action: &A) -> Result<(), StoreError> {
    let undefined = (state as &dyn Any)
        .downcast_ref::<serde_json::Value>()
        .is_some_and(serde_json::Value::is_null);
    if undefined {
        return Err(StoreError::UndefinedState {
            action: action.name().to_string(),
        });
    }
    Ok(())
}

fn always_changed<S>(_: &S, _: &S) -> bool {
    true
}

fn not_equal<S: PartialEq>(previous: &S, next: &S) -> bool {
    previous != next
}

/// Create a store, running `reducer` once with `preloaded` (or `None`) and
/// the action type's init sentinel to establish the initial state.
pub fn create_store<S, A, R>(
    reducer: R,
    preloaded: Option<S>,
) -> Result<Store<S, A, R>, StoreError>
where
    S: 'static,
    A: Action,
    R: Reducer<S, A>,
{
    Store::build(reducer, preloaded, NoopMiddleware)
}

impl<S, A, R, M> Clone for Store<S, A, R, M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S, A, R, M> std::fmt::Debug for Store<S, A, R, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("listeners", &self.shared.listeners.lock().len())
            .finish_non_exhaustive()
    }
}

impl<S, A, R> Store<S, A, R, NoopMiddleware>
where
    S: 'static,
    A: Action,
    R: Reducer<S, A>,
{
    /// Create a store whose initial state is the reducer's default
    pub fn new(reducer: R) -> Result<Self, StoreError> {
        Self::build(reducer, None, NoopMiddleware)
    }

    /// Create a store starting from a previously saved state
    pub fn with_preloaded_state(reducer: R, state: S) -> Result<Self, StoreError> {
        Self::build(reducer, Some(state), NoopMiddleware)
    }
}

impl<S, A, R, M> Store<S, A, R, M>
where
    S: 'static,
    A: Action,
    R: Reducer<S, A>,
    M: Middleware<A>,
{
    /// Create a store with middleware
    ///
    /// The middleware sees every dispatched action but not the init sentinel
    /// run during construction.
    pub fn with_middleware(
        reducer: R,
        preloaded: Option<S>,
        middleware: M,
    ) -> Result<Self, StoreError> {
        Self::build(reducer, preloaded, middleware)
    }

    fn build(reducer: R, preloaded: Option<S>, middleware: M) -> Result<Self, StoreError> {
        let init = A::init();
        tracing::trace!(action = %init.name(), preloaded = preloaded.is_some(), "initializing store");
        let state = reducer.reduce(preloaded.as_ref(), &init)?;
        ensure_defined(&state, &init)?;

        let core = Core {
            state: RefCell::new(Arc::new(state)),
            reducer: RefCell::new(reducer),
            middleware: RefCell::new(middleware),
            reducing: Cell::new(false),
            change_detector: Cell::new(always_changed::<S>),
        };
        Ok(Self {
            shared: Arc::new(Shared {
                core: ReentrantMutex::new(core),
                listeners: Arc::new(Mutex::new(ListenerRegistry::default())),
                _marker: PhantomData,
            }),
        })
    }

    /// Get the current state
    ///
    /// Returns a snapshot; it stays valid and unchanged after later
    /// dispatches.
    pub fn get_state(&self) -> Arc<S> {
        let core = self.shared.core.lock();
        let state = Arc::clone(&core.state.borrow());
        state
    }

    /// Dispatch an action to the store
    ///
    /// Validates the action, runs middleware and the reducer, installs the
    /// new state and then calls every listener registered when notification
    /// starts, in subscription order. Returns the action.
    ///
    /// On error the state is left exactly as it was and no listener runs.
    /// Listeners may dispatch; the nested dispatch completes, including its
    /// own notifications, before the outer notification pass continues.
    pub fn dispatch(&self, action: A) -> Result<A, StoreError> {
        action.validate()?;

        let core = self.shared.core.lock();
        if core.reducing.get() {
            return Err(StoreError::DispatchWhileReducing {
                action: action.name().to_string(),
            });
        }

        tracing::trace!(action = %action.name(), "dispatching");
        Self::transition(&core, &action, |previous| {
            core.reducer.borrow().reduce(Some(previous), &action)
        })?;
        self.notify(&action);

        drop(core);
        Ok(action)
    }

    /// Run middleware around `reduce` and install its result. Nothing is
    /// installed and `after` is skipped when `reduce` fails.
    fn transition(
        core: &Core<S, R, M>,
        action: &A,
        reduce: impl FnOnce(&S) -> Result<S, StoreError>,
    ) -> Result<(), StoreError> {
        core.reducing.set(true);
        defer! {
            core.reducing.set(false);
        }

        core.middleware.borrow_mut().before(action);
        let previous = Arc::clone(&core.state.borrow());
        let next = reduce(previous.as_ref())?;
        ensure_defined(&next, action)?;
        let changed = (core.change_detector.get())(previous.as_ref(), &next);
        *core.state.borrow_mut() = Arc::new(next);
        core.middleware.borrow_mut().after(action, changed);
        Ok(())
    }

    fn notify(&self, action: &A) {
        let listeners = self.shared.listeners.lock().snapshot();
        tracing::debug!(action = %action.name(), listeners = listeners.len(), "action processed");
        for listener in &listeners {
            listener();
        }
    }

    /// Register a change listener
    ///
    /// The returned handle removes exactly this registration. Subscribing the
    /// same closure twice registers it twice.
    pub fn subscribe<F>(&self, listener: F) -> Unsubscribe
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.shared.listeners.lock().add(Arc::new(listener));
        Unsubscribe {
            registry: Arc::downgrade(&self.shared.listeners),
            id,
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.lock().len()
    }

    /// Swap the root reducer, running the init sentinel through it so new
    /// slices pick up their defaults. Listeners are notified.
    ///
    /// If the new reducer fails on the sentinel, the old reducer and state
    /// stay in place.
    pub fn replace_reducer(&self, reducer: R) -> Result<(), StoreError> {
        let core = self.shared.core.lock();
        if core.reducing.get() {
            return Err(StoreError::DispatchWhileReducing {
                action: "replace_reducer".to_string(),
            });
        }

        let init = A::init();
        Self::transition(&core, &init, |previous| reducer.reduce(Some(previous), &init))?;
        *core.reducer.borrow_mut() = reducer;
        tracing::debug!("root reducer replaced");
        self.notify(&init);

        drop(core);
        Ok(())
    }

    /// Report `state_changed = previous != next` to middleware instead of
    /// always `true`.
    pub fn detect_changes(self) -> Self
    where
        S: PartialEq,
    {
        self.shared
            .core
            .lock()
            .change_detector
            .set(not_equal::<S>);
        self
    }

    /// Run `f` with the middleware, e.g. to read an action log
    ///
    /// Dispatching from `f` returns [`StoreError::DispatchWhileReducing`].
    pub fn middleware<T>(&self, f: impl FnOnce(&M) -> T) -> T {
        let core = self.shared.core.lock();
        let was_reducing = core.reducing.replace(true);
        defer! {
            core.reducing.set(was_reducing);
        }
        let middleware = core.middleware.borrow();
        f(&middleware)
    }

    /// A handle that does not keep the store alive
    pub fn downgrade(&self) -> WeakStore<S, A, R, M> {
        WeakStore {
            shared: Arc::downgrade(&self.shared),
        }
    }
}

/// Non-owning store handle, for listeners that dispatch
pub struct WeakStore<S, A, R, M = NoopMiddleware> {
    shared: Weak<Shared<S, A, R, M>>,
}

impl<S, A, R, M> Clone for WeakStore<S, A, R, M> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<S, A, R, M> WeakStore<S, A, R, M> {
    pub fn upgrade(&self) -> Option<Store<S, A, R, M>> {
        self.shared.upgrade().map(|shared| Store { shared })
    }
}

/// Handle returned by [`Store::subscribe`]
///
/// Dropping it does not unsubscribe.
pub struct Unsubscribe {
    registry: Weak<Mutex<ListenerRegistry>>,
    id: u64,
}

impl Unsubscribe {
    /// Remove the listener. Calling this again, or after the store is gone,
    /// does nothing.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(self.id);
        }
    }
}

impl std::fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unsubscribe").field("id", &self.id).finish()
    }
}

/// Ordered listener registrations keyed by a per-store id
#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

impl ListenerRegistry {
    fn add(&mut self, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry, _)| *entry != id);
    }

    /// Listeners to notify for one pass. Later registry changes do not
    /// affect a pass already in progress.
    fn snapshot(&self) -> Vec<Listener> {
        self.entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Middleware trait for intercepting actions
///
/// Implement this trait to add logging, persistence, or other
/// cross-cutting concerns to your store. Hooks run while the store is
/// reducing, so they must not dispatch.
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the new state is installed. Not called when the reducer
    /// fails.
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Compose multiple middleware into a single middleware
pub struct ComposedMiddleware<A: Action> {
    middlewares: Vec<Box<dyn Middleware<A> + Send>>,
}

impl<A: Action> std::fmt::Debug for ComposedMiddleware<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl<A: Action> Default for ComposedMiddleware<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> ComposedMiddleware<A> {
    /// Create a new composed middleware
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Add a middleware to the composition
    pub fn add<M: Middleware<A> + Send + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    /// Builder form of [`add`](Self::add)
    pub fn with<M: Middleware<A> + Send + 'static>(mut self, middleware: M) -> Self {
        self.add(middleware);
        self
    }
}

impl<A: Action> Middleware<A> for ComposedMiddleware<A> {
    fn before(&mut self, action: &A) {
        for middleware in &mut self.middlewares {
            middleware.before(action);
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        // Call in reverse order for proper nesting
        for middleware in self.middlewares.iter_mut().rev() {
            middleware.after(action, state_changed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Init,
        Increment,
        Decrement,
        NoOp,
        Fail,
    }

    impl Action for TestAction {
        fn name(&self) -> &str {
            match self {
                TestAction::Init => "Init",
                TestAction::Increment => "Increment",
                TestAction::Decrement => "Decrement",
                TestAction::NoOp => "NoOp",
                TestAction::Fail => "Fail",
            }
        }

        fn init() -> Self {
            TestAction::Init
        }
    }

    fn counter(state: Option<&i32>, action: &TestAction) -> i32 {
        let state = state.copied().unwrap_or(0);
        match action {
            TestAction::Increment => state + 1,
            TestAction::Decrement => state - 1,
            _ => state,
        }
    }

    fn counter_store() -> Store<i32, TestAction, fn(Option<&i32>, &TestAction) -> i32> {
        Store::new(counter as fn(Option<&i32>, &TestAction) -> i32).unwrap()
    }

    #[test]
    fn test_store_initial_state() {
        let store = counter_store();
        assert_eq!(*store.get_state(), counter(None, &TestAction::Init));
        assert_eq!(*store.get_state(), 0);
    }

    #[test]
    fn test_store_preloaded_state() {
        let store = Store::with_preloaded_state(counter, 41).unwrap();
        assert_eq!(*store.get_state(), 41);
        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*store.get_state(), 42);
    }

    #[test]
    fn test_store_dispatch() {
        let store = counter_store();

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*store.get_state(), 1);

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*store.get_state(), 2);

        store.dispatch(TestAction::Decrement).unwrap();
        assert_eq!(*store.get_state(), 1);
    }

    #[test]
    fn test_dispatch_returns_action() {
        let store = counter_store();
        assert_eq!(store.dispatch(TestAction::NoOp).unwrap(), TestAction::NoOp);
    }

    #[test]
    fn test_snapshots_are_not_modified() {
        let store = counter_store();
        let before = store.get_state();
        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*before, 0);
        assert_eq!(*store.get_state(), 1);
        assert!(!Arc::ptr_eq(&before, &store.get_state()));
    }

    #[test]
    fn test_listeners_called_in_order() {
        let store = counter_store();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let _subs: Vec<_> = (0..3)
            .map(|i| {
                let calls = Arc::clone(&calls);
                store.subscribe(move || calls.lock().push(i))
            })
            .collect();

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*calls.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let store = counter_store();
        let count = Arc::new(AtomicUsize::new(0));

        let first = {
            let count = Arc::clone(&count);
            store.subscribe(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        let _second = {
            let count = Arc::clone(&count);
            store.subscribe(move || {
                count.fetch_add(10, Ordering::SeqCst);
            })
        };

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 11);

        first.unsubscribe();
        first.unsubscribe();
        assert_eq!(store.listener_count(), 1);

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 21);
    }

    #[test]
    fn test_unsubscribe_during_notification() {
        let store = counter_store();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let second: Arc<Mutex<Option<Unsubscribe>>> = Arc::new(Mutex::new(None));

        let _first = {
            let calls = Arc::clone(&calls);
            let second = Arc::clone(&second);
            store.subscribe(move || {
                calls.lock().push("first");
                if let Some(handle) = second.lock().as_ref() {
                    handle.unsubscribe();
                }
            })
        };
        let handle = {
            let calls = Arc::clone(&calls);
            store.subscribe(move || calls.lock().push("second"))
        };
        *second.lock() = Some(handle);
        let _third = {
            let calls = Arc::clone(&calls);
            store.subscribe(move || calls.lock().push("third"))
        };

        // the pass in progress still sees all three
        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*calls.lock(), vec!["first", "second", "third"]);

        calls.lock().clear();
        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*calls.lock(), vec!["first", "third"]);
    }

    #[test]
    fn test_subscribe_during_notification_waits_for_next_dispatch() {
        let store = counter_store();
        let late_calls = Arc::new(AtomicUsize::new(0));
        let subscribed = Arc::new(AtomicUsize::new(0));

        let _outer = {
            let weak = store.downgrade();
            let late_calls = Arc::clone(&late_calls);
            let subscribed = Arc::clone(&subscribed);
            store.subscribe(move || {
                if subscribed.fetch_add(1, Ordering::SeqCst) == 0 {
                    let late_calls = Arc::clone(&late_calls);
                    if let Some(store) = weak.upgrade() {
                        // dropping the handle leaves the listener registered
                        let _ = store.subscribe(move || {
                            late_calls.fetch_add(1, Ordering::SeqCst);
                        });
                    }
                }
            })
        };

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_dispatch_is_depth_first() {
        let store = counter_store();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _first = {
            let weak = store.downgrade();
            let seen = Arc::clone(&seen);
            store.subscribe(move || {
                let store = weak.upgrade().unwrap();
                let state = *store.get_state();
                seen.lock().push(("first", state));
                if state == 1 {
                    store.dispatch(TestAction::Increment).unwrap();
                }
            })
        };
        let _second = {
            let weak = store.downgrade();
            let seen = Arc::clone(&seen);
            store.subscribe(move || {
                let state = *weak.upgrade().unwrap().get_state();
                seen.lock().push(("second", state));
            })
        };

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(
            *seen.lock(),
            vec![("first", 1), ("first", 2), ("second", 2), ("second", 2)]
        );
        assert_eq!(*store.get_state(), 2);
    }

    #[test]
    fn test_reducer_error_leaves_state_untouched() {
        let reducer = crate::reducer::try_reducer(|state: Option<&i32>, action: &TestAction| {
            match action {
                TestAction::Fail => Err(StoreError::reducer("Fail", "refused")),
                _ => Ok(counter(state, action)),
            }
        });
        let store = Store::new(reducer).unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let _sub = {
            let count = Arc::clone(&count);
            store.subscribe(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        store.dispatch(TestAction::Increment).unwrap();
        let err = store.dispatch(TestAction::Fail).unwrap_err();
        assert!(matches!(err, StoreError::Reducer { .. }));
        assert_eq!(*store.get_state(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // the store keeps working
        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*store.get_state(), 2);
    }

    type Redispatch = Arc<Mutex<Option<Box<dyn Fn() -> Result<TestAction, StoreError> + Send + Sync>>>>;

    #[test]
    fn test_dispatch_from_reducer_is_rejected() {
        let redispatch: Redispatch = Arc::new(Mutex::new(None));
        let nested_result = Arc::new(Mutex::new(None));

        let reducer = {
            let redispatch = Arc::clone(&redispatch);
            let nested_result = Arc::clone(&nested_result);
            move |state: Option<&i32>, action: &TestAction| {
                if *action == TestAction::Increment {
                    if let Some(dispatch) = redispatch.lock().as_ref() {
                        *nested_result.lock() = Some(dispatch().is_err());
                    }
                }
                counter(state, action)
            }
        };
        let store = Store::new(reducer).unwrap();
        let weak = store.downgrade();
        *redispatch.lock() = Some(Box::new(move || {
            weak.upgrade().unwrap().dispatch(TestAction::Decrement)
        }));

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*nested_result.lock(), Some(true));
        assert_eq!(*store.get_state(), 1);
    }

    #[test]
    fn test_unsubscribe_after_store_dropped() {
        let store = counter_store();
        let handle = store.subscribe(|| {});
        drop(store);
        handle.unsubscribe();
    }

    #[test]
    fn test_weak_store_does_not_keep_store_alive() {
        let store = counter_store();
        let weak = store.downgrade();
        assert!(weak.upgrade().is_some());
        drop(store);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_replace_reducer() {
        fn doubled(state: Option<&i32>, action: &TestAction) -> i32 {
            let state = state.copied().unwrap_or(0);
            match action {
                TestAction::Increment => state + 2,
                TestAction::Decrement => state - 2,
                _ => state,
            }
        }

        let store = Store::new(counter as fn(Option<&i32>, &TestAction) -> i32).unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let _sub = {
            let count = Arc::clone(&count);
            store.subscribe(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        store.dispatch(TestAction::Increment).unwrap();
        store.replace_reducer(doubled).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(*store.get_state(), 1);

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*store.get_state(), 3);
    }

    type Fallible = fn(Option<&i32>, &TestAction) -> Result<i32, StoreError>;

    #[test]
    fn test_failed_replace_reducer_keeps_old_reducer() {
        fn counting(state: Option<&i32>, action: &TestAction) -> Result<i32, StoreError> {
            Ok(counter(state, action))
        }
        fn not_ready(_: Option<&i32>, action: &TestAction) -> Result<i32, StoreError> {
            Err(StoreError::reducer(action.name(), "not ready"))
        }

        let store = Store::new(crate::reducer::try_reducer(counting as Fallible)).unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let _sub = {
            let count = Arc::clone(&count);
            store.subscribe(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        store.dispatch(TestAction::Increment).unwrap();

        let err = store
            .replace_reducer(crate::reducer::try_reducer(not_ready as Fallible))
            .unwrap_err();
        assert!(matches!(err, StoreError::Reducer { ref action, .. } if action == "Init"));
        assert_eq!(*store.get_state(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*store.get_state(), 2);
    }

    #[test]
    fn test_null_root_state_is_rejected() {
        use serde_json::{json, Value};

        let result = Store::new(|_: Option<&Value>, _: &TestAction| Value::Null);
        assert!(matches!(result, Err(StoreError::UndefinedState { ref action }) if action == "Init"));

        let store = Store::new(|state: Option<&Value>, action: &TestAction| match action {
            TestAction::Fail => Value::Null,
            _ => state.cloned().unwrap_or_else(|| json!({})),
        })
        .unwrap();
        let err = store.dispatch(TestAction::Fail).unwrap_err();
        assert!(matches!(err, StoreError::UndefinedState { .. }));
        assert_eq!(*store.get_state(), json!({}));
    }

    #[test]
    fn test_dispatch_from_middleware_accessor_is_rejected() {
        let store =
            Store::with_middleware(counter, None, CountingMiddleware::default()).unwrap();

        let nested = store.middleware(|_| store.dispatch(TestAction::Increment));
        assert!(matches!(nested, Err(StoreError::DispatchWhileReducing { .. })));

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(*store.get_state(), 1);
    }

    #[test]
    fn test_dispatch_serialized_across_threads() {
        let store = counter_store();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        store.dispatch(TestAction::Increment).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*store.get_state(), 1000);
    }

    #[derive(Default)]
    struct CountingMiddleware {
        before_count: usize,
        after_count: usize,
        changed_count: usize,
    }

    impl<A: Action> Middleware<A> for CountingMiddleware {
        fn before(&mut self, _action: &A) {
            self.before_count += 1;
        }

        fn after(&mut self, _action: &A, state_changed: bool) {
            self.after_count += 1;
            if state_changed {
                self.changed_count += 1;
            }
        }
    }

    #[test]
    fn test_store_with_middleware() {
        let store =
            Store::with_middleware(counter, None, CountingMiddleware::default()).unwrap();

        store.dispatch(TestAction::Increment).unwrap();
        store.dispatch(TestAction::NoOp).unwrap();

        store.middleware(|m| {
            assert_eq!(m.before_count, 2);
            assert_eq!(m.after_count, 2);
            assert_eq!(m.changed_count, 2);
        });
        assert_eq!(*store.get_state(), 1);
    }

    #[test]
    fn test_detect_changes() {
        let store = Store::with_middleware(counter, None, CountingMiddleware::default())
            .unwrap()
            .detect_changes();

        store.dispatch(TestAction::Increment).unwrap();
        store.dispatch(TestAction::NoOp).unwrap();

        store.middleware(|m| {
            assert_eq!(m.after_count, 2);
            assert_eq!(m.changed_count, 1);
        });
    }

    #[test]
    fn test_composed_middleware_order() {
        struct Tagged(&'static str, Arc<Mutex<Vec<String>>>);

        impl Middleware<TestAction> for Tagged {
            fn before(&mut self, _action: &TestAction) {
                self.1.lock().push(format!("{} before", self.0));
            }
            fn after(&mut self, _action: &TestAction, _state_changed: bool) {
                self.1.lock().push(format!("{} after", self.0));
            }
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let middleware = ComposedMiddleware::new()
            .with(Tagged("outer", Arc::clone(&log)))
            .with(Tagged("inner", Arc::clone(&log)));
        let store = Store::with_middleware(counter, None, middleware).unwrap();

        store.dispatch(TestAction::Increment).unwrap();
        assert_eq!(
            *log.lock(),
            vec!["outer before", "inner before", "inner after", "outer after"]
        );
    }
}
