//! Todos - flux-dispatch demo
//!
//! The classic todo list plus a counter, run from a script of commands:
//! 1. Script lines are parsed into [`Command`]s
//! 2. [`TodoCommands`] turns them into actions (allocating todo ids)
//! 3. Actions are dispatched to a store whose root reducer is
//!    `combine_reducers` over typed slices
//! 4. The final JSON state is read back as [`AppState`] and rendered
//!
//! FRAMEWORK PATTERN: Store with middleware
//! - `ActionLoggerMiddleware` sits on every dispatch; `--debug` switches it on
//! - `detect_changes` makes the log's `state_changed` column meaningful

pub mod action;
pub mod commands;
pub mod error;
pub mod reducer;
pub mod state;
pub mod view;

use flux_dispatch::{ActionLoggerMiddleware, CombineReducers, Store, StoreError};
use serde::Deserialize;
use serde_json::Value;

pub use action::TodoAction;
pub use commands::{parse_script, Command, CommandError, TodoCommands};
pub use error::DemoError;
pub use reducer::{app, counter, todo, todo_app, todos, visibility_filter, visible_todos};
pub use state::{AppState, Todo, VisibilityFilter};
pub use view::render;

/// The demo's store: JSON state tree, typed actions, action logger
pub type TodoStore = Store<Value, TodoAction, CombineReducers<TodoAction>, ActionLoggerMiddleware>;

/// Build the store for [`app`], starting from `preloaded` if given
pub fn create_app_store(
    preloaded: Option<Value>,
    logger: ActionLoggerMiddleware,
) -> Result<TodoStore, StoreError> {
    Ok(Store::with_middleware(app(), preloaded, logger)?.detect_changes())
}

/// Dispatch one action per command, stopping at the first failure
pub fn run_commands(
    store: &TodoStore,
    creators: &mut TodoCommands,
    commands: &[Command],
) -> Result<(), DemoError> {
    for command in commands {
        let action = creators.action_for(command);
        tracing::debug!(?command, "running command");
        store.dispatch(action)?;
    }
    Ok(())
}

/// Typed snapshot of the store's current state
pub fn app_state(store: &TodoStore) -> Result<AppState, DemoError> {
    let state = store.get_state();
    Ok(AppState::deserialize(state.as_ref())?)
}
