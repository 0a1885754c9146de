//! Reducers - pure functions: (previous state, action) -> next state
//!
//! FRAMEWORK PATTERN: Slice reducers
//! - Each reducer owns one key of the state tree and gets `None` the first
//!   time it runs, which is where its default comes from
//! - Unknown actions return the incoming state unchanged
//! - `combine_reducers` + `typed` glue the typed slices into one JSON tree

use flux_dispatch::immutable::{appended, replaced};
use flux_dispatch::{combine_reducers, typed, CombineReducers};

use crate::action::TodoAction;
use crate::state::{Todo, VisibilityFilter};

/// INCREMENT / DECREMENT, starting at 0
pub fn counter(state: Option<&i64>, action: &TodoAction) -> i64 {
    let state = state.copied().unwrap_or(0);
    match action {
        TodoAction::Increment => state + 1,
        TodoAction::Decrement => state - 1,
        _ => state,
    }
}

/// Reducer for a single item. `None` means "no item", which is only
/// valid as input for ADD_TODO.
pub fn todo(state: Option<&Todo>, action: &TodoAction) -> Option<Todo> {
    match action {
        TodoAction::AddTodo { id, text } => Some(Todo {
            id: *id,
            text: text.clone(),
            completed: false,
        }),
        TodoAction::ToggleTodo { id } => state.map(|todo| {
            if todo.id == *id {
                Todo {
                    completed: !todo.completed,
                    ..todo.clone()
                }
            } else {
                todo.clone()
            }
        }),
        _ => state.cloned(),
    }
}

pub fn todos(state: Option<&Vec<Todo>>, action: &TodoAction) -> Vec<Todo> {
    let state = state.map(Vec::as_slice).unwrap_or_default();
    match action {
        TodoAction::AddTodo { .. } => match todo(None, action) {
            Some(item) => appended(state, item),
            None => state.to_vec(),
        },
        TodoAction::ToggleTodo { id } => match state.iter().position(|t| t.id == *id) {
            Some(index) => replaced(state, index, |t| {
                todo(Some(t), action).unwrap_or_else(|| t.clone())
            }),
            None => state.to_vec(),
        },
        _ => state.to_vec(),
    }
}

pub fn visibility_filter(
    state: Option<&VisibilityFilter>,
    action: &TodoAction,
) -> VisibilityFilter {
    match action {
        TodoAction::SetVisibilityFilter { filter } => *filter,
        _ => state.copied().unwrap_or_default(),
    }
}

/// Root reducer of the todo list: `{ todos, visibilityFilter }`
pub fn todo_app() -> CombineReducers<TodoAction> {
    combine_reducers()
        .slice("todos", typed(todos))
        .slice("visibilityFilter", typed(visibility_filter))
}

/// The todo list plus the counter slice
pub fn app() -> CombineReducers<TodoAction> {
    todo_app().slice("counter", typed(counter))
}

/// Selector: the todos the current filter lets through
pub fn visible_todos(todos: &[Todo], filter: VisibilityFilter) -> Vec<Todo> {
    todos.iter().filter(|t| filter.matches(t)).cloned().collect()
}
