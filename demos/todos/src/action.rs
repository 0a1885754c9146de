//! Actions for the todo list and counter
//!
//! FRAMEWORK PATTERN: Action naming convention
//! - Variants are PascalCase in Rust, SCREAMING_SNAKE_CASE on the wire
//!   (`AddTodo` -> "ADD_TODO") so logs and filters read like Redux
//! - One unit variant is the init sentinel the store dispatches on creation

use flux_dispatch::ActionSummary;

use crate::state::VisibilityFilter;

/// Everything that can happen to the app state
#[derive(flux_dispatch::Action, Clone, Debug, PartialEq)]
#[action(rename_all = "SCREAMING_SNAKE_CASE", skip_summary)]
pub enum TodoAction {
    /// Dispatched by the store itself; every reducer ignores it
    #[action(init, rename = "@@todos/INIT")]
    Init,

    // ===== Todos =====
    AddTodo { id: u64, text: String },
    ToggleTodo { id: u64 },

    // ===== Visibility =====
    SetVisibilityFilter { filter: VisibilityFilter },

    // ===== Counter =====
    Increment,
    Decrement,
}

/// Short one-line summaries for the action log
impl ActionSummary for TodoAction {
    fn summary(&self) -> String {
        match self {
            TodoAction::AddTodo { id, text } => format!("AddTodo #{id} {text:?}"),
            TodoAction::ToggleTodo { id } => format!("ToggleTodo #{id}"),
            TodoAction::SetVisibilityFilter { filter } => format!("SetVisibilityFilter {filter}"),
            other => format!("{:?}", other),
        }
    }
}
