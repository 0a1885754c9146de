//! Plain-text rendering of the app state

use std::fmt::Write;

use crate::reducer::visible_todos;
use crate::state::AppState;

/// Render the visible todos, the active filter and the counter
///
/// ```text
/// [x] 0 Learn Redux
/// [ ] 1 Use Redux
/// filter: SHOW_ALL
/// counter: 2
/// ```
pub fn render(state: &AppState) -> String {
    let mut out = String::new();
    let visible = visible_todos(&state.todos, state.visibility_filter);

    if visible.is_empty() {
        out.push_str("(no todos)\n");
    }
    for todo in &visible {
        let mark = if todo.completed { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {} {}", todo.id, todo.text);
    }
    let _ = writeln!(out, "filter: {}", state.visibility_filter);
    let _ = writeln!(out, "counter: {}", state.counter);
    out
}
