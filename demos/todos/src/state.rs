//! State shapes stored in the combined JSON tree

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

/// Which todos the list shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityFilter {
    #[default]
    ShowAll,
    ShowActive,
    ShowCompleted,
}

impl VisibilityFilter {
    /// Whether `todo` passes this filter
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            VisibilityFilter::ShowAll => true,
            VisibilityFilter::ShowActive => !todo.completed,
            VisibilityFilter::ShowCompleted => todo.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VisibilityFilter::ShowAll => "SHOW_ALL",
            VisibilityFilter::ShowActive => "SHOW_ACTIVE",
            VisibilityFilter::ShowCompleted => "SHOW_COMPLETED",
        }
    }
}

impl fmt::Display for VisibilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the short CLI spelling (`active`) and the stored one (`SHOW_ACTIVE`)
impl FromStr for VisibilityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" | "show_all" => Ok(VisibilityFilter::ShowAll),
            "active" | "show_active" => Ok(VisibilityFilter::ShowActive),
            "completed" | "show_completed" => Ok(VisibilityFilter::ShowCompleted),
            _ => Err(format!("unknown filter `{s}` (expected all, active or completed)")),
        }
    }
}

/// Typed view of the whole state tree, read back with `serde_json::from_value`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub todos: Vec<Todo>,
    pub visibility_filter: VisibilityFilter,
    #[serde(default)]
    pub counter: i64,
}
