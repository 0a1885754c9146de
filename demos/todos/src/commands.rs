//! Script commands and the action creators they map to

use std::str::FromStr;

use flux_dispatch::IdGenerator;
use thiserror::Error;

use crate::action::TodoAction;
use crate::state::VisibilityFilter;

/// A script line that could not be understood
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error("`{command}` needs an argument: {usage}")]
    MissingArgument {
        command: &'static str,
        usage: &'static str,
    },

    #[error("invalid argument for `{command}`: {reason}")]
    InvalidArgument {
        command: &'static str,
        reason: String,
    },
}

/// One parsed script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(u64),
    Filter(VisibilityFilter),
    Increment,
    Decrement,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "" => Err(CommandError::Empty),
            "add" if rest.is_empty() => Err(CommandError::MissingArgument {
                command: "add",
                usage: "add <text>",
            }),
            "add" => Ok(Command::Add(rest.to_string())),
            "toggle" if rest.is_empty() => Err(CommandError::MissingArgument {
                command: "toggle",
                usage: "toggle <id>",
            }),
            "toggle" => rest
                .parse()
                .map(Command::Toggle)
                .map_err(|e: std::num::ParseIntError| CommandError::InvalidArgument {
                    command: "toggle",
                    reason: e.to_string(),
                }),
            "filter" if rest.is_empty() => Err(CommandError::MissingArgument {
                command: "filter",
                usage: "filter <all|active|completed>",
            }),
            "filter" => rest
                .parse()
                .map(Command::Filter)
                .map_err(|reason| CommandError::InvalidArgument {
                    command: "filter",
                    reason,
                }),
            "inc" => Ok(Command::Increment),
            "dec" => Ok(Command::Decrement),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Parse a script, one command per line. Blank lines and `#` comments are
/// skipped. Errors carry the 1-based line number.
pub fn parse_script(script: &str) -> Result<Vec<Command>, (usize, CommandError)> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| line.parse::<Command>().map_err(|e| (index + 1, e)))
        .collect()
}

/// Action creators. New todos get ids from the generator, so two stores
/// fed by separate `TodoCommands` never share a counter.
#[derive(Debug, Clone, Default)]
pub struct TodoCommands {
    ids: IdGenerator,
}

impl TodoCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after `next_id`, e.g. for a preloaded list
    pub fn starting_at(next_id: u64) -> Self {
        Self {
            ids: IdGenerator::starting_at(next_id),
        }
    }

    pub fn add_todo(&mut self, text: impl Into<String>) -> TodoAction {
        TodoAction::AddTodo {
            id: self.ids.next_id(),
            text: text.into(),
        }
    }

    pub fn toggle_todo(&self, id: u64) -> TodoAction {
        TodoAction::ToggleTodo { id }
    }

    pub fn set_visibility_filter(&self, filter: VisibilityFilter) -> TodoAction {
        TodoAction::SetVisibilityFilter { filter }
    }

    pub fn action_for(&mut self, command: &Command) -> TodoAction {
        match command {
            Command::Add(text) => self.add_todo(text.as_str()),
            Command::Toggle(id) => self.toggle_todo(*id),
            Command::Filter(filter) => self.set_visibility_filter(*filter),
            Command::Increment => TodoAction::Increment,
            Command::Decrement => TodoAction::Decrement,
        }
    }
}
