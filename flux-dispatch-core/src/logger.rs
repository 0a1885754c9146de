//! Action logging with pattern-based filtering and in-memory storage
//!
//! Provides configurable action logging using glob patterns to include/exclude
//! specific actions from logs. Supports both tracing output and an in-memory
//! ring buffer of recent actions.
//!
//! # Example
//!
//! ```
//! use flux_dispatch_core::logger::{ActionLogConfig, ActionLoggerConfig, ActionLoggerMiddleware};
//!
//! // Log everything except store-internal `@@` actions (tracing only)
//! let middleware = ActionLoggerMiddleware::new(ActionLoggerConfig::default());
//! assert!(middleware.log().is_none());
//!
//! // Also keep the last 100 actions in memory
//! let middleware = ActionLoggerMiddleware::with_log(ActionLogConfig::default());
//! for entry in middleware.log().unwrap().recent(10) {
//!     println!("#{} {}", entry.sequence, entry.summary);
//! }
//! ```

use std::collections::VecDeque;

use crate::action::ActionSummary;
use crate::store::Middleware;

/// Patterns excluded when no exclude list is given
const DEFAULT_EXCLUDES: &[&str] = &["@@*"];

fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|p| p.to_string()).collect()
}

fn split_patterns(patterns: &str) -> Vec<String> {
    patterns
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration for action logging with glob pattern filtering.
///
/// Patterns support:
/// - `*` matches any sequence of characters
/// - `?` matches any single character
/// - Literal text matches exactly
///
/// # Examples
///
/// - `ADD_*` matches ADD_TODO, ADD_COUNTER, etc.
/// - `*_TODO` matches ADD_TODO, TOGGLE_TODO
/// - `@@*` matches the store's own init action
#[derive(Debug, Clone)]
pub struct ActionLoggerConfig {
    /// If non-empty, only log actions matching these patterns
    pub include_patterns: Vec<String>,
    /// Exclude actions matching these patterns (applied after include)
    pub exclude_patterns: Vec<String>,
}

impl Default for ActionLoggerConfig {
    fn default() -> Self {
        Self {
            include_patterns: Vec::new(),
            exclude_patterns: default_excludes(),
        }
    }
}

impl ActionLoggerConfig {
    /// Create a new config from comma-separated pattern strings
    ///
    /// # Arguments
    /// - `include`: comma-separated glob patterns (or None for all)
    /// - `exclude`: comma-separated glob patterns (or None for default excludes)
    ///
    /// # Example
    /// ```
    /// use flux_dispatch_core::logger::ActionLoggerConfig;
    ///
    /// let config = ActionLoggerConfig::new(Some("*_TODO, INCREMENT"), None);
    /// assert!(config.should_log("ADD_TODO"));
    /// assert!(config.should_log("INCREMENT"));
    /// assert!(!config.should_log("DECREMENT"));
    /// ```
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include_patterns: include.map(split_patterns).unwrap_or_default(),
            exclude_patterns: exclude.map(split_patterns).unwrap_or_else(default_excludes),
        }
    }

    /// Create a config with specific pattern vectors
    pub fn with_patterns(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include_patterns: include,
            exclude_patterns: exclude,
        }
    }

    /// Check if an action name should be logged based on include/exclude patterns
    pub fn should_log(&self, action_name: &str) -> bool {
        if !self.include_patterns.is_empty()
            && !self
                .include_patterns
                .iter()
                .any(|p| glob_match(p, action_name))
        {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|p| glob_match(p, action_name))
    }
}

/// An entry in the action log
#[derive(Debug, Clone)]
pub struct ActionLogEntry {
    /// Action name (from Action::name())
    pub name: String,
    /// Summary representation (from ActionSummary::summary())
    pub summary: String,
    /// Sequence number for ordering
    pub sequence: u64,
    /// Whether the action changed state. `None` until the reducer finishes,
    /// and stays `None` if it failed.
    pub state_changed: Option<bool>,
}

impl ActionLogEntry {
    pub fn new(name: impl Into<String>, summary: String, sequence: u64) -> Self {
        Self {
            name: name.into(),
            summary,
            sequence,
            state_changed: None,
        }
    }
}

/// Configuration for the action log ring buffer
#[derive(Debug, Clone)]
pub struct ActionLogConfig {
    /// Maximum number of entries to keep
    pub capacity: usize,
    pub filter: ActionLoggerConfig,
}

impl Default for ActionLogConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            filter: ActionLoggerConfig::default(),
        }
    }
}

impl ActionLogConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn new(capacity: usize, filter: ActionLoggerConfig) -> Self {
        Self { capacity, filter }
    }
}

/// In-memory ring buffer for storing recent actions
///
/// Older entries are discarded when capacity is reached.
#[derive(Debug, Clone)]
pub struct ActionLog {
    entries: VecDeque<ActionLogEntry>,
    config: ActionLogConfig,
    next_sequence: u64,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(ActionLogConfig::default())
    }
}

impl ActionLog {
    pub fn new(config: ActionLogConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.capacity),
            config,
            next_sequence: 0,
        }
    }

    /// Log an action (if it passes the filter)
    ///
    /// Returns the entry if it was logged, None if filtered out.
    pub fn log<A: ActionSummary>(&mut self, action: &A) -> Option<&ActionLogEntry> {
        let name = action.name();
        if !self.config.filter.should_log(name) || self.config.capacity == 0 {
            return None;
        }

        let entry = ActionLogEntry::new(name, action.summary(), self.next_sequence);
        self.next_sequence += 1;

        if self.entries.len() >= self.config.capacity {
            self.entries.pop_front();
        }

        self.entries.push_back(entry);
        self.entries.back()
    }

    /// Update the last entry with state_changed info (called after reducer)
    pub fn update_last_state_changed(&mut self, changed: bool) {
        if let Some(entry) = self.entries.back_mut() {
            entry.state_changed = Some(changed);
        }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter()
    }

    /// The most recent N entries, newest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter().rev().take(count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn config(&self) -> &ActionLogConfig {
        &self.config
    }
}

/// Middleware that logs actions with configurable pattern filtering.
///
/// Supports two modes:
/// - **Tracing only** (default): logs via `tracing::debug!()`
/// - **With storage**: also stores in an [`ActionLog`] ring buffer
#[derive(Debug, Clone)]
pub struct ActionLoggerMiddleware {
    config: ActionLoggerConfig,
    log: Option<ActionLog>,
    /// Tracks whether the last action was logged (for state_changed updates)
    last_action_logged: bool,
    /// When false, all hooks are no-ops
    active: bool,
}

impl ActionLoggerMiddleware {
    /// Tracing only, no in-memory storage
    pub fn new(config: ActionLoggerConfig) -> Self {
        Self {
            config,
            log: None,
            last_action_logged: false,
            active: true,
        }
    }

    /// Create middleware with in-memory storage
    pub fn with_log(config: ActionLogConfig) -> Self {
        Self {
            config: config.filter.clone(),
            log: Some(ActionLog::new(config)),
            last_action_logged: false,
            active: true,
        }
    }

    pub fn with_default_log() -> Self {
        Self::with_log(ActionLogConfig::default())
    }

    /// Create with no filtering (logs all actions), tracing only
    pub fn log_all() -> Self {
        Self::new(ActionLoggerConfig::with_patterns(vec![], vec![]))
    }

    /// Set whether the middleware is active.
    ///
    /// ```
    /// use flux_dispatch_core::logger::ActionLoggerMiddleware;
    ///
    /// let debug = false;
    /// let middleware = ActionLoggerMiddleware::with_default_log().active(debug);
    /// assert!(!middleware.is_active());
    /// ```
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The action log, if storage is enabled
    pub fn log(&self) -> Option<&ActionLog> {
        self.log.as_ref()
    }

    pub fn log_mut(&mut self) -> Option<&mut ActionLog> {
        self.log.as_mut()
    }

    pub fn config(&self) -> &ActionLoggerConfig {
        &self.config
    }
}

impl<A: ActionSummary> Middleware<A> for ActionLoggerMiddleware {
    fn before(&mut self, action: &A) {
        if !self.active {
            return;
        }

        let name = action.name();
        if self.config.should_log(name) {
            tracing::debug!(action = %name, "action");
        }

        self.last_action_logged = false;
        if let Some(ref mut log) = self.log {
            if log.log(action).is_some() {
                self.last_action_logged = true;
            }
        }
    }

    fn after(&mut self, _action: &A, state_changed: bool) {
        if !self.active {
            return;
        }

        // Only update state_changed if this action was actually logged
        if self.last_action_logged {
            if let Some(ref mut log) = self.log {
                log.update_last_state_changed(state_changed);
            }
        }
    }
}

/// Simple glob pattern matching supporting `*` and `?`.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let mut pi = 0;
    let mut ti = 0;
    let mut star: Option<(usize, usize)> = None;

    while ti < text.len() {
        match pattern.get(pi) {
            Some('?') => {
                pi += 1;
                ti += 1;
            }
            Some('*') => {
                star = Some((pi, ti));
                pi += 1;
            }
            Some(c) if *c == text[ti] => {
                pi += 1;
                ti += 1;
            }
            _ => match star {
                // backtrack: let the last `*` swallow one more character
                Some((star_pi, star_ti)) => {
                    pi = star_pi + 1;
                    ti = star_ti + 1;
                    star = Some((star_pi, star_ti + 1));
                }
                None => return false,
            },
        }
    }

    pattern[pi..].iter().all(|c| *c == '*')
}
