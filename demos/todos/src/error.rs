use std::io;

use flux_dispatch::StoreError;
use thiserror::Error;

use crate::commands::CommandError;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: CommandError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("state conversion failed: {0}")]
    State(#[from] serde_json::Error),

    #[error("could not read script: {0}")]
    Io(#[from] io::Error),
}

impl From<(usize, CommandError)> for DemoError {
    fn from((line, source): (usize, CommandError)) -> Self {
        DemoError::Script { line, source }
    }
}
