use std::path::PathBuf;

use crate::libs::tool::Operation;

/// Failures of option resolution and of the post-processing pipeline.
///
/// Configuration-layer variants are raised before any external process starts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The config file could not be read, or a line breaks the `key=value` grammar.
    #[error("ConfigParser: {}: {reason}", .path.display())]
    ConfigParse { path: PathBuf, reason: String },

    /// A config-file key that is not part of the option schema.
    #[error("ConfigParser: {key} is an invalid option ({}, line {line})", .path.display())]
    UnknownOption {
        key: String,
        path: PathBuf,
        line: usize,
    },

    /// A stage output that the underlying tool cannot produce under that name.
    #[error("{operation} output {} must end with {suffix}", .path.display())]
    InvalidOutputName {
        operation: Operation,
        path: PathBuf,
        suffix: &'static str,
    },

    /// A stage output whose name the selected command form decides by itself.
    #[error("{operation} output {} cannot be used with `{form}`, which always writes {}", .path.display(), .expected.display())]
    FixedOutputName {
        operation: Operation,
        form: &'static str,
        path: PathBuf,
        expected: PathBuf,
    },

    /// A stage input that no earlier stage declared as its output.
    #[error("stage {stage} ({operation}) reads {}, which no earlier stage produces", .input.display())]
    BrokenChain {
        stage: usize,
        operation: Operation,
        input: PathBuf,
    },

    /// An external process exited non-zero or could not be launched.
    #[error("stage {stage} ({operation}) failed{}: `{command}`\n{stderr}", status_suffix(.status))]
    StageExecution {
        stage: usize,
        operation: Operation,
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    /// A resolved tool contract that cannot be translated into arguments.
    #[error("tool contract {}: {reason}", .path.display())]
    Contract { path: PathBuf, reason: String },
}

fn status_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit code {}", code),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn config(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Error::ConfigParse {
            path: path.into(),
            reason: format!("line {}: {}", line, reason.into()),
        }
    }
}
