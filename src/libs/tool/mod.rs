//! External tools: running them, asking their version, and shaping their command lines.

pub mod dispatch;
pub mod executor;
pub mod version;

pub use dispatch::{build_command, implied_output, sort_threads, Operation, Rule, StageParams};
pub use executor::{CommandLine, CommandOutput, Executor, SystemExecutor};
pub use version::{parse_version_line, probe, Probe, ToolVersion, BASELINE};
