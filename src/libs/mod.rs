pub mod contract;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod tool;

pub use options::{OptionSet, Source, Value};
pub use pipeline::{CommandStage, Pipeline, Sequencer};
pub use tool::{CommandLine, Executor, Operation, Probe, SystemExecutor, ToolVersion};
