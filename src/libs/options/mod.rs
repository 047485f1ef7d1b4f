//! Option resolution for pbalign.
//!
//! Command-line arguments, an optional `key=value` config file and built-in defaults are merged
//! into one [`OptionSet`]. Explicit command-line values beat the config file, which beats the
//! defaults. See [`resolve::resolve_with`] for the passes.

pub mod cli;
pub mod config;
pub mod resolve;
pub mod schema;
mod set;
mod value;

pub use cli::CliOptions;
pub use config::{ConfigEntry, ConfigFile};
pub use resolve::resolve;
pub use set::{Entry, OptionSet, Source};
pub use value::{unquote, Kind, Value};
