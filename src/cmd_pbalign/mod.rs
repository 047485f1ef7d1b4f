//! Subcommand modules for the `pbalign` binary.

pub mod contract;
pub mod options;
pub mod post;
pub mod version;
