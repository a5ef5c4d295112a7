//! CLI argument definitions

pub mod args;

pub use args::{Cli, Commands, DEFAULT_QUERY};
