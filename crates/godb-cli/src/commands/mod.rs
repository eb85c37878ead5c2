//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod evidence;
pub mod export;
pub mod load;
pub mod materialize;
pub mod validate;
