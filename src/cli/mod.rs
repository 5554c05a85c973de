//! CLI command handlers
//!
//! Each subcommand is implemented in its own module.

pub mod feedback;
pub mod helpers;
pub mod import;
pub mod init;
pub mod recommend;
pub mod seed;
pub mod serve;
pub mod show;
