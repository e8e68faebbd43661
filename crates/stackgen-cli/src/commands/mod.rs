//! Command handlers, one module per subcommand.

pub mod commit;
pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod roles;
