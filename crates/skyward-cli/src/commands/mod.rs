//! Subcommand implementations.

pub mod login;
pub mod logout;
pub mod post;
pub mod whoami;
