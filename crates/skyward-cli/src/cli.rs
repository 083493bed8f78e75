//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{login, logout, post, whoami};

/// Post to Bluesky from the command line.
#[derive(Parser, Debug)]
#[command(name = "skyward")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new session and remember it
    Login(login::LoginArgs),

    /// Display the stored session
    Whoami(whoami::WhoamiArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Create a post, optionally with images, a video, or a GIF
    Post(post::PostArgs),
}
