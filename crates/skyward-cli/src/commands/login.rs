//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use skyward::{Client, Credentials, Error};

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Handle, DID, or email to authenticate with
    #[arg(long)]
    pub identifier: String,

    /// Account password or app password
    #[arg(long)]
    pub password: String,

    /// Sign-in code emailed by the PDS when two-factor auth is enabled
    #[arg(long)]
    pub auth_factor_token: Option<String>,

    /// PDS base URL
    #[arg(long, default_value = "https://bsky.social")]
    pub pds: String,

    /// Allow plain HTTP to a non-loopback PDS (development or LAN servers)
    #[arg(long)]
    pub insecure: bool,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let client = if args.insecure {
        Client::new_insecure(&args.pds)
    } else {
        Client::new(&args.pds)
    };
    let mut client = client.context("Invalid PDS URL")?;

    let mut credentials = Credentials::new(&args.identifier, &args.password);
    if let Some(token) = args.auth_factor_token {
        credentials = credentials.with_auth_factor_token(token);
    }

    eprintln!("{}", "Logging in...".dimmed());

    match client.login(credentials).await {
        Ok(_) => {}
        Err(Error::Protocol(e)) if e.is_auth_factor_required() => {
            anyhow::bail!(
                "{}\nRe-run with --auth-factor-token <CODE> using the code sent to your email.",
                e.message
            );
        }
        Err(e) => return Err(e).context("Failed to login"),
    }

    storage::save_session(&client).context("Failed to save session")?;

    output::success("Logged in successfully");
    if let Some(session) = client.session() {
        output::field("DID", session.did());
        output::field("Handle", session.handle());
    }
    output::field("PDS", client.pds().as_str());

    Ok(())
}
