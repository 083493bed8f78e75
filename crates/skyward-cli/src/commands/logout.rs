//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs) -> Result<()> {
    if storage::clear_session()? {
        output::success("Session removed");
    } else {
        eprintln!("No stored session");
    }
    Ok(())
}
