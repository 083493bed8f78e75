//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let client = storage::require_client()?;
    let session = client.session().context("Stored session is empty")?;

    output::field("DID", session.did());
    output::field("Handle", session.handle());
    output::field("PDS", client.pds().as_str());

    Ok(())
}
