//! Session storage for persisting login state.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use skyward::{AccessToken, Client, RefreshToken, Session};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    pds: String,
    did: String,
    handle: String,
    access_token: String,
    refresh_token: String,
    /// Whether the PDS was accepted over plain HTTP at login.
    #[serde(default)]
    insecure: bool,
}

/// Get the session file path.
fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "skyward").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Save the client's current session to disk.
pub fn save_session(client: &Client) -> Result<()> {
    let session = client.session().context("Client has no session to save")?;

    let stored = StoredSession {
        pds: client.pds().to_string(),
        did: session.did().to_string(),
        handle: session.handle().to_string(),
        access_token: session.access_token().as_str().to_string(),
        refresh_token: session.refresh_token().as_str().to_string(),
        insecure: client.pds().is_plain_http(),
    };

    let path = session_path()?;
    let json = serde_json::to_string_pretty(&stored)?;

    debug!(path = %path.display(), did = %stored.did, "Saving session");
    fs::write(&path, &json).context("Failed to write session file")?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(())
}

/// Load a client holding the stored session, if there is one.
pub fn load_client() -> Result<Option<Client>> {
    let path = session_path()?;

    if !path.exists() {
        debug!(path = %path.display(), "No session file");
        return Ok(None);
    }

    debug!(path = %path.display(), "Loading session");
    let json = fs::read_to_string(&path).context("Failed to read session file")?;
    let stored: StoredSession = serde_json::from_str(&json).context("Invalid session file")?;

    let session = Session::new(
        stored.did,
        stored.handle,
        AccessToken::new(stored.access_token),
        RefreshToken::new(stored.refresh_token),
    );

    let client = if stored.insecure {
        Client::new_insecure(&stored.pds)
    } else {
        Client::new(&stored.pds)
    }
    .context("Invalid PDS URL in session")?;

    Ok(Some(client.restore_session(session)))
}

/// Load the stored session or explain how to create one.
pub fn require_client() -> Result<Client> {
    load_client()
        .context("Failed to load session")?
        .context("No active session. Run 'skyward login' first.")
}

/// Remove the stored session. Returns whether one existed.
pub fn clear_session() -> Result<bool> {
    let path = session_path()?;

    if !path.exists() {
        debug!(path = %path.display(), "No session file to remove");
        return Ok(false);
    }

    debug!(path = %path.display(), "Removing session file");
    fs::remove_file(&path).context("Failed to remove session file")?;
    Ok(true)
}
