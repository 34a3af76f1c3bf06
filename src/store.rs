//! JSON snapshot store for the session (entrants, courts, roster).
//!
//! Older snapshots may lack `level` on entrants/members or `capacity` on the session; serde
//! defaults fill those in (beginner, 4) on load.

use crate::models::Session;
use std::fs;
use std::io;
use std::path::Path;

/// Errors reading or writing a snapshot.
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "state file error: {}", e),
            StoreError::Json(e) => write!(f, "state file is not valid: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Parse a snapshot, applying defaults for fields added since it was written.
pub fn from_json(data: &str) -> Result<Session, StoreError> {
    Ok(serde_json::from_str(data)?)
}

pub fn to_json(session: &Session) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(session)?)
}

/// Load the session at `path`, or a fresh one with `court_count` courts if the file does not exist.
pub fn load(path: &Path, court_count: u32) -> Result<Session, StoreError> {
    match fs::read_to_string(path) {
        Ok(data) => {
            let session = from_json(&data)?;
            log::info!(
                "Loaded {} entrant(s), {} court(s), {} member(s) from {}",
                session.entrants.len(),
                session.courts.len(),
                session.members.len(),
                path.display()
            );
            Ok(session)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("No state at {}, starting a new session", path.display());
            Ok(Session::new(court_count))
        }
        Err(e) => Err(e.into()),
    }
}

/// Write the snapshot to a sibling temp file, then rename over `path`.
pub fn save(path: &Path, session: &Session) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, to_json(session)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
