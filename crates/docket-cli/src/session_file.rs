// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use docket_app::Session;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Reads the saved session, if any. A file holding an empty token counts as
/// logged out.
pub fn load(path: &Path) -> Result<Option<Session>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(error).with_context(|| format!("read session file {}", path.display()));
        }
    };
    let session: Session = serde_json::from_str(&raw).with_context(|| {
        format!(
            "decode session file {} -- delete it and run `docket login`",
            path.display()
        )
    })?;
    Ok(session.is_active().then_some(session))
}

pub fn save(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create session directory {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(session).context("encode session")?;
    fs::write(path, body).with_context(|| format!("write session file {}", path.display()))?;
    debug!(path = %path.display(), "session saved");
    Ok(())
}

/// Removes the saved session. Returns whether there was one.
pub fn clear(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
        Err(error) => {
            Err(error).with_context(|| format!("remove session file {}", path.display()))
        }
    }
}
