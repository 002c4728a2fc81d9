// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use docket_api::Client;
use docket_app::{LoginRequest, RegisterRequest, ViewTab};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

use crate::render::{profile_table, view_table};
use crate::runtime::Assignments;
use crate::session_file;

pub fn login(
    client: &Client,
    session_path: &Path,
    name: &str,
    password: String,
    out: &mut impl Write,
) -> Result<()> {
    let session = client.login(&LoginRequest {
        name: name.to_owned(),
        password,
    })?;
    session_file::save(session_path, &session)?;
    info!(name = %session.name, "logged in");
    writeln!(out, "Logged in as {}", session.name)?;
    Ok(())
}

pub fn register(
    client: &Client,
    name: &str,
    email: &str,
    password: String,
    confirm_password: String,
    out: &mut impl Write,
) -> Result<()> {
    let message = client.register(&RegisterRequest {
        name: name.to_owned(),
        email: email.to_owned(),
        password,
        confirm_password,
    })?;
    writeln!(out, "{message}")?;
    Ok(())
}

/// Tells the server first, but the local session is dropped either way.
pub fn logout(client: &Client, session_path: &Path, out: &mut impl Write) -> Result<()> {
    if client.session().is_some()
        && let Err(error) = client.logout()
    {
        warn!(%error, "server logout failed");
    }
    if session_file::clear(session_path)? {
        writeln!(out, "Logged out")?;
    } else {
        writeln!(out, "Not logged in")?;
    }
    Ok(())
}

/// Shows the profile, or saves `name`/`email` first when any are given.
pub fn profile(client: &Client, fields: &Assignments, out: &mut impl Write) -> Result<()> {
    if fields.is_empty() {
        let profile = client.profile().context("load profile")?;
        write!(out, "{}", profile_table(&profile))?;
        return Ok(());
    }

    let current = client.profile().context("load profile")?;
    let mut name = current.name;
    let mut email = current.email;
    for (field, value) in fields {
        match field.as_str() {
            "name" => name = value.clone(),
            "email" => email = value.clone(),
            other => bail!("profile has no field {other:?} -- editable fields: name, email"),
        }
    }
    if name.trim().is_empty() || email.trim().is_empty() {
        bail!("name and email are required");
    }

    let saved = client
        .update_profile(&name, &email)
        .context("update profile")?;
    writeln!(out, "Profile updated")?;
    write!(out, "{}", profile_table(&saved))?;
    Ok(())
}

pub fn view(client: &Client, tab: ViewTab, out: &mut impl Write) -> Result<()> {
    let rows = client
        .view(tab)
        .with_context(|| format!("load {} view", tab.label()))?;
    write!(out, "{}", view_table(&rows))?;
    Ok(())
}
