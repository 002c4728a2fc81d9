// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod delete;
pub mod error;
pub mod submit;
pub mod workspace;

pub use delete::{Confirm, Deleted, delete, delete_prompt};
pub use error::SyncError;
pub use submit::{SubmitOptions, Submitted, submit};
pub use workspace::{
    LoadReport, Screen, Stored, Workspace, fetch_failure_message, load_store,
};
