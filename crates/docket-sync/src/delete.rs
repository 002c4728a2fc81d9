// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_app::{Backend, EntityStore, Record};
use tracing::{debug, info};

use crate::SyncError;

/// Asks the user a yes/no question before a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deleted {
    Removed,
    Declined,
}

pub fn delete_prompt<T: Record>(id: T::Id) -> String {
    format!("Delete {} {id}?", T::RESOURCE.singular())
}

/// Deletes `id` once `confirm` agrees, then drops it from `store`.
///
/// Dependents are left alone; their references resolve to "Not Assigned".
pub fn delete<B, T>(
    backend: &B,
    store: &mut EntityStore<T>,
    id: T::Id,
    confirm: &mut impl Confirm,
) -> Result<Deleted, SyncError>
where
    B: Backend,
    T: Record,
{
    let resource = T::RESOURCE;
    if !confirm.confirm(&delete_prompt::<T>(id)) {
        debug!(%resource, %id, "delete declined");
        return Ok(Deleted::Declined);
    }

    backend.delete::<T>(id).map_err(|error| {
        SyncError::failed(error, &format!("Failed to delete {}", resource.singular()))
    })?;
    match store.remove(id) {
        Some(_) => info!(%resource, %id, "record removed"),
        None => debug!(%resource, %id, "deleted record was not in the store"),
    }
    Ok(Deleted::Removed)
}
