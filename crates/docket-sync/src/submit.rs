// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_app::{AutoFill, Backend, EntityStore, FailurePolicy, FormController, Record, validation};
use time::Date;
use tracing::{debug, info, warn};

use crate::SyncError;
use crate::workspace::load_store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Re-fetch the whole store after a successful write.
    pub refresh: bool,
    /// Reference date for age checks.
    pub today: Date,
    /// Applied when the post-write refresh fails.
    pub policy: FailurePolicy,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            refresh: true,
            today: validation::today(),
            policy: FailurePolicy::default(),
        }
    }
}

/// A write the server accepted. The record is `None` when the server only
/// acknowledged it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted<T> {
    Created(Option<T>),
    Updated(Option<T>),
}

impl<T> Submitted<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Self::Created(record) | Self::Updated(record) => record.as_ref(),
        }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Validates the form's draft, sends it as a create or an update, and
/// reconciles `store` with what the server returned.
///
/// On any failure the store and the draft are left as they were.
pub fn submit<B, D>(
    backend: &B,
    form: &mut FormController<D>,
    store: &mut EntityStore<D::Record>,
    options: SubmitOptions,
) -> Result<Submitted<D::Record>, SyncError>
where
    B: Backend,
    D: AutoFill,
{
    if !form.begin_submit() {
        return Err(SyncError::Busy);
    }
    let result = dispatch(backend, form, store, options.today);
    form.finish_submit();

    let submitted = match result {
        Ok(submitted) => submitted,
        Err(error) => {
            form.set_message(error.user_message());
            return Err(error);
        }
    };

    let noun = title_case(D::Record::RESOURCE.singular());
    let verb = match submitted {
        Submitted::Created(_) => "added",
        Submitted::Updated(_) => "updated",
    };
    form.begin_create();
    form.set_message(format!("{noun} {verb} successfully"));

    if options.refresh
        && let Err(error) = load_store(backend, store, options.policy)
    {
        warn!(resource = %D::Record::RESOURCE, %error, "refresh after submit failed");
    }
    Ok(submitted)
}

fn dispatch<B, D>(
    backend: &B,
    form: &FormController<D>,
    store: &mut EntityStore<D::Record>,
    today: Date,
) -> Result<Submitted<D::Record>, SyncError>
where
    B: Backend,
    D: AutoFill,
{
    let resource = D::Record::RESOURCE;
    form.draft().validate(today)?;
    let payload = form.draft().to_wire();
    let generic = format!("Failed to save {}", resource.singular());

    match form.editing_id() {
        Some(id) => {
            let returned = backend
                .update::<D::Record>(id, &payload)
                .map_err(|error| SyncError::failed(error, &generic))?;
            match &returned {
                Some(record) => {
                    if store.replace(record.clone()) {
                        info!(%resource, %id, "record replaced");
                    } else {
                        warn!(%resource, %id, "updated record is not in the store");
                    }
                }
                None => debug!(%resource, %id, "update acknowledged without a record"),
            }
            Ok(Submitted::Updated(returned))
        }
        None => {
            let returned = backend
                .create::<D::Record>(&payload)
                .map_err(|error| SyncError::failed(error, &generic))?;
            match &returned {
                Some(record) => {
                    let id = record.id();
                    if !store.replace(record.clone()) {
                        store.append(record.clone());
                    }
                    info!(%resource, %id, "record appended");
                }
                None => debug!(%resource, "create acknowledged without a record"),
            }
            Ok(Submitted::Created(returned))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Submitted, title_case};

    #[test]
    fn title_case_capitalizes_first_letter_only() {
        assert_eq!(title_case("appointment"), "Appointment");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn acknowledgement_has_no_record() {
        let created: Submitted<u8> = Submitted::Created(None);
        assert_eq!(created.record(), None);
        assert_eq!(Submitted::Updated(Some(3)).record(), Some(&3));
    }
}
