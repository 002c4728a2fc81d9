// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use docket_app::{
    AppointmentDraft, AutoFill, Backend, CaseDraft, ClientDraft, Draft, FormController,
    LawyerDraft, Record, RecordId, Resource, ScheduleDraft,
};
use docket_sync::{
    Confirm, Deleted, Screen, SubmitOptions, Workspace, delete, fetch_failure_message,
    submit,
};
use std::io::Write;
use tracing::warn;

use crate::render::{Tabular, dashboard_table, format_table, records_table};

/// Runs `$body` with `$draft` bound to the draft type editing `$resource`.
macro_rules! with_draft {
    ($resource:expr, $draft:ident => $body:expr) => {
        match $resource {
            Resource::Clients => {
                type $draft = ClientDraft;
                $body
            }
            Resource::Lawyers => {
                type $draft = LawyerDraft;
                $body
            }
            Resource::Cases => {
                type $draft = CaseDraft;
                $body
            }
            Resource::Appointments => {
                type $draft = AppointmentDraft;
                $body
            }
            Resource::Schedules => {
                type $draft = ScheduleDraft;
                $body
            }
        }
    };
}

/// `field=value` pairs in command-line order.
pub type Assignments = [(String, String)];

/// Entity commands against any [`Backend`], writing tables to `out`.
pub struct Runtime<'a, B: Backend> {
    backend: &'a B,
    workspace: Workspace,
    submit_options: SubmitOptions,
}

impl<'a, B: Backend> Runtime<'a, B> {
    pub fn new(backend: &'a B, refresh_after_submit: bool) -> Self {
        Self {
            backend,
            workspace: Workspace::new(),
            submit_options: SubmitOptions {
                refresh: refresh_after_submit,
                ..SubmitOptions::default()
            },
        }
    }

    pub fn dashboard(&mut self, out: &mut impl Write) -> Result<()> {
        let report = self.workspace.load_screen(self.backend, Screen::Dashboard);
        if let Some(error) = report.dashboard_error {
            bail!(error.user_message("Failed to fetch dashboard data"));
        }
        let summary = self.workspace.dashboard.clone().unwrap_or_default();
        write!(out, "{}", dashboard_table(&summary))?;
        Ok(())
    }

    pub fn list(&mut self, resource: Resource, out: &mut impl Write) -> Result<()> {
        self.load_for(resource)?;
        let table = with_draft!(resource, D => records_table::<<D as Draft>::Record>(&self.workspace));
        write!(out, "{table}")?;
        Ok(())
    }

    pub fn add(
        &mut self,
        resource: Resource,
        fields: &Assignments,
        out: &mut impl Write,
    ) -> Result<()> {
        with_draft!(resource, D => self.create::<D>(fields, out))
    }

    pub fn edit(
        &mut self,
        resource: Resource,
        id: i64,
        fields: &Assignments,
        out: &mut impl Write,
    ) -> Result<()> {
        with_draft!(resource, D => self.update::<D>(id, fields, out))
    }

    pub fn delete(
        &mut self,
        resource: Resource,
        id: i64,
        confirm: &mut impl Confirm,
        out: &mut impl Write,
    ) -> Result<()> {
        with_draft!(resource, D => self.remove::<<D as Draft>::Record>(id, confirm, out))
    }

    /// Loads the screen for `resource`. Only a failure of `resource` itself
    /// is fatal; missing lookups render as "Not Assigned".
    fn load_for(&mut self, resource: Resource) -> Result<()> {
        let report = self
            .workspace
            .load_screen(self.backend, Screen::for_resource(resource));
        for (failed, error) in &report.failed {
            if *failed == resource {
                bail!(error.user_message(&fetch_failure_message(resource)));
            }
            warn!(resource = %failed, %error, "lookup store unavailable");
        }
        Ok(())
    }

    fn create<D>(&mut self, fields: &Assignments, out: &mut impl Write) -> Result<()>
    where
        D: AutoFill,
        D::Record: Tabular,
    {
        self.load_for(D::Record::RESOURCE)?;
        let mut form = FormController::<D>::new();
        self.fill(&mut form, fields)?;
        self.save(form, out)
    }

    fn update<D>(&mut self, id: i64, fields: &Assignments, out: &mut impl Write) -> Result<()>
    where
        D: AutoFill,
        D::Record: Tabular,
    {
        let resource = D::Record::RESOURCE;
        self.load_for(resource)?;
        let id = RecordId::<D>::from(id);
        let record = self
            .workspace
            .store::<D::Record>()
            .find(id)
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "{} {id} not found -- run `docket list {}` to see ids",
                    resource.singular(),
                    resource.label()
                )
            })?;

        let mut form = FormController::<D>::new();
        form.begin_edit(&record);
        self.fill(&mut form, fields)?;
        self.save(form, out)
    }

    fn fill<D: AutoFill>(&self, form: &mut FormController<D>, fields: &Assignments) -> Result<()> {
        let lookups = self.workspace.lookups();
        for (name, value) in fields {
            form.set_field(name, value.as_str(), &lookups)
                .map_err(|error| {
                    anyhow!(
                        "{error} -- editable fields: {}",
                        D::FIELDS
                            .iter()
                            .filter(|field| !D::DERIVED.contains(*field))
                            .copied()
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                })?;
        }
        Ok(())
    }

    fn save<D>(&mut self, mut form: FormController<D>, out: &mut impl Write) -> Result<()>
    where
        D: AutoFill,
        D::Record: Tabular,
    {
        let options = SubmitOptions {
            policy: self.workspace.failure_policy,
            ..self.submit_options
        };
        let store = self.workspace.store_mut::<D::Record>();
        let submitted = submit(self.backend, &mut form, store, options)?;
        if let Some(message) = form.message() {
            writeln!(out, "{message}")?;
        }
        if let Some(record) = submitted.record() {
            let row = record.cells(&self.workspace);
            write!(out, "{}", format_table(D::Record::COLUMNS, &[row]))?;
        }
        Ok(())
    }

    fn remove<T: Tabular>(
        &mut self,
        id: i64,
        confirm: &mut impl Confirm,
        out: &mut impl Write,
    ) -> Result<()> {
        let id = T::Id::from(id);
        let store = self.workspace.store_mut::<T>();
        match delete(self.backend, store, id, confirm)? {
            Deleted::Removed => writeln!(out, "Deleted {} {id}", T::RESOURCE.singular())?,
            Deleted::Declined => writeln!(out, "Cancelled")?,
        }
        Ok(())
    }
}
