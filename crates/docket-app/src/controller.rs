// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::debug;

use crate::forms::{AppointmentDraft, CaseDraft, ClientDraft, Draft, LawyerDraft, ScheduleDraft};
use crate::validation::{ValidationError, ValidationResult};
use crate::{Case, Client, ClientId, EntityId, EntityStore, Record};

/// Sibling stores consulted by auto-fill rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lookups<'a> {
    pub clients: Option<&'a EntityStore<Client>>,
    pub cases: Option<&'a EntityStore<Case>>,
}

impl<'a> Lookups<'a> {
    pub fn new(clients: &'a EntityStore<Client>, cases: &'a EntityStore<Case>) -> Self {
        Self {
            clients: Some(clients),
            cases: Some(cases),
        }
    }

    pub fn clients(clients: &'a EntityStore<Client>) -> Self {
        Self {
            clients: Some(clients),
            cases: None,
        }
    }

    fn find_client(&self, raw_id: &str) -> Option<&'a Client> {
        let id = raw_id.trim().parse::<i64>().ok()?;
        self.clients?.find(ClientId::new(id))
    }
}

/// Derived-field rules that run after a field changes.
pub trait AutoFill: Draft {
    fn after_change(&mut self, _field: &str, _lookups: &Lookups<'_>) {}
}

impl AutoFill for ClientDraft {}

impl AutoFill for LawyerDraft {}

impl AutoFill for ScheduleDraft {}

impl AutoFill for CaseDraft {
    fn after_change(&mut self, field: &str, lookups: &Lookups<'_>) {
        if field != "client_id" || self.client_id.trim().is_empty() {
            return;
        }
        if let Some(client) = lookups.find_client(&self.client_id) {
            self.lawyer_id = lawyer_text(client);
            debug!(client = %client.id, lawyer = %self.lawyer_id, "case lawyer auto-filled");
        }
    }
}

impl AutoFill for AppointmentDraft {
    fn after_change(&mut self, field: &str, lookups: &Lookups<'_>) {
        if field != "client_id" || self.client_id.trim().is_empty() {
            return;
        }
        let Some(client) = lookups.find_client(&self.client_id) else {
            return;
        };
        self.lawyer_id = lawyer_text(client);
        self.case_id = lookups
            .cases
            .and_then(|cases| cases_for_client(cases, client.id).first().copied())
            .map(|case| case.id.to_string())
            .unwrap_or_default();
        debug!(
            client = %client.id,
            lawyer = %self.lawyer_id,
            case = %self.case_id,
            "appointment lawyer and case auto-filled"
        );
    }
}

fn lawyer_text(client: &Client) -> String {
    client
        .lawyer_id
        .filter(|id| id.is_assigned())
        .map(|id| id.to_string())
        .unwrap_or_default()
}

/// Cases belonging to `client`, in store order.
pub fn cases_for_client(cases: &EntityStore<Case>, client: ClientId) -> Vec<&Case> {
    cases
        .records()
        .iter()
        .filter(|case| case.client_id == Some(client))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<I> {
    Creating,
    Editing(I),
}

pub type RecordId<D> = <<D as Draft>::Record as Record>::Id;

/// The draft under edit for one form, plus its submit/in-flight state.
#[derive(Debug, Clone)]
pub struct FormController<D: AutoFill> {
    draft: D,
    mode: FormMode<RecordId<D>>,
    submitting: bool,
    message: Option<String>,
}

impl<D: AutoFill> Default for FormController<D> {
    fn default() -> Self {
        Self {
            draft: D::blank(),
            mode: FormMode::Creating,
            submitting: false,
            message: None,
        }
    }
}

impl<D: AutoFill> FormController<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn mode(&self) -> FormMode<RecordId<D>> {
        self.mode
    }

    pub fn editing_id(&self) -> Option<RecordId<D>> {
        match self.mode {
            FormMode::Editing(id) => Some(id),
            FormMode::Creating => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id().is_some()
    }

    pub fn begin_create(&mut self) {
        self.draft = D::blank();
        self.mode = FormMode::Creating;
    }

    pub fn begin_edit(&mut self, record: &D::Record) {
        self.draft = D::from_record(record);
        self.mode = FormMode::Editing(record.id());
    }

    /// Applies a user edit. Derived fields are refused; auto-fill rules run
    /// after the raw value is stored.
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<String>,
        lookups: &Lookups<'_>,
    ) -> ValidationResult<()> {
        if let Some(derived) = D::DERIVED.iter().copied().find(|field| *field == name) {
            return Err(ValidationError::ReadOnlyField(derived));
        }
        let slot = self
            .draft
            .field_mut(name)
            .ok_or_else(|| ValidationError::UnknownField {
                entity: D::Record::RESOURCE.singular(),
                field: name.to_owned(),
            })?;
        *slot = value.into();
        self.draft.after_change(name, lookups);
        Ok(())
    }

    /// Marks a submission in flight. Returns false if one already is.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.message = None;
        true
    }

    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }
}
