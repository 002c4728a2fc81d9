// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_app::{
    Appointment, AppointmentDraft, BackendError, Case, CaseDraft, CaseStatus, Client, ClientDraft,
    ClientId, Draft, EntityStore, FailurePolicy, FormController, Lawyer, LawyerDraft, LawyerId,
    Lookups, Resource, ValidationError,
};
use docket_sync::{Deleted, Screen, SubmitOptions, Submitted, SyncError, Workspace, delete, submit};
use docket_testkit::{FakeBackend, Operation};
use serde_json::Value;
use time::{Date, Month};

fn today() -> Date {
    Date::from_calendar_date(2026, Month::October, 19).expect("valid date")
}

fn no_refresh() -> SubmitOptions {
    SubmitOptions {
        refresh: false,
        today: today(),
        policy: FailurePolicy::KeepPrevious,
    }
}

fn client(id: i64, name: &str, lawyer: Option<i64>) -> Client {
    Client {
        id: ClientId::new(id),
        name: name.to_owned(),
        email: Some(format!("{}@example.com", name.to_ascii_lowercase())),
        phone: Some("555-0100".to_owned()),
        address: Some("1 Elm".to_owned()),
        lawyer_id: lawyer.map(LawyerId::new),
    }
}

fn lawyer(id: i64, name: &str) -> Lawyer {
    Lawyer {
        id: LawyerId::new(id),
        name: name.to_owned(),
        email: format!("{}@firm.test", name.to_ascii_lowercase()),
        experience_years: Some(10),
        cases_won: Some(4),
        cases_lost: Some(1),
        phone: None,
        address: None,
        date_of_birth: Some("1980-02-01".to_owned()),
        specialization: Some("Tax".to_owned()),
    }
}

fn case(id: i64, title: &str, client: i64) -> Case {
    Case {
        id: docket_app::CaseId::new(id),
        title: title.to_owned(),
        description: "matter".to_owned(),
        status: CaseStatus::Open,
        client_id: Some(ClientId::new(client)),
        lawyer_id: None,
    }
}

fn filled_client_form(name: &str) -> FormController<ClientDraft> {
    let email = format!("{}@example.com", name.to_ascii_lowercase());
    let mut form = FormController::new();
    for (field, value) in [
        ("name", name),
        ("email", email.as_str()),
        ("phone", "555-0100"),
        ("address", "1 Elm"),
        ("lawyer_id", "7"),
    ] {
        form.set_field(field, value, &Lookups::default())
            .expect("client field");
    }
    form
}

#[test]
fn create_appends_record_with_server_assigned_id() {
    let backend = FakeBackend::new();
    backend.insert(&client(41, "Existing", None));
    let mut store = EntityStore::from_records(backend.records::<Client>());
    let mut form = filled_client_form("Ada");

    let submitted = submit(&backend, &mut form, &mut store, no_refresh()).expect("create");

    let created = submitted.record().expect("server echoed the record").clone();
    assert_eq!(created.id, ClientId::new(42));
    let matches = store
        .records()
        .iter()
        .filter(|record| record.id == created.id)
        .count();
    assert_eq!(matches, 1);
    assert_eq!(store.len(), 2);
    assert_eq!(form.draft(), &ClientDraft::blank());
    assert_eq!(form.message(), Some("Client added successfully"));
}

#[test]
fn update_stores_server_record_not_draft() {
    let backend = FakeBackend::new();
    backend.insert(&client(1, "Ada", None));
    backend.insert(&client(2, "Bo", None));
    backend.on_write(Resource::Clients, |row| {
        if let Some(Value::String(name)) = row.get_mut("name") {
            *name = name.to_uppercase();
        }
    });
    let mut store = EntityStore::from_records(backend.records::<Client>());
    let mut form: FormController<ClientDraft> = FormController::new();
    form.begin_edit(&client(2, "Bo", Some(7)));
    form.set_field("name", "Beau", &Lookups::default())
        .expect("rename");

    let submitted = submit(&backend, &mut form, &mut store, no_refresh()).expect("update");

    assert!(matches!(submitted, Submitted::Updated(Some(_))));
    let with_id: Vec<&Client> = store
        .records()
        .iter()
        .filter(|record| record.id == ClientId::new(2))
        .collect();
    assert_eq!(with_id.len(), 1);
    assert_eq!(with_id[0].name, "BEAU");
    assert!(!form.is_editing());
}

#[test]
fn failed_submit_keeps_store_and_draft() {
    let backend = FakeBackend::new();
    backend.fail(
        Resource::Clients,
        Operation::Create,
        BackendError::Rejected {
            status: 400,
            message: Some("Email already registered".to_owned()),
        },
    );
    let mut store = EntityStore::from_records(vec![client(1, "Ada", None)]);
    let before = store.clone();
    let mut form = filled_client_form("Bo");
    let draft = form.draft().clone();

    let error = submit(&backend, &mut form, &mut store, no_refresh()).expect_err("rejected");

    assert_eq!(error.user_message(), "Email already registered");
    assert_eq!(store, before);
    assert_eq!(form.draft(), &draft);
    assert_eq!(form.message(), Some("Email already registered"));
    assert!(!form.is_submitting());
}

#[test]
fn client_without_lawyer_is_never_sent() {
    let backend = FakeBackend::new();
    let mut store: EntityStore<Client> = EntityStore::new();
    let mut form = filled_client_form("Ada");
    form.set_field("lawyer_id", "", &Lookups::default())
        .expect("clear lawyer");

    let error = submit(&backend, &mut form, &mut store, no_refresh()).expect_err("no lawyer");

    assert_eq!(
        error,
        SyncError::Invalid(ValidationError::MissingField("lawyer_id"))
    );
    assert_eq!(backend.count_calls(Operation::Create), 0);
    assert!(store.is_empty());
    assert_eq!(form.draft().name, "Ada");
}

#[test]
fn network_failure_uses_generic_message() {
    let backend = FakeBackend::new();
    backend.fail(
        Resource::Clients,
        Operation::Create,
        BackendError::Network("connection refused".to_owned()),
    );
    let mut store = EntityStore::new();
    let mut form = filled_client_form("Bo");

    let error = submit(&backend, &mut form, &mut store, no_refresh()).expect_err("offline");
    assert_eq!(error.user_message(), "Failed to save client");
    assert!(store.is_empty());
}

#[test]
fn validation_failure_never_reaches_backend() {
    let backend = FakeBackend::new();
    let mut store: EntityStore<Lawyer> = EntityStore::new();
    let mut form: FormController<LawyerDraft> = FormController::new();
    for (field, value) in [
        ("name", "Young"),
        ("email", "young@firm.test"),
        ("experience_years", "1"),
        ("cases_won", "0"),
        ("cases_lost", "0"),
        ("phone", "555"),
        ("address", "1 Main"),
        ("date_of_birth", "2001-11-19"),
        ("specialization", "Tax"),
    ] {
        form.set_field(field, value, &Lookups::default())
            .expect("lawyer field");
    }

    let error = submit(&backend, &mut form, &mut store, no_refresh()).expect_err("too young");

    assert_eq!(
        error,
        SyncError::Invalid(ValidationError::LawyerTooYoung { age: 24 })
    );
    assert!(backend.calls().is_empty());
    assert_eq!(form.draft().name, "Young");
}

#[test]
fn appointment_outside_office_hours_is_blocked() {
    let backend = FakeBackend::new();
    backend.insert(&client(1, "Ada", Some(7)));
    backend.insert(&case(3, "Lease", 1));
    let mut workspace = Workspace::new();
    workspace.load_screen(&backend, Screen::Appointments);

    let mut form: FormController<AppointmentDraft> = FormController::new();
    let lookups = workspace.lookups();
    form.set_field("client_id", "1", &lookups).expect("client");
    form.set_field("date", "2026-11-02", &lookups).expect("date");
    form.set_field("time", "18:00", &lookups).expect("time");

    let error = submit(
        &backend,
        &mut form,
        &mut workspace.appointments,
        no_refresh(),
    )
    .expect_err("after hours");
    assert!(matches!(
        error,
        SyncError::Invalid(ValidationError::OutsideOfficeHours(_))
    ));
    assert_eq!(backend.count_calls(Operation::Create), 0);
}

#[test]
fn appointment_flow_sends_autofilled_references() {
    let backend = FakeBackend::new();
    backend.insert(&lawyer(7, "Lee"));
    backend.insert(&client(1, "Ada", Some(7)));
    backend.insert(&case(3, "Lease", 1));
    backend.insert(&case(4, "Will", 1));
    let mut workspace = Workspace::new();
    let report = workspace.load_screen(&backend, Screen::Appointments);
    assert!(report.is_complete());

    let mut form: FormController<AppointmentDraft> = FormController::new();
    let lookups = workspace.lookups();
    form.set_field("client_id", "1", &lookups).expect("client");
    form.set_field("date", "2026-11-02", &lookups).expect("date");
    form.set_field("time", "10:30", &lookups).expect("time");
    assert_eq!(form.draft().lawyer_id, "7");
    assert_eq!(form.draft().case_id, "3");

    submit(
        &backend,
        &mut form,
        &mut workspace.appointments,
        no_refresh(),
    )
    .expect("create appointment");

    let stored = backend.records::<Appointment>();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].lawyer_id, Some(LawyerId::new(7)));
    assert_eq!(stored[0].case_id, Some(docket_app::CaseId::new(3)));
    assert_eq!(stored[0].time, "10:30:00");
    assert_eq!(workspace.appointments.records(), stored.as_slice());
}

#[test]
fn case_lawyer_comes_from_client() {
    let backend = FakeBackend::new();
    backend.insert(&client(1, "Ada", Some(9)));
    let mut workspace = Workspace::new();
    workspace.load_screen(&backend, Screen::Cases);

    let mut form: FormController<CaseDraft> = FormController::new();
    let lookups = workspace.lookups();
    for (field, value) in [
        ("title", "Lease"),
        ("description", "Dispute"),
        ("status", "Open"),
        ("client_id", "1"),
    ] {
        form.set_field(field, value, &lookups).expect("case field");
    }
    submit(&backend, &mut form, &mut workspace.cases, no_refresh()).expect("create case");

    assert_eq!(
        workspace.cases.records()[0].lawyer_id,
        Some(LawyerId::new(9))
    );
}

#[test]
fn acknowledged_create_is_picked_up_by_refresh() {
    let backend = FakeBackend::new();
    backend.acknowledge_only(true);
    let mut store = EntityStore::new();

    let mut form = filled_client_form("Ada");
    let submitted = submit(&backend, &mut form, &mut store, no_refresh()).expect("create");
    assert_eq!(submitted, Submitted::Created(None));
    assert!(store.is_empty());

    let mut form = filled_client_form("Bo");
    let options = SubmitOptions {
        refresh: true,
        ..no_refresh()
    };
    submit(&backend, &mut form, &mut store, options).expect("create");
    let names: Vec<&str> = store.records().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Bo"]);
    assert_eq!(backend.count_calls(Operation::List), 1);
}

#[test]
fn failed_refresh_after_submit_follows_failure_policy() {
    for (policy, kept) in [(FailurePolicy::KeepPrevious, 2), (FailurePolicy::Clear, 0)] {
        let backend = FakeBackend::new();
        backend.insert(&client(1, "Ada", Some(7)));
        backend.fail(
            Resource::Clients,
            Operation::List,
            BackendError::Network("timed out".to_owned()),
        );
        let mut store = EntityStore::from_records(backend.records::<Client>());
        let mut form = filled_client_form("Bo");
        let options = SubmitOptions {
            refresh: true,
            policy,
            ..no_refresh()
        };

        submit(&backend, &mut form, &mut store, options).expect("write succeeds");

        assert_eq!(store.len(), kept, "{policy:?}");
        assert_eq!(store.error(), Some("Failed to fetch clients"));
        assert_eq!(backend.count_calls(Operation::Create), 1);
    }
}

#[test]
fn confirmed_delete_removes_exactly_one() {
    let backend = FakeBackend::new();
    backend.insert(&client(1, "Ada", None));
    backend.insert(&client(2, "Bo", None));
    let mut store = EntityStore::from_records(backend.records::<Client>());
    let mut prompts = Vec::new();

    let outcome = delete(&backend, &mut store, ClientId::new(1), &mut |prompt: &str| {
        prompts.push(prompt.to_owned());
        true
    })
    .expect("delete");

    assert_eq!(outcome, Deleted::Removed);
    assert_eq!(prompts, vec!["Delete client 1?".to_owned()]);
    assert_eq!(store.len(), 1);
    assert!(store.find(ClientId::new(1)).is_none());
    assert_eq!(backend.count_calls(Operation::List), 0);
}

#[test]
fn declined_delete_does_nothing() {
    let backend = FakeBackend::new();
    backend.insert(&client(1, "Ada", None));
    let mut store = EntityStore::from_records(backend.records::<Client>());

    let outcome =
        delete(&backend, &mut store, ClientId::new(1), &mut |_: &str| false).expect("declined");

    assert_eq!(outcome, Deleted::Declined);
    assert_eq!(store.len(), 1);
    assert!(backend.calls().is_empty());
}

#[test]
fn failed_delete_leaves_store_untouched() {
    let backend = FakeBackend::new();
    let mut store = EntityStore::from_records(vec![client(5, "Ada", None)]);

    let error =
        delete(&backend, &mut store, ClientId::new(5), &mut |_: &str| true).expect_err("404");

    assert_eq!(error.user_message(), "Client not found");
    assert_eq!(store.len(), 1);
}

#[test]
fn deleting_client_leaves_dangling_case_reference() {
    let backend = FakeBackend::new();
    backend.insert(&client(1, "Ada", None));
    backend.insert(&case(3, "Lease", 1));
    let mut workspace = Workspace::new();
    workspace.load_screen(&backend, Screen::Cases);

    delete(
        &backend,
        &mut workspace.clients,
        ClientId::new(1),
        &mut |_: &str| true,
    )
    .expect("delete client");

    let case = &workspace.cases.records()[0];
    assert_eq!(
        docket_app::resolve_name(&workspace.clients, case.client_id),
        docket_app::NOT_ASSIGNED
    );
}

#[test]
fn partial_load_failure_is_tracked_per_store() {
    let backend = FakeBackend::new();
    backend.insert(&client(1, "Ada", None));
    backend.fail(
        Resource::Lawyers,
        Operation::List,
        BackendError::Network("timed out".to_owned()),
    );
    let mut workspace = Workspace::new();

    let report = workspace.load_screen(&backend, Screen::Clients);

    assert!(!workspace.is_loading());
    assert_eq!(workspace.clients.len(), 1);
    assert!(workspace.lawyers.is_empty());
    assert_eq!(workspace.lawyers.error(), Some("Failed to fetch lawyers"));
    assert_eq!(workspace.error(), Some("Failed to fetch lawyers"));
    assert_eq!(report.loaded, vec![Resource::Clients]);
    assert_eq!(report.failed.len(), 1);
}

#[test]
fn failed_reload_keeps_previous_records() {
    let backend = FakeBackend::new();
    backend.insert(&client(1, "Ada", None));
    let mut workspace = Workspace::new();
    workspace.load_screen(&backend, Screen::Clients);
    assert_eq!(workspace.clients.len(), 1);

    backend.fail(
        Resource::Clients,
        Operation::List,
        BackendError::Rejected {
            status: 500,
            message: None,
        },
    );
    workspace.load_screen(&backend, Screen::Clients);
    assert_eq!(workspace.clients.len(), 1);
    assert_eq!(workspace.clients.error(), Some("Failed to fetch clients"));

    backend.clear_failures();
    workspace.load_screen(&backend, Screen::Clients);
    assert_eq!(workspace.clients.error(), None);
    assert_eq!(workspace.error(), None);
}

#[test]
fn dashboard_screen_loads_summary_only() {
    let backend = FakeBackend::demo(5);
    let mut workspace = Workspace::new();

    let report = workspace.load_screen(&backend, Screen::Dashboard);

    assert!(report.is_complete());
    let summary = workspace.dashboard.clone().expect("dashboard loaded");
    assert_eq!(summary.total_clients, 8);
    assert!(workspace.clients.is_empty());
    assert_eq!(backend.count_calls(Operation::List), 0);
}

#[test]
fn dashboard_failure_sets_error() {
    let backend = FakeBackend::new();
    backend.fail_dashboard(BackendError::Network("down".to_owned()));
    let mut workspace = Workspace::new();

    let report = workspace.load_screen(&backend, Screen::Dashboard);

    assert!(report.dashboard_error.is_some());
    assert_eq!(workspace.error(), Some("Failed to fetch dashboard data"));
    assert!(workspace.dashboard.is_none());
}
