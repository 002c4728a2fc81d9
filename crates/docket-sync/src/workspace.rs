// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_app::{
    Appointment, Backend, BackendError, BackendResult, Case, Client, DashboardSummary,
    EntityStore, FailurePolicy, Lawyer, Lookups, Record, Resource, Schedule,
};
use std::fmt;
use std::thread::{self, ScopedJoinHandle};
use tracing::{debug, warn};

/// One management screen and the stores it needs before it can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Dashboard,
    Clients,
    Lawyers,
    Cases,
    Appointments,
    Schedules,
}

impl Screen {
    pub const ALL: [Self; 6] = [
        Self::Dashboard,
        Self::Clients,
        Self::Lawyers,
        Self::Cases,
        Self::Appointments,
        Self::Schedules,
    ];

    /// Stores loaded together when the screen opens. The first entry is the
    /// screen's own resource; the rest feed name resolution and auto-fill.
    pub const fn resources(self) -> &'static [Resource] {
        match self {
            Self::Dashboard => &[],
            Self::Clients => &[Resource::Clients, Resource::Lawyers],
            Self::Lawyers => &[Resource::Lawyers],
            Self::Cases => &[Resource::Cases, Resource::Clients, Resource::Lawyers],
            Self::Appointments => &[
                Resource::Appointments,
                Resource::Clients,
                Resource::Lawyers,
                Resource::Cases,
            ],
            Self::Schedules => &[Resource::Schedules],
        }
    }

    pub const fn for_resource(resource: Resource) -> Self {
        match resource {
            Resource::Clients => Self::Clients,
            Resource::Lawyers => Self::Lawyers,
            Resource::Cases => Self::Cases,
            Resource::Appointments => Self::Appointments,
            Resource::Schedules => Self::Schedules,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Clients => "clients",
            Self::Lawyers => "lawyers",
            Self::Cases => "cases",
            Self::Appointments => "appointments",
            Self::Schedules => "schedules",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one concurrent load; each fetch is tracked on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<Resource>,
    pub failed: Vec<(Resource, BackendError)>,
    pub dashboard_error: Option<BackendError>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.dashboard_error.is_none()
    }
}

pub fn fetch_failure_message(resource: Resource) -> String {
    format!("Failed to fetch {}", resource.label())
}

/// Fetch-all for a single store, settling it with `policy`.
pub fn load_store<B: Backend, T: Record>(
    backend: &B,
    store: &mut EntityStore<T>,
    policy: FailurePolicy,
) -> BackendResult<()> {
    store.begin_load();
    let outcome = backend.list::<T>();
    settle(store, outcome, policy)
}

fn settle<T: Record>(
    store: &mut EntityStore<T>,
    outcome: BackendResult<Vec<T>>,
    policy: FailurePolicy,
) -> BackendResult<()> {
    let resource = T::RESOURCE;
    let result = match &outcome {
        Ok(records) => {
            debug!(%resource, count = records.len(), "store loaded");
            Ok(())
        }
        Err(error) => {
            warn!(%resource, %error, "store load failed");
            Err(error.clone())
        }
    };
    store.finish_load(outcome, policy, |error| {
        error.user_message(&fetch_failure_message(resource))
    });
    result
}

fn joined<T>(handle: Option<ScopedJoinHandle<'_, BackendResult<T>>>) -> Option<BackendResult<T>> {
    handle.map(|handle| {
        handle
            .join()
            .unwrap_or_else(|_| Err(BackendError::Network("fetch worker panicked".to_owned())))
    })
}

/// Every entity store the application shows, plus the dashboard counts and
/// the loading/error state of the last screen load.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub clients: EntityStore<Client>,
    pub lawyers: EntityStore<Lawyer>,
    pub cases: EntityStore<Case>,
    pub appointments: EntityStore<Appointment>,
    pub schedules: EntityStore<Schedule>,
    pub dashboard: Option<DashboardSummary>,
    pub failure_policy: FailurePolicy,
    loading: bool,
    error: Option<String>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Combined message for the stores that failed in the last load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Client and case stores, as consulted by form auto-fill.
    pub fn lookups(&self) -> Lookups<'_> {
        Lookups::new(&self.clients, &self.cases)
    }

    pub fn load_screen<B: Backend>(&mut self, backend: &B, screen: Screen) -> LoadReport {
        self.load(backend, screen.resources(), screen == Screen::Dashboard)
    }

    /// Fetches `resources` (and the dashboard when asked) concurrently and
    /// returns once every fetch has settled.
    pub fn load<B: Backend>(
        &mut self,
        backend: &B,
        resources: &[Resource],
        with_dashboard: bool,
    ) -> LoadReport {
        let wants = |resource: Resource| resources.contains(&resource);
        let policy = self.failure_policy;
        self.loading = true;
        self.error = None;
        debug!(?resources, with_dashboard, "screen load started");

        let mut report = LoadReport::default();
        thread::scope(|scope| {
            let clients = wants(Resource::Clients).then(|| {
                self.clients.begin_load();
                scope.spawn(move || backend.list::<Client>())
            });
            let lawyers = wants(Resource::Lawyers).then(|| {
                self.lawyers.begin_load();
                scope.spawn(move || backend.list::<Lawyer>())
            });
            let cases = wants(Resource::Cases).then(|| {
                self.cases.begin_load();
                scope.spawn(move || backend.list::<Case>())
            });
            let appointments = wants(Resource::Appointments).then(|| {
                self.appointments.begin_load();
                scope.spawn(move || backend.list::<Appointment>())
            });
            let schedules = wants(Resource::Schedules).then(|| {
                self.schedules.begin_load();
                scope.spawn(move || backend.list::<Schedule>())
            });
            let dashboard = with_dashboard.then(|| scope.spawn(move || backend.dashboard()));

            if let Some(outcome) = joined(clients) {
                let result = settle(&mut self.clients, outcome, policy);
                record(&mut report, result, Resource::Clients);
            }
            if let Some(outcome) = joined(lawyers) {
                let result = settle(&mut self.lawyers, outcome, policy);
                record(&mut report, result, Resource::Lawyers);
            }
            if let Some(outcome) = joined(cases) {
                let result = settle(&mut self.cases, outcome, policy);
                record(&mut report, result, Resource::Cases);
            }
            if let Some(outcome) = joined(appointments) {
                let result = settle(&mut self.appointments, outcome, policy);
                record(&mut report, result, Resource::Appointments);
            }
            if let Some(outcome) = joined(schedules) {
                let result = settle(&mut self.schedules, outcome, policy);
                record(&mut report, result, Resource::Schedules);
            }
            match joined(dashboard) {
                Some(Ok(summary)) => self.dashboard = Some(summary),
                Some(Err(error)) => {
                    warn!(%error, "dashboard load failed");
                    report.dashboard_error = Some(error);
                }
                None => {}
            }
        });

        let mut messages: Vec<String> = report
            .failed
            .iter()
            .map(|(resource, error)| error.user_message(&fetch_failure_message(*resource)))
            .collect();
        if let Some(error) = &report.dashboard_error {
            messages.push(error.user_message("Failed to fetch dashboard data"));
        }
        messages.dedup();
        self.error = (!messages.is_empty()).then(|| messages.join("; "));
        self.loading = false;
        debug!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "screen load settled"
        );
        report
    }
}

/// Record types the workspace holds a store for.
pub trait Stored: Record {
    fn store(workspace: &Workspace) -> &EntityStore<Self>;
    fn store_mut(workspace: &mut Workspace) -> &mut EntityStore<Self>;
}

macro_rules! stored {
    ($record:ty, $field:ident) => {
        impl Stored for $record {
            fn store(workspace: &Workspace) -> &EntityStore<Self> {
                &workspace.$field
            }

            fn store_mut(workspace: &mut Workspace) -> &mut EntityStore<Self> {
                &mut workspace.$field
            }
        }
    };
}

stored!(Client, clients);
stored!(Lawyer, lawyers);
stored!(Case, cases);
stored!(Appointment, appointments);
stored!(Schedule, schedules);

impl Workspace {
    pub fn store<T: Stored>(&self) -> &EntityStore<T> {
        T::store(self)
    }

    pub fn store_mut<T: Stored>(&mut self) -> &mut EntityStore<T> {
        T::store_mut(self)
    }
}

fn record(report: &mut LoadReport, result: BackendResult<()>, resource: Resource) {
    match result {
        Ok(()) => report.loaded.push(resource),
        Err(error) => report.failed.push((resource, error)),
    }
}
