// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_app::{
    AppointmentStatus, Backend, BackendError, BackendResult, CaseStatus, DashboardSummary,
    EntityId, Record, Resource, ScheduleStatus,
};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use time::macros::date;
use time::{Date, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
    Dashboard,
}

/// One request observed by a [`FakeBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    pub resource: Option<Resource>,
    pub id: Option<i64>,
}

type WriteHook = Arc<dyn Fn(&mut Map<String, Value>) + Send + Sync>;

#[derive(Default)]
struct State {
    tables: HashMap<Resource, Vec<Map<String, Value>>>,
    next_id: HashMap<Resource, i64>,
    failures: HashMap<(Option<Resource>, Operation), BackendError>,
    hooks: HashMap<Resource, WriteHook>,
    acknowledge_only: bool,
    dashboard: Option<DashboardSummary>,
    calls: Vec<Call>,
}

/// In-memory backend that assigns ids the way the real server does.
///
/// Failures are scripted per resource and operation and stay in place until
/// [`FakeBackend::clear_failures`].
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend preloaded with [`OfficeFaker`] demo data.
    pub fn demo(seed: u64) -> Self {
        let backend = Self::new();
        OfficeFaker::new(seed).populate(&backend);
        backend
    }

    /// Stores `record` as-is, keeping its id.
    pub fn insert<T: Record>(&self, record: &T) {
        let Value::Object(row) = serde_json::to_value(record).unwrap_or(Value::Null) else {
            return;
        };
        let id = record.id().get();
        let mut state = self.lock();
        let next = state.next_id.entry(T::RESOURCE).or_insert(1);
        *next = (*next).max(id + 1);
        state.tables.entry(T::RESOURCE).or_default().push(row);
    }

    /// Stores a raw wire row and returns the id it was given.
    pub fn insert_row(&self, resource: Resource, row: Value) -> i64 {
        let mut state = self.lock();
        let mut row = match row {
            Value::Object(row) => row,
            _ => Map::new(),
        };
        let id = state.allocate_id(resource);
        row.insert(resource.id_key().to_owned(), Value::from(id));
        state.tables.entry(resource).or_default().push(row);
        id
    }

    pub fn fail(&self, resource: Resource, operation: Operation, error: BackendError) {
        self.lock()
            .failures
            .insert((Some(resource), operation), error);
    }

    pub fn fail_dashboard(&self, error: BackendError) {
        self.lock()
            .failures
            .insert((None, Operation::Dashboard), error);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Makes creates and updates answer with a bare acknowledgement.
    pub fn acknowledge_only(&self, enabled: bool) {
        self.lock().acknowledge_only = enabled;
    }

    /// Runs `hook` on every row the server persists for `resource`.
    pub fn on_write(
        &self,
        resource: Resource,
        hook: impl Fn(&mut Map<String, Value>) + Send + Sync + 'static,
    ) {
        self.lock().hooks.insert(resource, Arc::new(hook));
    }

    pub fn set_dashboard(&self, summary: DashboardSummary) {
        self.lock().dashboard = Some(summary);
    }

    /// Server-side snapshot of `T`'s table.
    pub fn records<T: Record>(&self) -> Vec<T> {
        self.lock()
            .tables
            .get(&T::RESOURCE)
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| serde_json::from_value(Value::Object(row.clone())).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn count_calls(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation == operation)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(
        &self,
        operation: Operation,
        resource: Option<Resource>,
        id: Option<i64>,
    ) -> BackendResult<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls.push(Call {
            operation,
            resource,
            id,
        });
        if let Some(error) = state.failures.get(&(resource, operation)).cloned() {
            return Err(error);
        }
        Ok(state)
    }
}

impl State {
    fn allocate_id(&mut self, resource: Resource) -> i64 {
        let next = self.next_id.entry(resource).or_insert(1);
        let id = *next;
        *next += 1;
        id
    }

    fn position(&self, resource: Resource, id: i64) -> Option<usize> {
        self.tables.get(&resource)?.iter().position(|row| {
            row.get(resource.id_key()).and_then(Value::as_i64) == Some(id)
        })
    }

    fn persist(&self, resource: Resource, mut row: Map<String, Value>) -> Map<String, Value> {
        if let Some(hook) = self.hooks.get(&resource) {
            hook(&mut row);
        }
        row
    }
}

fn object(payload: &Value) -> BackendResult<Map<String, Value>> {
    match payload {
        Value::Object(map) => Ok(map.clone()),
        _ => Err(BackendError::Rejected {
            status: 400,
            message: Some("request body must be a JSON object".to_owned()),
        }),
    }
}

fn decode<T: Record>(row: &Map<String, Value>) -> BackendResult<T> {
    serde_json::from_value(Value::Object(row.clone())).map_err(|error| BackendError::Rejected {
        status: 400,
        message: Some(format!("invalid {}: {error}", T::RESOURCE.singular())),
    })
}

fn not_found(resource: Resource) -> BackendError {
    let mut noun = resource.singular().to_owned();
    if let Some(first) = noun.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    BackendError::Rejected {
        status: 404,
        message: Some(format!("{noun} not found")),
    }
}

impl Backend for FakeBackend {
    fn list<T: Record>(&self) -> BackendResult<Vec<T>> {
        let state = self.begin(Operation::List, Some(T::RESOURCE), None)?;
        state
            .tables
            .get(&T::RESOURCE)
            .map(|rows| rows.iter().map(decode::<T>).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn create<T: Record>(&self, payload: &Value) -> BackendResult<Option<T>> {
        let mut state = self.begin(Operation::Create, Some(T::RESOURCE), None)?;
        let mut row = object(payload)?;
        let resource = T::RESOURCE;
        let next = state.next_id.get(&resource).copied().unwrap_or(1);
        row.insert(resource.id_key().to_owned(), Value::from(next));
        let row = state.persist(resource, row);
        let record = decode::<T>(&row)?;
        state.allocate_id(resource);
        state.tables.entry(resource).or_default().push(row);
        if state.acknowledge_only {
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn update<T: Record>(&self, id: T::Id, payload: &Value) -> BackendResult<Option<T>> {
        let resource = T::RESOURCE;
        let mut state = self.begin(Operation::Update, Some(resource), Some(id.get()))?;
        let index = state
            .position(resource, id.get())
            .ok_or_else(|| not_found(resource))?;
        let mut row = object(payload)?;
        row.insert(resource.id_key().to_owned(), Value::from(id.get()));
        let row = state.persist(resource, row);
        let record = decode::<T>(&row)?;
        if let Some(rows) = state.tables.get_mut(&resource) {
            rows[index] = row;
        }
        if state.acknowledge_only {
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn delete<T: Record>(&self, id: T::Id) -> BackendResult<()> {
        let resource = T::RESOURCE;
        let mut state = self.begin(Operation::Delete, Some(resource), Some(id.get()))?;
        let index = state
            .position(resource, id.get())
            .ok_or_else(|| not_found(resource))?;
        if let Some(rows) = state.tables.get_mut(&resource) {
            rows.remove(index);
        }
        Ok(())
    }

    fn dashboard(&self) -> BackendResult<DashboardSummary> {
        let state = self.begin(Operation::Dashboard, None, None)?;
        if let Some(summary) = &state.dashboard {
            return Ok(summary.clone());
        }
        let count = |resource: Resource| state.tables.get(&resource).map_or(0, Vec::len) as u64;
        let cases_with = |status: CaseStatus| {
            state.tables.get(&Resource::Cases).map_or(0, |rows| {
                rows.iter()
                    .filter(|row| row.get("status").and_then(Value::as_str) == Some(status.as_str()))
                    .count()
            }) as u64
        };
        Ok(DashboardSummary {
            total_clients: count(Resource::Clients),
            total_cases: count(Resource::Cases),
            important_cases: cases_with(CaseStatus::AwaitingJudgment),
            archived_cases: cases_with(CaseStatus::Closed),
        })
    }
}

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const STREET_NAMES: [&str; 10] = [
    "Cedar", "Maple", "Oak", "Pine", "Willow", "Elm", "Birch", "Juniper", "Ridge", "Meadow",
];
const SPECIALIZATIONS: [&str; 8] = [
    "Family Law",
    "Criminal Defense",
    "Corporate",
    "Real Estate",
    "Immigration",
    "Intellectual Property",
    "Employment",
    "Estate Planning",
];
const CASE_MATTERS: [&str; 10] = [
    "Lease Dispute",
    "Custody Review",
    "Contract Breach",
    "Estate Settlement",
    "Zoning Appeal",
    "Wrongful Termination",
    "Patent Filing",
    "Visa Petition",
    "Insurance Claim",
    "Partnership Dissolution",
];
const COURTS: [&str; 6] = [
    "District Court",
    "County Court",
    "Superior Court",
    "Family Court",
    "Court of Appeals",
    "Probate Court",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn pick<'a>(&mut self, values: &[&'a str]) -> &'a str {
        values[self.int_n(values.len())]
    }
}

/// Seeded generator of plausible law-office records.
#[derive(Debug, Clone)]
pub struct OfficeFaker {
    rng: DeterministicRng,
    reference: Date,
}

impl OfficeFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            reference: date!(2026 - 01 - 05),
        }
    }

    pub fn person_name(&mut self) -> String {
        format!(
            "{} {}",
            self.rng.pick(&FIRST_NAMES),
            self.rng.pick(&LAST_NAMES)
        )
    }

    fn contact(&mut self, name: &str) -> (String, String, String) {
        let email = format!("{}@example.com", name.to_ascii_lowercase().replace(' ', "."));
        let phone = format!(
            "555-{:03}-{:04}",
            self.rng.int_n(1000),
            self.rng.int_n(10_000)
        );
        let address = format!(
            "{} {} St",
            100 + self.rng.int_n(9_900),
            self.rng.pick(&STREET_NAMES)
        );
        (email, phone, address)
    }

    /// Wire row for a lawyer aged 28 to 65 on the reference date.
    pub fn lawyer(&mut self) -> Value {
        let name = self.person_name();
        let (email, phone, address) = self.contact(&name);
        let age_days = (28 + self.rng.int_n(38)) as i64 * 366;
        let birth = self.reference - Duration::days(age_days);
        let won = self.rng.int_n(120);
        json!({
            "name": name,
            "email": email,
            "experience_years": 1 + self.rng.int_n(30),
            "cases_won": won,
            "cases_lost": self.rng.int_n(won / 2 + 1),
            "phone": phone,
            "address": address,
            "date_of_birth": birth.to_string(),
            "specialization": self.rng.pick(&SPECIALIZATIONS),
        })
    }

    pub fn client(&mut self, lawyer_id: Option<i64>) -> Value {
        let name = self.person_name();
        let (email, phone, address) = self.contact(&name);
        json!({
            "name": name,
            "email": email,
            "phone": phone,
            "address": address,
            "lawyer_id": lawyer_id,
        })
    }

    pub fn case(&mut self, client_id: i64, lawyer_id: Option<i64>) -> Value {
        let status = CaseStatus::ALL[self.rng.int_n(CaseStatus::ALL.len())];
        let matter = self.rng.pick(&CASE_MATTERS);
        json!({
            "title": matter,
            "description": format!("{matter} opened for client {client_id}"),
            "status": status.as_str(),
            "client_id": client_id,
            "lawyer_id": lawyer_id,
        })
    }

    fn future_date(&mut self) -> String {
        (self.reference + Duration::days(1 + self.rng.int_n(90) as i64)).to_string()
    }

    fn office_time(&mut self) -> String {
        format!(
            "{:02}:{:02}:00",
            9 + self.rng.int_n(9),
            [0, 15, 30, 45][self.rng.int_n(4)]
        )
    }

    pub fn appointment(&mut self, client_id: i64, lawyer_id: Option<i64>, case_id: i64) -> Value {
        let status = AppointmentStatus::ALL[self.rng.int_n(AppointmentStatus::ALL.len())];
        json!({
            "client_id": client_id,
            "lawyer_id": lawyer_id,
            "case_id": case_id,
            "appointment_date": self.future_date(),
            "appointment_time": self.office_time(),
            "appointment_status": status.as_str(),
        })
    }

    pub fn schedule(&mut self) -> Value {
        let status = ScheduleStatus::ALL[self.rng.int_n(ScheduleStatus::ALL.len())];
        let court = self.rng.pick(&COURTS);
        json!({
            "date": self.future_date(),
            "time": self.office_time(),
            "court": court,
            "appointment": format!("Hearing before the {court}"),
            "status": status.as_str(),
        })
    }

    /// Fills every table of `backend` with a small, referentially intact office.
    pub fn populate(&mut self, backend: &FakeBackend) {
        let lawyers: Vec<i64> = (0..4)
            .map(|_| backend.insert_row(Resource::Lawyers, self.lawyer()))
            .collect();
        for _ in 0..8 {
            let lawyer = Some(lawyers[self.rng.int_n(lawyers.len())]);
            let client = backend.insert_row(Resource::Clients, self.client(lawyer));
            let cases = 1 + self.rng.int_n(3);
            for _ in 0..cases {
                let case = backend.insert_row(Resource::Cases, self.case(client, lawyer));
                if self.rng.int_n(2) == 0 {
                    backend.insert_row(
                        Resource::Appointments,
                        self.appointment(client, lawyer, case),
                    );
                }
            }
        }
        for _ in 0..5 {
            backend.insert_row(Resource::Schedules, self.schedule());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FakeBackend, OfficeFaker, Operation};
    use docket_app::{
        Appointment, Backend, BackendError, Case, Client, ClientDraft, ClientId, Draft, Lawyer,
        Resource, Schedule, validation::{MINIMUM_LAWYER_AGE, age_on, parse_date, validate_appointment_time},
    };
    use serde_json::json;
    use time::{Date, Month};

    #[test]
    fn create_assigns_increasing_ids() {
        let backend = FakeBackend::new();
        let first: Client = backend
            .create(&json!({"name": "Ann"}))
            .expect("create")
            .expect("record echoed");
        let second: Client = backend
            .create(&json!({"name": "Bo", "client_id": 99}))
            .expect("create")
            .expect("record echoed");
        assert_eq!(first.id, ClientId::new(1));
        assert_eq!(second.id, ClientId::new(2));
    }

    #[test]
    fn scripted_failure_is_returned_and_logged() {
        let backend = FakeBackend::new();
        backend.fail(
            Resource::Lawyers,
            Operation::List,
            BackendError::Network("refused".to_owned()),
        );
        let error = backend.list::<Lawyer>().expect_err("scripted failure");
        assert_eq!(error, BackendError::Network("refused".to_owned()));
        assert_eq!(backend.count_calls(Operation::List), 1);

        backend.clear_failures();
        assert!(backend.list::<Lawyer>().expect("list").is_empty());
    }

    #[test]
    fn update_and_delete_of_missing_record_are_rejected() {
        let backend = FakeBackend::new();
        let error = backend
            .delete::<Client>(ClientId::new(3))
            .expect_err("missing");
        assert_eq!(error.user_message("generic"), "Client not found");
    }

    #[test]
    fn demo_data_is_deterministic_and_consistent() {
        let left = FakeBackend::demo(7);
        let right = FakeBackend::demo(7);
        assert_eq!(left.records::<Client>(), right.records::<Client>());

        let clients = left.records::<Client>();
        let cases = left.records::<Case>();
        assert_eq!(clients.len(), 8);
        assert!(cases.len() >= clients.len());
        assert!(
            cases
                .iter()
                .all(|case| clients.iter().any(|client| Some(client.id) == case.client_id))
        );
        assert_eq!(left.records::<Schedule>().len(), 5);
    }

    #[test]
    fn demo_values_pass_form_rules() {
        let backend = FakeBackend::demo(11);
        let today = Date::from_calendar_date(2026, Month::January, 5).expect("date");
        for lawyer in backend.records::<Lawyer>() {
            let dob = lawyer.date_of_birth.expect("demo lawyers have a birth date");
            let birth = parse_date(&dob).expect("demo birth date parses");
            assert!(age_on(birth, today) >= MINIMUM_LAWYER_AGE);
        }
        for client in backend.records::<Client>() {
            assert!(ClientDraft::from_record(&client).validate(today).is_ok());
        }
        for appointment in backend.records::<Appointment>() {
            assert!(validate_appointment_time(&appointment.time).is_ok());
        }
    }

    #[test]
    fn person_names_come_from_the_name_lists() {
        let mut faker = OfficeFaker::new(3);
        let name = faker.person_name();
        assert_eq!(name.split(' ').count(), 2);
    }
}
