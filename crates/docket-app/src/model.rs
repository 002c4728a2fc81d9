// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Clients,
    Lawyers,
    Cases,
    Appointments,
    Schedules,
}

impl Resource {
    pub const ALL: [Self; 5] = [
        Self::Clients,
        Self::Lawyers,
        Self::Cases,
        Self::Appointments,
        Self::Schedules,
    ];

    /// Collection path segment on the backend.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Lawyers => "lawyers",
            Self::Cases => "cases",
            Self::Appointments => "appointments",
            Self::Schedules => "lawyer-schedule",
        }
    }

    pub const fn singular(self) -> &'static str {
        match self {
            Self::Clients => "client",
            Self::Lawyers => "lawyer",
            Self::Cases => "case",
            Self::Appointments => "appointment",
            Self::Schedules => "schedule",
        }
    }

    /// Primary-key field name in wire records.
    pub const fn id_key(self) -> &'static str {
        match self {
            Self::Clients => "client_id",
            Self::Lawyers => "lawyer_id",
            Self::Cases => "case_id",
            Self::Appointments => "appointment_id",
            Self::Schedules => "schedule_id",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Lawyers => "lawyers",
            Self::Cases => "cases",
            Self::Appointments => "appointments",
            Self::Schedules => "schedules",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "client" | "clients" => Some(Self::Clients),
            "lawyer" | "lawyers" => Some(Self::Lawyers),
            "case" | "cases" => Some(Self::Cases),
            "appointment" | "appointments" => Some(Self::Appointments),
            "schedule" | "schedules" | "lawyer-schedule" => Some(Self::Schedules),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A server-owned record held in an entity store.
pub trait Record:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Id: EntityId;

    const RESOURCE: Resource;

    fn id(&self) -> Self::Id;

    /// Name shown when another record references this one (title for cases).
    fn display_name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Awaiting Judgment")]
    AwaitingJudgment,
}

impl CaseStatus {
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::InProgress,
        Self::Closed,
        Self::UnderReview,
        Self::AwaitingJudgment,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
            Self::UnderReview => "Under Review",
            Self::AwaitingJudgment => "Awaiting Judgment",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [Self; 3] = [Self::Scheduled, Self::Completed, Self::Cancelled];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScheduleStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl ScheduleStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::Completed, Self::Cancelled];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "client_id")]
    pub id: ClientId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lawyer_id: Option<LawyerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lawyer {
    #[serde(rename = "lawyer_id")]
    pub id: LawyerId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub experience_years: Option<i64>,
    #[serde(default)]
    pub cases_won: Option<i64>,
    #[serde(default)]
    pub cases_lost: Option<i64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    #[serde(rename = "case_id")]
    pub id: CaseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: CaseStatus,
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub lawyer_id: Option<LawyerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "appointment_id")]
    pub id: AppointmentId,
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub lawyer_id: Option<LawyerId>,
    #[serde(default)]
    pub case_id: Option<CaseId>,
    #[serde(rename = "appointment_date")]
    pub date: String,
    #[serde(rename = "appointment_time")]
    pub time: String,
    #[serde(rename = "appointment_status", default)]
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(rename = "schedule_id")]
    pub id: ScheduleId,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub court: String,
    #[serde(default)]
    pub appointment: String,
    #[serde(default)]
    pub status: ScheduleStatus,
}

impl Record for Client {
    type Id = ClientId;
    const RESOURCE: Resource = Resource::Clients;

    fn id(&self) -> ClientId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Record for Lawyer {
    type Id = LawyerId;
    const RESOURCE: Resource = Resource::Lawyers;

    fn id(&self) -> LawyerId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Record for Case {
    type Id = CaseId;
    const RESOURCE: Resource = Resource::Cases;

    fn id(&self) -> CaseId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }
}

impl Record for Appointment {
    type Id = AppointmentId;
    const RESOURCE: Resource = Resource::Appointments;

    fn id(&self) -> AppointmentId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.date
    }
}

impl Record for Schedule {
    type Id = ScheduleId;
    const RESOURCE: Resource = Resource::Schedules;

    fn id(&self) -> ScheduleId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.court
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_clients: u64,
    #[serde(default)]
    pub total_cases: u64,
    #[serde(default)]
    pub important_cases: u64,
    #[serde(default)]
    pub archived_cases: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AdminProfile {
    #[serde(default, alias = "admin_id")]
    pub id: Option<AdminId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Authenticated read-only report tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewTab {
    AllAppointments,
    Cases,
    Appointments,
    Clients,
    Lawyers,
}

impl ViewTab {
    pub const ALL: [Self; 5] = [
        Self::AllAppointments,
        Self::Cases,
        Self::Appointments,
        Self::Clients,
        Self::Lawyers,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::AllAppointments => "all-appointments",
            Self::Cases => "cases",
            Self::Appointments => "appointments",
            Self::Clients => "clients",
            Self::Lawyers => "lawyers",
        }
    }

    pub fn path(self) -> String {
        match self {
            Self::AllAppointments => "all-appointments".to_owned(),
            other => format!("view/{}", other.label()),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.label() == value.trim().to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::{Appointment, AppointmentStatus, Case, CaseStatus, Client, Resource, ViewTab};
    use crate::{AppointmentId, CaseId, ClientId, LawyerId};

    #[test]
    fn case_status_uses_display_strings_on_the_wire() {
        let json = serde_json::to_string(&CaseStatus::AwaitingJudgment).expect("serialize");
        assert_eq!(json, "\"Awaiting Judgment\"");
        assert_eq!(CaseStatus::parse("in progress"), Some(CaseStatus::InProgress));
        assert_eq!(CaseStatus::parse("pending"), None);
    }

    #[test]
    fn client_decodes_backend_shape_with_null_lawyer() {
        let client: Client = serde_json::from_str(
            r#"{"client_id":4,"name":"Ada","email":null,"phone":"555","address":null,"lawyer_id":null}"#,
        )
        .expect("decode client");
        assert_eq!(client.id, ClientId::new(4));
        assert_eq!(client.lawyer_id, None);
        assert_eq!(client.phone.as_deref(), Some("555"));
    }

    #[test]
    fn appointment_decodes_prefixed_wire_fields() {
        let appointment: Appointment = serde_json::from_str(
            r#"{"appointment_id":9,"client_id":1,"lawyer_id":2,"case_id":null,
                "appointment_date":"2026-03-02","appointment_time":"10:30:00",
                "appointment_status":"Completed"}"#,
        )
        .expect("decode appointment");
        assert_eq!(appointment.id, AppointmentId::new(9));
        assert_eq!(appointment.lawyer_id, Some(LawyerId::new(2)));
        assert_eq!(appointment.case_id, None);
        assert_eq!(appointment.time, "10:30:00");
        assert_eq!(appointment.status, AppointmentStatus::Completed);
    }

    #[test]
    fn case_decodes_without_optional_links() {
        let case: Case =
            serde_json::from_str(r#"{"case_id":3,"title":"Lease","status":"Open"}"#)
                .expect("decode case");
        assert_eq!(case.id, CaseId::new(3));
        assert!(case.description.is_empty());
        assert_eq!(case.client_id, None);
    }

    #[test]
    fn resource_parse_accepts_singular_and_plural() {
        assert_eq!(Resource::parse("Case"), Some(Resource::Cases));
        assert_eq!(Resource::parse("schedules"), Some(Resource::Schedules));
        assert_eq!(Resource::Schedules.path(), "lawyer-schedule");
        assert_eq!(Resource::parse("judges"), None);
    }

    #[test]
    fn view_tab_paths() {
        assert_eq!(ViewTab::AllAppointments.path(), "all-appointments");
        assert_eq!(ViewTab::Lawyers.path(), "view/lawyers");
        assert_eq!(ViewTab::parse("CASES"), Some(ViewTab::Cases));
    }
}
