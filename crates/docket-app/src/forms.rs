// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde_json::{Map, Value, json};
use std::fmt;
use time::Date;

use crate::validation::{
    ValidationError, ValidationResult, require_fields, validate_appointment_time,
    validate_lawyer_age, with_seconds,
};
use crate::{
    Appointment, AppointmentStatus, Case, CaseStatus, Client, Lawyer, Record, Schedule,
    ScheduleStatus,
};

/// The editable, string-valued copy of a record bound to a form.
pub trait Draft: Clone + fmt::Debug + PartialEq + Send {
    type Record: Record;

    /// Field names accepted by [`Draft::field_mut`].
    const FIELDS: &'static [&'static str];

    /// Fields only ever written by auto-fill, never by the user.
    const DERIVED: &'static [&'static str] = &[];

    fn blank() -> Self;

    fn from_record(record: &Self::Record) -> Self;

    fn field_mut(&mut self, name: &str) -> Option<&mut String>;

    /// Fields that must be non-empty, in the order they are checked.
    fn required(&self) -> Vec<(&'static str, &str)>;

    fn validate(&self, _today: Date) -> ValidationResult<()> {
        require_fields(&self.required())
    }

    /// JSON body for create/update, with numeric strings coerced.
    fn to_wire(&self) -> Value;
}

/// Parses numeric strings into JSON numbers; anything else goes through as-is.
pub fn numeric_or_text(value: &str) -> Value {
    match value.trim().parse::<i64>() {
        Ok(number) => Value::from(number),
        Err(_) => Value::from(value),
    }
}

/// Like [`numeric_or_text`], but an empty optional reference becomes null.
pub fn optional_reference(value: &str) -> Value {
    if value.trim().is_empty() {
        Value::Null
    } else {
        numeric_or_text(value)
    }
}

fn id_text<I: fmt::Display>(id: Option<I>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn count_text(value: Option<i64>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

fn check_choice(
    field: &'static str,
    value: &str,
    valid: impl FnOnce(&str) -> bool,
) -> ValidationResult<()> {
    if valid(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidChoice {
            field,
            value: value.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub lawyer_id: String,
}

impl Draft for ClientDraft {
    type Record = Client;

    const FIELDS: &'static [&'static str] = &["name", "email", "phone", "address", "lawyer_id"];

    fn blank() -> Self {
        Self::default()
    }

    fn from_record(record: &Client) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone().unwrap_or_default(),
            phone: record.phone.clone().unwrap_or_default(),
            address: record.address.clone().unwrap_or_default(),
            lawyer_id: id_text(record.lawyer_id),
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "email" => Some(&mut self.email),
            "phone" => Some(&mut self.phone),
            "address" => Some(&mut self.address),
            "lawyer_id" => Some(&mut self.lawyer_id),
            _ => None,
        }
    }

    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("address", self.address.as_str()),
            ("lawyer_id", self.lawyer_id.as_str()),
        ]
    }

    fn to_wire(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
            "address": self.address,
            "lawyer_id": optional_reference(&self.lawyer_id),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LawyerDraft {
    pub name: String,
    pub email: String,
    pub experience_years: String,
    pub cases_won: String,
    pub cases_lost: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: String,
    pub specialization: String,
}

impl Draft for LawyerDraft {
    type Record = Lawyer;

    const FIELDS: &'static [&'static str] = &[
        "name",
        "email",
        "experience_years",
        "cases_won",
        "cases_lost",
        "phone",
        "address",
        "date_of_birth",
        "specialization",
    ];

    fn blank() -> Self {
        Self::default()
    }

    fn from_record(record: &Lawyer) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            experience_years: count_text(record.experience_years),
            cases_won: count_text(record.cases_won),
            cases_lost: count_text(record.cases_lost),
            phone: record.phone.clone().unwrap_or_default(),
            address: record.address.clone().unwrap_or_default(),
            date_of_birth: record.date_of_birth.clone().unwrap_or_default(),
            specialization: record.specialization.clone().unwrap_or_default(),
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "email" => Some(&mut self.email),
            "experience_years" => Some(&mut self.experience_years),
            "cases_won" => Some(&mut self.cases_won),
            "cases_lost" => Some(&mut self.cases_lost),
            "phone" => Some(&mut self.phone),
            "address" => Some(&mut self.address),
            "date_of_birth" => Some(&mut self.date_of_birth),
            "specialization" => Some(&mut self.specialization),
            _ => None,
        }
    }

    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("experience_years", self.experience_years.as_str()),
            ("cases_won", self.cases_won.as_str()),
            ("cases_lost", self.cases_lost.as_str()),
            ("phone", self.phone.as_str()),
            ("address", self.address.as_str()),
            ("date_of_birth", self.date_of_birth.as_str()),
            ("specialization", self.specialization.as_str()),
        ]
    }

    fn validate(&self, today: Date) -> ValidationResult<()> {
        require_fields(&self.required())?;
        validate_lawyer_age(&self.date_of_birth, today)
    }

    fn to_wire(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email,
            "experience_years": numeric_or_text(&self.experience_years),
            "cases_won": numeric_or_text(&self.cases_won),
            "cases_lost": numeric_or_text(&self.cases_lost),
            "phone": self.phone,
            "address": self.address,
            "date_of_birth": self.date_of_birth,
            "specialization": self.specialization,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaseDraft {
    pub title: String,
    pub description: String,
    pub status: String,
    pub client_id: String,
    pub lawyer_id: String,
}

impl Draft for CaseDraft {
    type Record = Case;

    const FIELDS: &'static [&'static str] =
        &["title", "description", "status", "client_id", "lawyer_id"];

    const DERIVED: &'static [&'static str] = &["lawyer_id"];

    fn blank() -> Self {
        Self::default()
    }

    fn from_record(record: &Case) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            status: record.status.as_str().to_owned(),
            client_id: id_text(record.client_id),
            lawyer_id: id_text(record.lawyer_id),
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "title" => Some(&mut self.title),
            "description" => Some(&mut self.description),
            "status" => Some(&mut self.status),
            "client_id" => Some(&mut self.client_id),
            "lawyer_id" => Some(&mut self.lawyer_id),
            _ => None,
        }
    }

    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("status", self.status.as_str()),
            ("client_id", self.client_id.as_str()),
        ]
    }

    fn validate(&self, _today: Date) -> ValidationResult<()> {
        require_fields(&self.required())?;
        check_choice("status", &self.status, |value| {
            CaseStatus::parse(value).is_some()
        })
    }

    fn to_wire(&self) -> Value {
        let status = CaseStatus::parse(&self.status)
            .map_or_else(|| self.status.clone(), |status| status.as_str().to_owned());
        json!({
            "title": self.title,
            "description": self.description,
            "status": status,
            "client_id": numeric_or_text(&self.client_id),
            "lawyer_id": optional_reference(&self.lawyer_id),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub client_id: String,
    pub lawyer_id: String,
    pub case_id: String,
    pub date: String,
    pub time: String,
    pub status: String,
}

impl Draft for AppointmentDraft {
    type Record = Appointment;

    const FIELDS: &'static [&'static str] =
        &["client_id", "lawyer_id", "case_id", "date", "time", "status"];

    const DERIVED: &'static [&'static str] = &["lawyer_id"];

    fn blank() -> Self {
        Self {
            client_id: String::new(),
            lawyer_id: String::new(),
            case_id: String::new(),
            date: String::new(),
            time: String::new(),
            status: AppointmentStatus::Scheduled.as_str().to_owned(),
        }
    }

    fn from_record(record: &Appointment) -> Self {
        Self {
            client_id: id_text(record.client_id),
            lawyer_id: id_text(record.lawyer_id),
            case_id: id_text(record.case_id),
            date: record.date.clone(),
            time: record.time.clone(),
            status: record.status.as_str().to_owned(),
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "client_id" => Some(&mut self.client_id),
            "lawyer_id" => Some(&mut self.lawyer_id),
            "case_id" => Some(&mut self.case_id),
            "date" | "appointment_date" => Some(&mut self.date),
            "time" | "appointment_time" => Some(&mut self.time),
            "status" | "appointment_status" => Some(&mut self.status),
            _ => None,
        }
    }

    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("client_id", self.client_id.as_str()),
            ("lawyer_id", self.lawyer_id.as_str()),
            ("case_id", self.case_id.as_str()),
            ("date", self.date.as_str()),
            ("time", self.time.as_str()),
        ]
    }

    fn validate(&self, _today: Date) -> ValidationResult<()> {
        require_fields(&self.required())?;
        validate_appointment_time(&self.time)?;
        check_choice("status", &self.status, |value| {
            AppointmentStatus::parse(value).is_some()
        })
    }

    fn to_wire(&self) -> Value {
        let mut body = Map::new();
        body.insert("client_id".to_owned(), numeric_or_text(&self.client_id));
        body.insert("lawyer_id".to_owned(), numeric_or_text(&self.lawyer_id));
        body.insert("case_id".to_owned(), numeric_or_text(&self.case_id));
        body.insert("appointment_date".to_owned(), Value::from(self.date.as_str()));
        body.insert(
            "appointment_time".to_owned(),
            Value::from(with_seconds(&self.time)),
        );
        body.insert(
            "appointment_status".to_owned(),
            Value::from(self.status.as_str()),
        );
        Value::Object(body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub date: String,
    pub time: String,
    pub court: String,
    pub appointment: String,
    pub status: String,
}

impl Draft for ScheduleDraft {
    type Record = Schedule;

    const FIELDS: &'static [&'static str] = &["date", "time", "court", "appointment", "status"];

    fn blank() -> Self {
        Self {
            date: String::new(),
            time: String::new(),
            court: String::new(),
            appointment: String::new(),
            status: ScheduleStatus::Pending.as_str().to_owned(),
        }
    }

    fn from_record(record: &Schedule) -> Self {
        Self {
            date: record.date.clone(),
            time: record.time.clone(),
            court: record.court.clone(),
            appointment: record.appointment.clone(),
            status: record.status.as_str().to_owned(),
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "date" => Some(&mut self.date),
            "time" => Some(&mut self.time),
            "court" => Some(&mut self.court),
            "appointment" => Some(&mut self.appointment),
            "status" => Some(&mut self.status),
            _ => None,
        }
    }

    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("date", self.date.as_str()),
            ("time", self.time.as_str()),
            ("court", self.court.as_str()),
            ("appointment", self.appointment.as_str()),
        ]
    }

    fn validate(&self, _today: Date) -> ValidationResult<()> {
        require_fields(&self.required())?;
        check_choice("status", &self.status, |value| {
            ScheduleStatus::parse(value).is_some()
        })
    }

    fn to_wire(&self) -> Value {
        json!({
            "date": self.date,
            "time": with_seconds(&self.time),
            "court": self.court,
            "appointment": self.appointment,
            "status": self.status,
        })
    }
}
