// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::macros::format_description;
use time::{Date, OffsetDateTime};

pub const DATE_LAYOUT: &str = "YYYY-MM-DD";
pub const MINIMUM_LAWYER_AGE: i32 = 25;
pub const OFFICE_OPENS_HOUR: u8 = 9;
pub const OFFICE_CLOSES_HOUR: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(&'static str),
    UnknownField { entity: &'static str, field: String },
    ReadOnlyField(&'static str),
    InvalidChoice { field: &'static str, value: String },
    OutsideOfficeHours(String),
    InvalidDate(String),
    LawyerTooYoung { age: i32 },
    MissingCredentials,
    PasswordMismatch,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{} is required", field.replace('_', " ")),
            Self::UnknownField { entity, field } => {
                write!(f, "{entity} has no field {field:?}")
            }
            Self::ReadOnlyField(field) => write!(
                f,
                "{} follows the selected client and cannot be set directly",
                field.replace('_', " ")
            ),
            Self::InvalidChoice { field, value } => {
                write!(f, "{value:?} is not a valid {}", field.replace('_', " "))
            }
            Self::OutsideOfficeHours(value) => write!(
                f,
                "appointment time {value:?} must be between 9:00 AM and 6:00 PM"
            ),
            Self::InvalidDate(value) => {
                write!(f, "invalid date {value:?}; expected {DATE_LAYOUT}")
            }
            Self::LawyerTooYoung { age } => write!(
                f,
                "lawyer must be at least {MINIMUM_LAWYER_AGE} years old (got {age})"
            ),
            Self::MissingCredentials => f.write_str("Both fields are required"),
            Self::PasswordMismatch => f.write_str("passwords do not match"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Returns the first `(name, value)` pair whose value is blank.
pub fn require_fields(fields: &[(&'static str, &str)]) -> ValidationResult<()> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(ValidationError::MissingField(*name)),
        None => Ok(()),
    }
}

/// Accepts `HH:MM[:SS]` (or a bare `HH`) whose hour falls in `[09, 18)`.
pub fn validate_appointment_time(value: &str) -> ValidationResult<()> {
    match leading_hour(value) {
        Some(hour) if (OFFICE_OPENS_HOUR..OFFICE_CLOSES_HOUR).contains(&hour) => Ok(()),
        _ => Err(ValidationError::OutsideOfficeHours(value.to_owned())),
    }
}

fn leading_hour(value: &str) -> Option<u8> {
    let bytes = value.trim().as_bytes();
    if bytes.len() < 2 || !bytes[0].is_ascii_digit() || !bytes[1].is_ascii_digit() {
        return None;
    }
    if bytes.len() > 2 && bytes[2] != b':' {
        return None;
    }
    Some((bytes[0] - b'0') * 10 + (bytes[1] - b'0'))
}

/// Pads `HH` and `HH:MM` out to `HH:MM:SS`; every other shape passes through.
pub fn with_seconds(value: &str) -> String {
    let value = value.trim();
    match value.matches(':').count() {
        0 if !value.is_empty() => format!("{value}:00:00"),
        1 => format!("{value}:00"),
        _ => value.to_owned(),
    }
}

pub fn parse_date(value: &str) -> ValidationResult<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::InvalidDate(value.to_owned()))
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Whole years elapsed between `birth` and `today`.
pub fn age_on(birth: Date, today: Date) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month() as u8, today.day()) < (birth.month() as u8, birth.day()) {
        age -= 1;
    }
    age
}

pub fn validate_lawyer_age(date_of_birth: &str, today: Date) -> ValidationResult<()> {
    let birth = parse_date(date_of_birth)?;
    let age = age_on(birth, today);
    if age < MINIMUM_LAWYER_AGE {
        return Err(ValidationError::LawyerTooYoung { age });
    }
    Ok(())
}
