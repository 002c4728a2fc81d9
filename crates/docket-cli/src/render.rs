// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_app::{
    AdminProfile, Appointment, Case, Client, ClientLinked, DashboardSummary, Lawyer, Schedule,
    resolve_name,
};
use docket_api::ViewRow;
use docket_sync::{Stored, Workspace};
use serde_json::Value;

/// Records that list as table rows. Foreign keys render through the
/// workspace stores, so a missing target shows as "Not Assigned".
pub trait Tabular: Stored {
    const COLUMNS: &'static [&'static str];

    fn cells(&self, workspace: &Workspace) -> Vec<String>;
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number(value: Option<i64>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

impl Tabular for Client {
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Email", "Phone", "Address", "Lawyer"];

    fn cells(&self, workspace: &Workspace) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            text(&self.email),
            text(&self.phone),
            text(&self.address),
            resolve_name(&workspace.lawyers, self.lawyer_id).to_owned(),
        ]
    }
}

impl Tabular for Lawyer {
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Name",
        "Email",
        "Phone",
        "Specialization",
        "Experience",
        "Won",
        "Lost",
        "Born",
    ];

    fn cells(&self, _workspace: &Workspace) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            text(&self.phone),
            text(&self.specialization),
            number(self.experience_years),
            number(self.cases_won),
            number(self.cases_lost),
            text(&self.date_of_birth),
        ]
    }
}

impl Tabular for Case {
    const COLUMNS: &'static [&'static str] = &["ID", "Title", "Status", "Client", "Lawyer"];

    fn cells(&self, workspace: &Workspace) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.status.as_str().to_owned(),
            resolve_name(&workspace.clients, self.client_id).to_owned(),
            resolve_name(
                &workspace.lawyers,
                self.effective_lawyer_id(&workspace.clients),
            )
            .to_owned(),
        ]
    }
}

impl Tabular for Appointment {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Date", "Time", "Status", "Client", "Lawyer", "Case"];

    fn cells(&self, workspace: &Workspace) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.clone(),
            self.time.clone(),
            self.status.as_str().to_owned(),
            resolve_name(&workspace.clients, self.client_id).to_owned(),
            resolve_name(
                &workspace.lawyers,
                self.effective_lawyer_id(&workspace.clients),
            )
            .to_owned(),
            resolve_name(&workspace.cases, self.case_id).to_owned(),
        ]
    }
}

impl Tabular for Schedule {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Date", "Time", "Court", "Appointment", "Status"];

    fn cells(&self, _workspace: &Workspace) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.clone(),
            self.time.clone(),
            self.court.clone(),
            self.appointment.clone(),
            self.status.as_str().to_owned(),
        ]
    }
}

/// Left-aligned columns padded to the widest cell.
pub fn format_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "(no rows)\n".to_owned();
    }

    let mut widths: Vec<usize> = columns.iter().map(|column| column.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = render_line(columns.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&render_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let mut out = padded.join("  ").trim_end().to_owned();
    out.push('\n');
    out
}

pub fn records_table<T: Tabular>(workspace: &Workspace) -> String {
    let rows: Vec<Vec<String>> = workspace
        .store::<T>()
        .records()
        .iter()
        .map(|record| record.cells(workspace))
        .collect();
    format_table(T::COLUMNS, &rows)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Columns are the union of every row's keys.
pub fn view_table(rows: &[ViewRow]) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| row.get(*column).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();
    format_table(&columns, &cells)
}

pub fn dashboard_table(summary: &DashboardSummary) -> String {
    let rows = [
        ("Total clients", summary.total_clients),
        ("Total cases", summary.total_cases),
        ("Important cases", summary.important_cases),
        ("Archived cases", summary.archived_cases),
    ]
    .into_iter()
    .map(|(label, count)| vec![label.to_owned(), count.to_string()])
    .collect::<Vec<_>>();
    format_table(&["Metric", "Count"], &rows)
}

pub fn profile_table(profile: &AdminProfile) -> String {
    let id = profile.id.map(|id| id.to_string()).unwrap_or_default();
    format_table(
        &["ID", "Name", "Email"],
        &[vec![id, profile.name.clone(), profile.email.clone()]],
    )
}
