// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use docket_app::{
    AdminProfile, Backend, BackendError, BackendResult, DashboardSummary, EntityId, LoginRequest,
    LoginResponse, Record, RegisterRequest, Session, ViewTab,
};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// A row of an authenticated report view, keyed by column name.
pub type ViewRow = Map<String, Value>;

/// Blocking client for the case-management REST backend.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
    session: Option<Session>,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "api.base_url must use http or https, got {:?} -- e.g. http://localhost:5000",
                parsed.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
            session: None,
        })
    }

    /// Attaches the session whose token authenticates profile and view calls.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn bearer(&self) -> BackendResult<String> {
        self.session
            .as_ref()
            .and_then(Session::bearer)
            .ok_or(BackendError::Unauthorized)
    }

    fn authorized(&self, request: RequestBuilder) -> BackendResult<RequestBuilder> {
        Ok(request.header(reqwest::header::AUTHORIZATION, self.bearer()?))
    }

    fn send(&self, request: RequestBuilder, label: &str) -> BackendResult<Response> {
        debug!(request = label, "sending");
        let response = request
            .send()
            .map_err(|error| connection_error(&self.base_url, &error))?;
        let status = response.status();
        debug!(request = label, status = status.as_u16(), "response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        warn!(request = label, status = status.as_u16(), "request rejected");
        Err(clean_error_response(status, &body))
    }

    /// Like [`Client::send`], but 401/422 mean the token is missing or stale.
    fn send_authorized(&self, request: RequestBuilder, label: &str) -> BackendResult<Response> {
        let request = self.authorized(request)?;
        match self.send(request, label) {
            Err(BackendError::Rejected { status: 401 | 422, .. }) => Err(BackendError::Unauthorized),
            other => other,
        }
    }

    fn json_body(response: Response) -> BackendResult<Value> {
        let text = response
            .text()
            .map_err(|error| BackendError::Decode(error.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|error| BackendError::Decode(error.to_string()))
    }

    /// Exchanges credentials for a session. Blank fields fail before any
    /// request is made.
    pub fn login(&self, request: &LoginRequest) -> Result<Session> {
        request.validate()?;
        let response = self.send(
            self.http.post(self.url("admin/login")).json(request),
            "POST /admin/login",
        )?;
        let body = Self::json_body(response)?;
        let parsed: LoginResponse =
            serde_json::from_value(body).context("decode login response")?;
        parsed.into_session(&request.name).ok_or_else(|| {
            anyhow::anyhow!("login response carried no token -- check the backend version")
        })
    }

    /// Creates an admin account and returns the server's confirmation.
    pub fn register(&self, request: &RegisterRequest) -> Result<String> {
        request.validate()?;
        let response = self.send(
            self.http.post(self.url("admin/register")).json(request),
            "POST /admin/register",
        )?;
        let body = Self::json_body(response)?;
        Ok(message_of(&body).unwrap_or_else(|| "Admin registered successfully".to_owned()))
    }

    /// Succeeds while the attached token is still accepted.
    pub fn verify_token(&self) -> BackendResult<()> {
        self.send_authorized(self.http.get(self.url("verify-token")), "GET /verify-token")?;
        Ok(())
    }

    pub fn logout(&self) -> BackendResult<()> {
        self.send_authorized(self.http.post(self.url("admin/logout")), "POST /admin/logout")?;
        Ok(())
    }

    fn profile_path(&self) -> BackendResult<String> {
        let id = self
            .session
            .as_ref()
            .filter(|session| session.is_active())
            .and_then(|session| session.admin_id)
            .ok_or(BackendError::Unauthorized)?;
        Ok(format!("profile/{id}"))
    }

    pub fn profile(&self) -> BackendResult<AdminProfile> {
        let path = self.profile_path()?;
        let response =
            self.send_authorized(self.http.get(self.url(&path)), &format!("GET /{path}"))?;
        decode_record(Self::json_body(response)?)?
            .ok_or_else(|| BackendError::Decode("profile response had no admin".to_owned()))
    }

    /// Saves name and email, returning the profile as the server now has it.
    pub fn update_profile(&self, name: &str, email: &str) -> BackendResult<AdminProfile> {
        let path = self.profile_path()?;
        let body = json!({ "name": name, "email": email });
        let response = self.send_authorized(
            self.http.put(self.url(&path)).json(&body),
            &format!("PUT /{path}"),
        )?;
        match decode_record(Self::json_body(response)?)? {
            Some(profile) => Ok(profile),
            None => self.profile(),
        }
    }

    /// Rows of a read-only report. Anything but a JSON array reads as empty.
    pub fn view(&self, tab: ViewTab) -> BackendResult<Vec<ViewRow>> {
        let path = tab.path();
        let response =
            self.send_authorized(self.http.get(self.url(&path)), &format!("GET /{path}"))?;
        Ok(rows_of(Self::json_body(response)?))
    }
}

impl Backend for Client {
    fn list<T: Record>(&self) -> BackendResult<Vec<T>> {
        let path = T::RESOURCE.path();
        let response = self.send(self.http.get(self.url(path)), &format!("GET /{path}"))?;
        let rows = rows_of(Self::json_body(response)?);
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(Value::Object(row)).map_err(|error| {
                    BackendError::Decode(format!("{} record: {error}", T::RESOURCE.singular()))
                })
            })
            .collect()
    }

    fn create<T: Record>(&self, payload: &Value) -> BackendResult<Option<T>> {
        let path = T::RESOURCE.path();
        let response = self.send(
            self.http.post(self.url(path)).json(payload),
            &format!("POST /{path}"),
        )?;
        decode_record(Self::json_body(response)?)
    }

    fn update<T: Record>(&self, id: T::Id, payload: &Value) -> BackendResult<Option<T>> {
        let path = format!("{}/{}", T::RESOURCE.path(), id.get());
        let response = self.send(
            self.http.put(self.url(&path)).json(payload),
            &format!("PUT /{path}"),
        )?;
        decode_record(Self::json_body(response)?)
    }

    fn delete<T: Record>(&self, id: T::Id) -> BackendResult<()> {
        let path = format!("{}/{}", T::RESOURCE.path(), id.get());
        self.send(self.http.delete(self.url(&path)), &format!("DELETE /{path}"))?;
        Ok(())
    }

    fn dashboard(&self) -> BackendResult<DashboardSummary> {
        let response = self.send(self.http.get(self.url("dashboard")), "GET /dashboard")?;
        match Self::json_body(response)? {
            Value::Null => Ok(DashboardSummary::default()),
            body => serde_json::from_value(body)
                .map_err(|error| BackendError::Decode(format!("dashboard: {error}"))),
        }
    }
}

/// Reads a write response that may be the record itself, the record under
/// `data`, or a bare `{message}` acknowledgement (`None`).
pub fn decode_record<T: DeserializeOwned>(body: Value) -> BackendResult<Option<T>> {
    let candidate = match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Object(_)) => data,
            Some(_) | None => Value::Object(map),
        },
        _ => return Ok(None),
    };
    if is_acknowledgement(&candidate) {
        return Ok(None);
    }
    serde_json::from_value(candidate)
        .map(Some)
        .map_err(|error| BackendError::Decode(error.to_string()))
}

fn is_acknowledgement(value: &Value) -> bool {
    match value {
        Value::Object(map) => map
            .keys()
            .all(|key| matches!(key.as_str(), "message" | "error" | "status" | "success")),
        _ => true,
    }
}

fn rows_of(body: Value) -> Vec<ViewRow> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(row) => Some(row),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

fn message_of(body: &Value) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_value(body.clone()).ok()?;
    envelope
        .message
        .into_iter()
        .chain(envelope.error)
        .chain(envelope.msg)
        .find(|message| !message.trim().is_empty())
}

fn connection_error(base_url: &str, error: &reqwest::Error) -> BackendError {
    BackendError::Network(format!(
        "cannot reach {base_url} -- is the backend running? ({error})"
    ))
}

fn clean_error_response(status: StatusCode, body: &str) -> BackendError {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(value) => message_of(&value),
        Err(_) => {
            let trimmed = body.trim();
            (!trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('<'))
                .then(|| trimmed.to_owned())
        }
    };
    BackendError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::{clean_error_response, decode_record, rows_of};
    use docket_app::{BackendError, Client, ClientId};
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn decode_record_accepts_bare_and_enveloped_records() {
        let bare: Option<Client> =
            decode_record(json!({"client_id": 3, "name": "Ada"})).expect("bare record");
        assert_eq!(bare.map(|client| client.id), Some(ClientId::new(3)));

        let wrapped: Option<Client> = decode_record(json!({
            "message": "Client added",
            "data": {"client_id": 4, "name": "Bo"}
        }))
        .expect("enveloped record");
        assert_eq!(wrapped.map(|client| client.id), Some(ClientId::new(4)));
    }

    #[test]
    fn decode_record_treats_message_only_as_acknowledgement() {
        let ack: Option<Client> =
            decode_record(json!({"message": "Client added successfully"})).expect("ack");
        assert!(ack.is_none());
    }

    #[test]
    fn decode_record_reports_malformed_records() {
        let error = decode_record::<Client>(json!({"name": "no id"})).expect_err("missing id");
        assert!(matches!(error, BackendError::Decode(_)));
    }

    #[test]
    fn rows_of_ignores_non_arrays() {
        assert!(rows_of(json!({"message": "No appointments found"})).is_empty());
        assert_eq!(rows_of(json!([{"a": 1}, 2])).len(), 1);
    }

    #[test]
    fn error_body_message_or_error_key() {
        let from_message =
            clean_error_response(StatusCode::BAD_REQUEST, r#"{"message":"Missing fields"}"#);
        assert_eq!(from_message.user_message("generic"), "Missing fields");

        let from_error = clean_error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"db locked"}"#,
        );
        assert_eq!(from_error.user_message("generic"), "db locked");

        let html = clean_error_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(html.user_message("generic"), "generic");

        let plain = clean_error_response(StatusCode::SERVICE_UNAVAILABLE, "maintenance");
        assert_eq!(plain.user_message("generic"), "maintenance");
    }
}
