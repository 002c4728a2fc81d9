// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::AdminId;
use crate::validation::{ValidationError, ValidationResult, require_fields};

const BEARER_PREFIX: &str = "Bearer ";

/// The authenticated admin, handed explicitly to whatever needs the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub admin_id: Option<AdminId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Session {
    pub fn is_active(&self) -> bool {
        !self.raw_token().is_empty()
    }

    /// The `Authorization` header value, or `None` without a token.
    pub fn bearer(&self) -> Option<String> {
        let token = self.raw_token();
        if token.is_empty() {
            return None;
        }
        Some(format!("{BEARER_PREFIX}{token}"))
    }

    fn raw_token(&self) -> &str {
        let token = self.token.trim();
        token.strip_prefix(BEARER_PREFIX).unwrap_or(token).trim()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        if self.name.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(())
    }
}

/// Body of a successful login. Older backends name the token `token`,
/// newer ones `access_token`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub admin_id: Option<AdminId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl LoginResponse {
    /// Builds a session, falling back to the login name when the server
    /// does not echo one. Returns `None` when no token came back.
    pub fn into_session(self, login_name: &str) -> Option<Session> {
        let token = self
            .token
            .filter(|token| !token.trim().is_empty())
            .or(self.access_token)
            .filter(|token| !token.trim().is_empty())?;
        Some(Session {
            token,
            admin_id: self.admin_id,
            name: self.name.unwrap_or_else(|| login_name.to_owned()),
            email: self.email.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        require_fields(&[
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
        ])?;
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LoginRequest, LoginResponse, RegisterRequest, Session};
    use crate::AdminId;
    use crate::validation::ValidationError;

    fn session(token: &str) -> Session {
        Session {
            token: token.to_owned(),
            admin_id: None,
            name: String::new(),
            email: String::new(),
        }
    }

    #[test]
    fn bearer_normalizes_existing_prefix() {
        assert_eq!(session("abc").bearer().as_deref(), Some("Bearer abc"));
        assert_eq!(session("Bearer abc").bearer().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn empty_token_is_no_session() {
        assert_eq!(session("").bearer(), None);
        assert_eq!(session("Bearer ").bearer(), None);
        assert!(!session("  ").is_active());
    }

    #[test]
    fn login_needs_both_fields() {
        let request = LoginRequest {
            name: "admin".to_owned(),
            password: String::new(),
        };
        let error = request.validate().expect_err("password missing");
        assert_eq!(error.to_string(), "Both fields are required");
    }

    #[test]
    fn login_response_accepts_either_token_key() {
        let legacy: LoginResponse =
            serde_json::from_str(r#"{"token":"t1","admin_id":4,"name":"Ann"}"#).expect("parse");
        let session = legacy.into_session("ann").expect("token present");
        assert_eq!(session.token, "t1");
        assert_eq!(session.admin_id, Some(AdminId::new(4)));
        assert_eq!(session.name, "Ann");

        let modern: LoginResponse =
            serde_json::from_str(r#"{"access_token":"t2"}"#).expect("parse");
        let session = modern.into_session("ann").expect("token present");
        assert_eq!(session.token, "t2");
        assert_eq!(session.name, "ann");

        let empty: LoginResponse = serde_json::from_str(r#"{"message":"ok"}"#).expect("parse");
        assert!(empty.into_session("ann").is_none());
    }

    #[test]
    fn registration_checks_required_then_confirmation() {
        let mut request = RegisterRequest {
            name: "ann".to_owned(),
            email: String::new(),
            password: "pw".to_owned(),
            confirm_password: "pw".to_owned(),
        };
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField("email"))
        );

        request.email = "ann@example.com".to_owned();
        request.confirm_password = "wp".to_owned();
        assert_eq!(request.validate(), Err(ValidationError::PasswordMismatch));

        request.confirm_password = "pw".to_owned();
        assert!(request.validate().is_ok());
    }
}
