//! Field rules for user create/update payloads.
//!
//! Rules are declared on [`UserPayload`] with the `validator` derive. Every failing rule is
//! reported, not just the first one, so clients can fix a form in a single round trip.

use chrono::{DateTime, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

/// One failing rule, as returned in the 422 body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Body of `POST /users` and `PUT /users/:Username`
///
/// Missing string fields deserialize to empty strings so that the rules below report them
/// instead of the JSON extractor rejecting the whole body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserPayload {
    #[serde(rename = "Username", default)]
    #[validate(
        length(min = 5, message = "Username is required"),
        custom(function = "validate_alphanumeric")
    )]
    pub username: String,

    #[serde(rename = "Password", default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(rename = "Email", default)]
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    /// Blank or null means no birthday; a full timestamp keeps only its date
    #[serde(rename = "Birthday", default, deserialize_with = "deserialize_birthday")]
    pub birthday: Option<NaiveDate>,
}

impl UserPayload {
    /// Run every rule and collect the failures
    pub fn check(&self) -> Result<(), Vec<FieldError>> {
        self.validate().map_err(|errors| collect_field_errors(&errors))
    }
}

pub fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut error = ValidationError::new("alphanumeric");
        error.message = Some("Username contains non alphanumeric characters - not allowed.".into());
        return Err(error);
    }
    Ok(())
}

/// Standard address shape plus a dotted domain ending in an alphabetic top-level label
pub fn validate_email_address(value: &str) -> Result<(), ValidationError> {
    let has_tld = value
        .rsplit_once('@')
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .is_some_and(|(host, tld)| {
            !host.is_empty()
                && !host.ends_with('.')
                && (tld.starts_with("xn--") || (tld.len() >= 2 && tld.chars().all(char::is_alphabetic)))
        });

    if !has_tld || !value.validate_email() {
        let mut error = ValidationError::new("email");
        error.message = Some("Email does not appear to be valid".into());
        return Err(error);
    }
    Ok(())
}

fn deserialize_birthday<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|timestamp| Some(timestamp.date_naive()))
        .map_err(|_| de::Error::custom(format!("Birthday must be a YYYY-MM-DD date, got {:?}", raw)))
}

/// Flatten `validator` output into wire field names, sorted for stable responses
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut collected: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = wire_name(&field.to_string());
            field_errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, error.code));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();

    collected.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    collected
}

fn wire_name(field: &str) -> String {
    match field {
        "username" => "Username".to_string(),
        "password" => "Password".to_string(),
        "email" => "Email".to_string(),
        "birthday" => "Birthday".to_string(),
        other => other.to_string(),
    }
}
