use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::utils::humanize_field;

/// Fallback shown when an error carries nothing presentable.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Key the backend uses for errors not tied to a single field.
const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Keys that carry a single human-readable message on their own.
const MESSAGE_KEYS: [&str; 3] = ["detail", "error", "message"];

/// Every failure the API client can surface.
///
/// The variants are produced only at the client boundary so that callers
/// never have to sniff raw response shapes.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered 401. The held credential has already been cleared.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// The request never reached the backend (DNS, refused connection, ...).
    #[error("Backend server is not available at {base_url}")]
    BackendUnavailable {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other non-2xx answer.
    #[error("HTTP error! status: {status}")]
    Status {
        status: u16,
        details: Option<ErrorDetails>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Build a status error from a response body that may or may not be JSON.
    pub(crate) fn from_status(status: u16, body: Option<Value>) -> Self {
        ApiError::Status {
            status,
            details: body.and_then(ErrorDetails::from_value),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthenticationFailed => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            ApiError::Status { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, ApiError::AuthenticationFailed)
    }

    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, ApiError::BackendUnavailable { .. })
    }

    /// Flatten the error into the lines a screen should show.
    ///
    /// General (`non_field_errors`) alerts come first, then one line per
    /// field message labelled with the humanized field name. Errors with
    /// nothing presentable fall back to [`GENERIC_ERROR_MESSAGE`].
    pub fn alerts(&self) -> Vec<String> {
        match self {
            ApiError::AuthenticationFailed => vec!["Authentication failed".to_string()],
            ApiError::BackendUnavailable { base_url, .. } => vec![format!(
                "Backend server is not available. Please check if the server is running on {}",
                base_url
            )],
            ApiError::Status {
                details: Some(ErrorDetails::Validation(errors)),
                ..
            } => {
                let lines = errors.alerts();
                if lines.is_empty() {
                    vec![GENERIC_ERROR_MESSAGE.to_string()]
                } else {
                    lines
                }
            }
            ApiError::Status {
                details: Some(ErrorDetails::Message(message)),
                ..
            } => vec![message.clone()],
            ApiError::Status { .. } => vec![GENERIC_ERROR_MESSAGE.to_string()],
            ApiError::InvalidResponse(_) | ApiError::InvalidRequest(_) => {
                vec![GENERIC_ERROR_MESSAGE.to_string()]
            }
        }
    }
}

/// Structured payload carried by a non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetails {
    /// Field-keyed message arrays plus optional `non_field_errors`.
    Validation(ValidationErrors),
    /// A single message (`{"detail": "..."}` or a bare JSON string).
    Message(String),
}

impl ErrorDetails {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(message) => Some(ErrorDetails::Message(message)),
            Value::Array(items) => Some(ErrorDetails::Validation(ValidationErrors {
                non_field_errors: collect_messages(&Value::Array(items)),
                fields: BTreeMap::new(),
            })),
            Value::Object(map) => {
                if map.len() == 1 {
                    for key in MESSAGE_KEYS {
                        if let Some(Value::String(message)) = map.get(key) {
                            return Some(ErrorDetails::Message(message.clone()));
                        }
                    }
                }
                Some(ErrorDetails::Validation(ValidationErrors::from_map(&map)))
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => None,
        }
    }

    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            ErrorDetails::Validation(errors) => Some(errors),
            ErrorDetails::Message(_) => None,
        }
    }
}

/// Validation failures as returned by the backend serializers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    pub non_field_errors: Vec<String>,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    fn from_map(map: &serde_json::Map<String, Value>) -> Self {
        let mut errors = ValidationErrors::default();
        for (key, value) in map {
            if key == NON_FIELD_ERRORS {
                errors.non_field_errors.extend(collect_messages(value));
            } else {
                errors.collect_field(key, value);
            }
        }
        errors
    }

    /// Nested serializers report errors as objects (or lists of objects);
    /// those are flattened into dotted field names.
    fn collect_field(&mut self, key: &str, value: &Value) {
        match value {
            Value::Object(nested) => {
                for (child, child_value) in nested {
                    self.collect_field(&format!("{}.{}", key, child), child_value);
                }
            }
            Value::Array(items) if items.iter().any(Value::is_object) => {
                for item in items {
                    if item.is_object() {
                        self.collect_field(key, item);
                    }
                }
            }
            _ => {
                let messages = collect_messages(value);
                if !messages.is_empty() {
                    self.fields
                        .entry(key.to_string())
                        .or_default()
                        .extend(messages);
                }
            }
        }
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.non_field_errors.is_empty() && self.fields.is_empty()
    }

    pub fn alerts(&self) -> Vec<String> {
        let mut lines = self.non_field_errors.clone();
        for (field, messages) in &self.fields {
            let label = humanize_field(field);
            lines.extend(messages.iter().map(|m| format!("{}: {}", label, m)));
        }
        lines
    }
}

fn collect_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(message) => vec![message.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(message) => Some(message.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_payload_keeps_fields_and_general_errors() {
        let error = ApiError::from_status(
            400,
            Some(json!({
                "email": ["Enter a valid email address."],
                "first_name": ["This field is required."],
                "non_field_errors": ["Passwords do not match!"]
            })),
        );

        let details = error.details().and_then(ErrorDetails::validation).unwrap();
        assert_eq!(details.field("email"), ["Enter a valid email address."]);
        assert_eq!(details.non_field_errors, vec!["Passwords do not match!"]);

        assert_eq!(
            error.alerts(),
            vec![
                "Passwords do not match!",
                "Email: Enter a valid email address.",
                "First Name: This field is required.",
            ]
        );
    }

    #[test]
    fn test_string_valued_field_is_rendered() {
        let error = ApiError::from_status(400, Some(json!({"closing_date": "Must be in the future"})));
        assert_eq!(error.alerts(), vec!["Closing Date: Must be in the future"]);
    }

    #[test]
    fn test_single_message_payloads() {
        let error = ApiError::from_status(400, Some(json!({"error": "Report is not ready for download"})));
        assert_eq!(
            error.details(),
            Some(&ErrorDetails::Message("Report is not ready for download".to_string()))
        );
        assert_eq!(error.alerts(), vec!["Report is not ready for download"]);

        let error = ApiError::from_status(403, Some(json!({"detail": "Not allowed."})));
        assert_eq!(error.alerts(), vec!["Not allowed."]);
    }

    #[test]
    fn test_nested_serializer_errors_are_flattened() {
        let error = ApiError::from_status(
            400,
            Some(json!({"educations": [{}, {"school_name": ["This field is required."]}]})),
        );
        let details = error.details().and_then(ErrorDetails::validation).unwrap();
        assert_eq!(details.field("educations.school_name"), ["This field is required."]);
    }

    #[test]
    fn test_top_level_list_becomes_general_errors() {
        let error = ApiError::from_status(400, Some(json!(["Unsupported report type"])));
        assert_eq!(error.alerts(), vec!["Unsupported report type"]);
    }

    #[test]
    fn test_absent_details_fall_back_to_generic_message() {
        let error = ApiError::from_status(502, None);
        assert!(error.details().is_none());
        assert_eq!(error.status(), Some(502));
        assert_eq!(error.alerts(), vec![GENERIC_ERROR_MESSAGE]);

        let error = ApiError::from_status(400, Some(json!({})));
        assert_eq!(error.alerts(), vec![GENERIC_ERROR_MESSAGE]);
    }

    #[test]
    fn test_authentication_failure_kind() {
        let error = ApiError::AuthenticationFailed;
        assert!(error.is_authentication_failure());
        assert!(!error.is_backend_unavailable());
        assert_eq!(error.status(), Some(401));
    }
}
