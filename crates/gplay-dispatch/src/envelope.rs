//! Transport-neutral result envelopes.
//!
//! Every [`Outcome`] maps to a status class plus a JSON body. Front ends
//! decide what a status class means to them: the HTTP transport turns it
//! into a numeric code, the console into a status line and an alert.

use crate::outcome::{FailureKind, Outcome};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Generic message shown for internal errors; details travel separately.
pub const INTERNAL_ERROR_MESSAGE: &str = "Unexpected server error.";

/// Transport-neutral status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusClass {
    /// Payload delivered
    Ok,
    /// Caller's request was rejected
    ClientError,
    /// External service failed
    UpstreamError,
    /// Unexpected failure inside the gateway
    ServerError,
}

impl StatusClass {
    /// Label used in logs and the console.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::ClientError => "client-error",
            Self::UpstreamError => "upstream-error",
            Self::ServerError => "server-error",
        }
    }

    /// Numeric code a synchronous HTTP transport uses.
    #[must_use]
    pub fn http_code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::ClientError => 400,
            Self::UpstreamError => 502,
            Self::ServerError => 500,
        }
    }

    /// True for [`StatusClass::Ok`].
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of an envelope.
///
/// Serializes to `{"data": ...}`, `{"error": ...}` or
/// `{"error": ..., "details": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnvelopeBody {
    /// Successful payload
    Data {
        /// Payload returned by the service
        data: Value,
    },
    /// Failure description
    Error {
        /// Message safe to show to the caller
        error: String,
        /// Diagnostic detail for internal errors
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

/// Status class plus body for one outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Status classification
    pub status: StatusClass,
    /// JSON body
    pub body: EnvelopeBody,
}

impl Envelope {
    /// Compact JSON of the body.
    #[must_use]
    pub fn body_json(&self) -> Value {
        serde_json::to_value(&self.body).unwrap_or(Value::Null)
    }

    /// Pretty-printed JSON of the body, as shown by interactive front ends.
    #[must_use]
    pub fn body_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_default()
    }

    /// User-facing message for non-ok envelopes.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.body {
            EnvelopeBody::Data { .. } => None,
            EnvelopeBody::Error { error, .. } => Some(error),
        }
    }
}

/// Map an outcome to its envelope.
#[must_use]
pub fn to_envelope(outcome: Outcome) -> Envelope {
    match outcome {
        Outcome::Success { payload } => Envelope {
            status: StatusClass::Ok,
            body: EnvelopeBody::Data { data: payload },
        },
        Outcome::Failure {
            kind: FailureKind::InvalidInput,
            message,
        } => Envelope {
            status: StatusClass::ClientError,
            body: EnvelopeBody::Error {
                error: message,
                details: None,
            },
        },
        Outcome::Failure {
            kind: FailureKind::ServiceError,
            message,
        } => Envelope {
            status: StatusClass::UpstreamError,
            body: EnvelopeBody::Error {
                error: message,
                details: None,
            },
        },
        Outcome::Failure {
            kind: FailureKind::InternalError,
            message,
        } => Envelope {
            status: StatusClass::ServerError,
            body: EnvelopeBody::Error {
                error: INTERNAL_ERROR_MESSAGE.to_string(),
                details: Some(message),
            },
        },
    }
}

impl From<Outcome> for Envelope {
    fn from(outcome: Outcome) -> Self {
        to_envelope(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let envelope = to_envelope(Outcome::success(json!([1, 2, 3])));
        assert_eq!(envelope.status, StatusClass::Ok);
        assert_eq!(envelope.body_json(), json!({"data": [1, 2, 3]}));
        assert!(envelope.error_message().is_none());
    }

    #[test]
    fn test_invalid_input_envelope() {
        let envelope = to_envelope(Outcome::invalid_input("missing required parameter query"));
        assert_eq!(envelope.status, StatusClass::ClientError);
        assert_eq!(envelope.status.http_code(), 400);
        assert_eq!(
            envelope.body_json(),
            json!({"error": "missing required parameter query"})
        );
    }

    #[test]
    fn test_service_error_envelope() {
        let envelope = to_envelope(Outcome::failure(FailureKind::ServiceError, "app not found"));
        assert_eq!(envelope.status, StatusClass::UpstreamError);
        assert_eq!(envelope.status.http_code(), 502);
        assert_eq!(envelope.body_json(), json!({"error": "app not found"}));
    }

    #[test]
    fn test_internal_error_hides_details_behind_generic_message() {
        let envelope = to_envelope(Outcome::internal("index out of bounds"));
        assert_eq!(envelope.status, StatusClass::ServerError);
        assert_eq!(envelope.status.http_code(), 500);
        assert_eq!(
            envelope.body_json(),
            json!({"error": "Unexpected server error.", "details": "index out of bounds"})
        );
        assert_eq!(envelope.error_message(), Some(INTERNAL_ERROR_MESSAGE));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(StatusClass::Ok.to_string(), "ok");
        assert_eq!(StatusClass::ClientError.as_str(), "client-error");
        assert_eq!(StatusClass::UpstreamError.as_str(), "upstream-error");
        assert_eq!(StatusClass::ServerError.as_str(), "server-error");
        assert_eq!(
            serde_json::to_string(&StatusClass::UpstreamError).expect("serialize status"),
            "\"upstream-error\""
        );
    }

    #[test]
    fn test_pretty_body() {
        let envelope = to_envelope(Outcome::success(json!({"title": "WhatsApp"})));
        let pretty = envelope.body_pretty();
        assert!(pretty.contains("\"data\""));
        assert!(pretty.contains('\n'));
    }
}
