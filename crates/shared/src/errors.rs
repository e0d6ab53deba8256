//! Error body and error-code vocabulary of the hosted backend

use serde::{Deserialize, Serialize};

/// Error classification codes raised by the backend's stored procedures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // === Reservation errors ===
    /// Company has no open capacity left
    NoCapacity,
    /// Caller already holds a reserved or submitted slot
    AlreadyHoldingSlot,
    /// Slot does not exist or is not owned by the caller
    SlotNotFound,
    /// Slot deadline passed server-side
    SlotExpired,

    // === Input errors ===
    /// Request data failed validation (missing proof, bad PIX key, ...)
    ValidationFailure,

    // === Access errors ===
    /// Caller is not authenticated or lacks permission
    Unauthorized,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

impl Default for ErrorCode {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Error body returned by the backend on a non-2xx response
///
/// Both fields are defaulted so a half-formed body (e.g. a proxy error page
/// that still parses as JSON) degrades to `Unknown` instead of failing the
/// error path itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: ErrorCode,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            hint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_code_round_trip() {
        let json = serde_json::to_string(&ErrorCode::AlreadyHoldingSlot).unwrap();
        assert_eq!(json, "\"already_holding_slot\"");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::AlreadyHoldingSlot);
    }

    #[test]
    fn test_unknown_code_tolerated() {
        let code: ErrorCode = serde_json::from_str("\"quota_exceeded\"").unwrap();
        assert_eq!(code, ErrorCode::Unknown);
    }

    #[test]
    fn test_body_with_missing_fields() {
        let body: ApiErrorBody = serde_json::from_str("{\"message\":\"boom\"}").unwrap();
        assert_eq!(body.code, ErrorCode::Unknown);
        assert_eq!(body.message, "boom");

        let empty: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.code, ErrorCode::Unknown);
        assert!(empty.message.is_empty());
    }

    #[test]
    fn test_full_body_parses() {
        let json = r#"{
            "code": "no_capacity",
            "message": "Company has no open slots",
            "details": "0 of 5 remaining",
            "hint": "pick another company"
        }"#;
        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.code, ErrorCode::NoCapacity);
        assert_eq!(body.details.as_deref(), Some("0 of 5 remaining"));
    }
}
