//! Error type crossing the outbound service ports.
//!
//! Remote adapters translate transport failures and backend error bodies
//! into these kinds; application services drive their state transitions off
//! them. Display strings are user-facing, so every variant carries a message
//! the user can act on. For `NoCapacity` and `AlreadyHoldingSlot` the
//! backend's own message is surfaced verbatim.

use thiserror::Error;

use commenter_domain::DomainError;
use commenter_shared::{ApiErrorBody, ErrorCode};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    /// The chosen company has no open capacity left.
    #[error("{0}")]
    NoCapacity(String),

    /// The user already holds a reservation elsewhere.
    #[error("{0}")]
    AlreadyHoldingSlot(String),

    /// The referenced slot does not exist (or is not visible to this user).
    #[error("slot no longer available: {0}")]
    SlotNotFound(String),

    /// The slot's deadline passed server-side.
    #[error("reservation expired: {0}")]
    SlotExpired(String),

    /// The submitted data was rejected (bad proof link, bad form input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request never completed: timeout, connection refused, DNS.
    #[error("connection problem, try again: {0}")]
    Network(String),

    /// A backend error outside the well-known codes.
    #[error("server error: {message}")]
    Backend { code: ErrorCode, message: String },

    /// The response arrived but could not be interpreted.
    #[error("unexpected server response: {0}")]
    Parse(String),

    /// A conflicting local operation is still in flight.
    #[error("{0}")]
    OperationInFlight(String),
}

impl ServiceError {
    /// Whether this error means the held slot is gone on the server and the
    /// client must drop back to idle (clearing local state) rather than
    /// retry.
    pub fn invalidates_slot(&self) -> bool {
        matches!(self, Self::SlotExpired(_) | Self::SlotNotFound(_))
    }

    /// Whether the current reservation survives this error, so the user may
    /// simply retry the same action.
    pub fn is_recoverable_in_place(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Network(_) | Self::Backend { .. } | Self::Parse(_)
        )
    }

    /// Short stable name for structured logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoCapacity(_) => "no_capacity",
            Self::AlreadyHoldingSlot(_) => "already_holding_slot",
            Self::SlotNotFound(_) => "slot_not_found",
            Self::SlotExpired(_) => "slot_expired",
            Self::Validation(_) => "validation_failure",
            Self::Network(_) => "transient_network_failure",
            Self::Backend { .. } => "backend",
            Self::Parse(_) => "parse",
            Self::OperationInFlight(_) => "operation_in_flight",
        }
    }
}

impl From<ApiErrorBody> for ServiceError {
    fn from(body: ApiErrorBody) -> Self {
        let message = if body.message.trim().is_empty() {
            body.hint
                .or(body.details)
                .unwrap_or_else(|| "the server rejected the request".to_string())
        } else {
            body.message
        };
        match body.code {
            ErrorCode::NoCapacity => Self::NoCapacity(message),
            ErrorCode::AlreadyHoldingSlot => Self::AlreadyHoldingSlot(message),
            ErrorCode::SlotNotFound => Self::SlotNotFound(message),
            ErrorCode::SlotExpired => Self::SlotExpired(message),
            ErrorCode::ValidationFailure => Self::Validation(message),
            code @ (ErrorCode::Unauthorized | ErrorCode::Unknown) => {
                Self::Backend { code, message }
            }
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Parse(msg) => Self::Parse(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_codes_map_to_variants() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"code": "no_capacity", "message": "All slots for this company are taken."}"#,
        )
        .unwrap();
        let err = ServiceError::from(body);
        assert_eq!(
            err,
            ServiceError::NoCapacity("All slots for this company are taken.".to_string())
        );
        // The backend message is what the user sees, untouched.
        assert_eq!(err.to_string(), "All slots for this company are taken.");
    }

    #[test]
    fn test_unknown_code_falls_back_to_backend() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"code": "quota_exceeded", "message": "Quota exceeded"}"#)
                .unwrap();
        assert!(matches!(
            ServiceError::from(body),
            ServiceError::Backend {
                code: ErrorCode::Unknown,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_message_uses_hint() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"code": "slot_expired", "message": "", "hint": "Pick another company."}"#,
        )
        .unwrap();
        let err = ServiceError::from(body);
        assert_eq!(err, ServiceError::SlotExpired("Pick another company.".to_string()));
    }

    #[test]
    fn test_slot_invalidation_split() {
        assert!(ServiceError::SlotExpired("x".into()).invalidates_slot());
        assert!(ServiceError::SlotNotFound("x".into()).invalidates_slot());
        assert!(!ServiceError::Network("x".into()).invalidates_slot());

        assert!(ServiceError::Network("x".into()).is_recoverable_in_place());
        assert!(ServiceError::Validation("x".into()).is_recoverable_in_place());
        assert!(!ServiceError::SlotExpired("x".into()).is_recoverable_in_place());
    }

    #[test]
    fn test_domain_error_conversion() {
        let err = ServiceError::from(DomainError::validation("proof link cannot be empty"));
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = ServiceError::from(DomainError::parse("bad uuid"));
        assert_eq!(err, ServiceError::Parse("bad uuid".to_string()));
    }
}
