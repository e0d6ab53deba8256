//! Withdrawal requests - payouts are manual, PIX-based

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::WithdrawalId;

/// Payout state of a withdrawal request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    /// Requested, not yet paid by an admin
    Pending,
    /// Marked paid by an admin
    Paid,
    /// Unknown status for forward compatibility
    #[serde(other)]
    Unknown,
}

impl WithdrawalStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// A request to pay out available balance to the user's PIX key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    id: WithdrawalId,
    amount_cents: i64,
    status: WithdrawalStatus,
    pix_key: String,
    requested_at: Option<DateTime<Utc>>,
}

impl WithdrawRequest {
    pub fn new(
        id: WithdrawalId,
        amount_cents: i64,
        status: WithdrawalStatus,
        pix_key: impl Into<String>,
    ) -> Self {
        Self {
            id,
            amount_cents,
            status,
            pix_key: pix_key.into(),
            requested_at: None,
        }
    }

    pub fn with_requested_at(mut self, requested_at: DateTime<Utc>) -> Self {
        self.requested_at = Some(requested_at);
        self
    }

    pub fn id(&self) -> WithdrawalId {
        self.id
    }

    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn status(&self) -> WithdrawalStatus {
        self.status
    }

    pub fn pix_key(&self) -> &str {
        &self.pix_key
    }

    pub fn requested_at(&self) -> Option<DateTime<Utc>> {
        self.requested_at
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.amount_cents <= 0 {
            return Err(DomainError::validation(
                "withdrawal amount must be positive",
            ));
        }
        if self.pix_key.trim().is_empty() {
            return Err(DomainError::validation("withdrawal needs a PIX key"));
        }
        Ok(())
    }
}
