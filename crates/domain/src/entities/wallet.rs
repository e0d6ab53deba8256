//! Wallet read model - balances and credit history
//!
//! All amounts are integer cents. Balances are computed server-side; the one
//! derivation done client-side is the pending total, which is simply the
//! count of submitted reviews times the fixed reward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::TransactionId;

/// Reward credited per approved review, in cents.
pub const REVIEW_REWARD_CENTS: i64 = 300;

/// Pending balance for reviews still under moderation.
pub fn pending_balance_cents(submitted_count: u32) -> i64 {
    i64::from(submitted_count) * REVIEW_REWARD_CENTS
}

/// The user's wallet balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    available_cents: i64,
    lifetime_cents: i64,
}

impl Wallet {
    pub fn new(available_cents: i64, lifetime_cents: i64) -> Result<Self, DomainError> {
        if available_cents < 0 || lifetime_cents < 0 {
            return Err(DomainError::validation("wallet balances cannot be negative"));
        }
        Ok(Self {
            available_cents,
            lifetime_cents,
        })
    }

    pub fn available_cents(&self) -> i64 {
        self.available_cents
    }

    pub fn lifetime_cents(&self) -> i64 {
        self.lifetime_cents
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            available_cents: 0,
            lifetime_cents: 0,
        }
    }
}

/// Direction of a wallet movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Approved review credited
    Earning,
    /// Paid-out withdrawal debited
    Withdrawal,
    /// Unknown kind for forward compatibility
    #[serde(other)]
    Unknown,
}

impl TransactionKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Earning => "Earning",
            Self::Withdrawal => "Withdrawal",
            Self::Unknown => "Unknown",
        }
    }
}

/// One wallet movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    id: TransactionId,
    kind: TransactionKind,
    amount_cents: i64,
    created_at: DateTime<Utc>,
}

impl WalletTransaction {
    pub fn new(
        id: TransactionId,
        kind: TransactionKind,
        amount_cents: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            amount_cents,
            created_at,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
