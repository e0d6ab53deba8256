//! Review slot entity - the time-boxed, exclusive unit of work a user holds
//!
//! A slot is reserved against a company's paid package, counted down on the
//! client, and resolved server-side: submitted proof goes to moderation,
//! missed deadlines return the capacity to the pool. The server's
//! `expires_at` is the single source of truth for expiry; everything the
//! client derives from its own clock is display-only.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{CompanyId, SlotId};

/// Fallback reservation window, used only when a slot's `reserved_at` is
/// unknown and a display window must be assumed. Never used for expiry
/// decisions.
pub const DEFAULT_RESERVATION_WINDOW_SECS: i64 = 600;

/// Lifecycle status of a review slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Open capacity, not yet held by anyone
    Available,
    /// Held by a user, countdown running
    Reserved,
    /// Proof submitted, awaiting moderation
    Submitted,
    /// Deadline passed or hold abandoned; capacity returned to the pool
    Expired,
    /// Moderation approved the review; reward credited
    Approved,
    /// Moderation rejected the review
    Rejected,
    /// Unknown status for forward compatibility
    #[serde(other)]
    Unknown,
}

impl SlotStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Reserved => "IN PROGRESS",
            Self::Submitted => "UNDER REVIEW",
            Self::Expired => "EXPIRED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether this status still counts against the one-slot-per-user rule.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, Self::Reserved | Self::Submitted)
    }

    /// Whether the slot has reached a final status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Expired | Self::Approved | Self::Rejected)
    }

    /// Legal status transitions.
    ///
    /// `reserved -> submitted -> approved|rejected`, or `reserved -> expired`
    /// (deadline or explicit abandonment). Everything else is rejected; in
    /// particular an expired slot can never be acted on again.
    pub fn can_transition_to(&self, next: SlotStatus) -> bool {
        matches!(
            (self, next),
            (Self::Available, SlotStatus::Reserved)
                | (Self::Reserved, SlotStatus::Submitted)
                | (Self::Reserved, SlotStatus::Expired)
                | (Self::Submitted, SlotStatus::Approved)
                | (Self::Submitted, SlotStatus::Rejected)
        )
    }
}

/// The company a slot targets, as shown to the holder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRef {
    id: CompanyId,
    name: String,
    review_link: String,
}

impl CompanyRef {
    pub fn new(id: CompanyId, name: impl Into<String>, review_link: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            review_link: review_link.into(),
        }
    }

    pub fn id(&self) -> CompanyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// External page where the review must be posted.
    pub fn review_link(&self) -> &str {
        &self.review_link
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("company name cannot be empty"));
        }
        if self.review_link.trim().is_empty() {
            return Err(DomainError::validation("company review link cannot be empty"));
        }
        Ok(())
    }
}

/// Evidence that the review was actually posted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofRef {
    /// Direct link to the published review
    Link(String),
    /// Path of an uploaded screenshot asset
    Upload(String),
}

impl ProofRef {
    pub fn link(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::validation("proof link cannot be empty"));
        }
        Ok(Self::Link(value))
    }

    pub fn upload(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(DomainError::validation("proof upload path cannot be empty"));
        }
        Ok(Self::Upload(path))
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Link(v) | Self::Upload(v) => v,
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link(_))
    }
}

/// A review slot record as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSlot {
    id: SlotId,
    company: CompanyRef,
    status: SlotStatus,
    proof_ref: Option<ProofRef>,
    reserved_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

impl ReviewSlot {
    pub fn new(id: SlotId, company: CompanyRef, status: SlotStatus) -> Self {
        Self {
            id,
            company,
            status,
            proof_ref: None,
            reserved_at: None,
            expires_at: None,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn company(&self) -> &CompanyRef {
        &self.company
    }

    pub fn status(&self) -> SlotStatus {
        self.status
    }

    pub fn proof_ref(&self) -> Option<&ProofRef> {
        self.proof_ref.as_ref()
    }

    pub fn reserved_at(&self) -> Option<DateTime<Utc>> {
        self.reserved_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    // === Builder Methods ===

    pub fn with_proof_ref(mut self, proof_ref: ProofRef) -> Self {
        self.proof_ref = Some(proof_ref);
        self
    }

    pub fn with_reserved_at(mut self, reserved_at: DateTime<Utc>) -> Self {
        self.reserved_at = Some(reserved_at);
        self
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.company.validate()
    }

    /// Convert into the held-slot form the lifecycle controller works with.
    ///
    /// Only a `reserved` slot with a known deadline can be held; anything
    /// else is a state the controller must not enter.
    pub fn into_active(self) -> Result<ActiveReservation, DomainError> {
        if self.status != SlotStatus::Reserved {
            return Err(DomainError::invalid_state_transition(format!(
                "cannot hold slot {} in status {:?}",
                self.id, self.status
            )));
        }
        let expires_at = self.expires_at.ok_or_else(|| {
            DomainError::validation(format!("reserved slot {} has no deadline", self.id))
        })?;
        let mut active = ActiveReservation::new(self.id, self.company, expires_at);
        if let Some(reserved_at) = self.reserved_at {
            active = active.with_reserved_at(reserved_at);
        }
        Ok(active)
    }
}

/// The single slot currently held by this user, with a guaranteed deadline
///
/// The deadline comes from the server and is never adjusted locally; all
/// remaining-time math is a pure function of it and the provided `now`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveReservation {
    slot_id: SlotId,
    company: CompanyRef,
    reserved_at: Option<DateTime<Utc>>,
    expires_at: DateTime<Utc>,
}

impl ActiveReservation {
    pub fn new(slot_id: SlotId, company: CompanyRef, expires_at: DateTime<Utc>) -> Self {
        Self {
            slot_id,
            company,
            reserved_at: None,
            expires_at,
        }
    }

    pub fn with_reserved_at(mut self, reserved_at: DateTime<Utc>) -> Self {
        self.reserved_at = Some(reserved_at);
        self
    }

    pub fn slot_id(&self) -> SlotId {
        self.slot_id
    }

    pub fn company(&self) -> &CompanyRef {
        &self.company
    }

    pub fn reserved_at(&self) -> Option<DateTime<Utc>> {
        self.reserved_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Time left before the deadline, clamped at zero.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        std::cmp::max(self.expires_at - now, Duration::zero())
    }

    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Full reservation window, for progress display.
    ///
    /// Falls back to [`DEFAULT_RESERVATION_WINDOW_SECS`] when the server did
    /// not report `reserved_at`.
    pub fn window(&self) -> Duration {
        match self.reserved_at {
            Some(reserved_at) if reserved_at < self.expires_at => self.expires_at - reserved_at,
            _ => Duration::seconds(DEFAULT_RESERVATION_WINDOW_SECS),
        }
    }
}

/// One row of the user's own review history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewHistoryEntry {
    slot_id: SlotId,
    company_name: String,
    status: SlotStatus,
    proof_ref: Option<ProofRef>,
    created_at: Option<DateTime<Utc>>,
}

impl ReviewHistoryEntry {
    pub fn new(slot_id: SlotId, company_name: impl Into<String>, status: SlotStatus) -> Self {
        Self {
            slot_id,
            company_name: company_name.into(),
            status,
            proof_ref: None,
            created_at: None,
        }
    }

    pub fn with_proof_ref(mut self, proof_ref: ProofRef) -> Self {
        self.proof_ref = Some(proof_ref);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn slot_id(&self) -> SlotId {
        self.slot_id
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn status(&self) -> SlotStatus {
        self.status
    }

    pub fn proof_ref(&self) -> Option<&ProofRef> {
        self.proof_ref.as_ref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}
