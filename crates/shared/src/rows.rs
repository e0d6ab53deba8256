//! Read-model rows and their conversions into domain entities
//!
//! Field names mirror the backend's columns verbatim (snake_case). Embedded
//! resources (`company`) use the backend's nested-select shape. Conversions
//! into domain entities live here so adapters stay serialization-free.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use commenter_domain::{
    ActiveReservation, Company, CompanyId, CompanyRef, CompanySummary, DomainError, PixKind,
    Profile, ProofRef, ReviewHistoryEntry, ReviewSlot, SlotId, SlotStatus, TransactionId,
    TransactionKind, Wallet, WalletTransaction, WithdrawRequest, WithdrawalId, WithdrawalStatus,
};

/// Proof storage form as recorded by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofKind {
    Link,
    Upload,
    /// Unknown kind for forward compatibility
    #[serde(other)]
    Unknown,
}

/// Builds a domain proof reference from the wire pair.
///
/// Unknown kinds degrade to the generic upload form rather than dropping the
/// evidence; an empty value is treated as no proof at all.
fn proof_from_wire(proof_ref: Option<String>, proof_kind: Option<ProofKind>) -> Option<ProofRef> {
    let value = proof_ref?;
    if value.trim().is_empty() {
        return None;
    }
    match proof_kind {
        Some(ProofKind::Link) => ProofRef::link(value).ok(),
        Some(ProofKind::Upload) | None => ProofRef::upload(value).ok(),
        Some(ProofKind::Unknown) => {
            tracing::warn!("unknown proof kind on wire, treating value as upload");
            ProofRef::upload(value).ok()
        }
    }
}

/// Embedded company resource on slot rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRefRow {
    pub id: Uuid,
    pub name: String,
    pub review_link: String,
}

impl From<CompanyRefRow> for CompanyRef {
    fn from(row: CompanyRefRow) -> Self {
        CompanyRef::new(CompanyId::from_uuid(row.id), row.name, row.review_link)
    }
}

/// A slot row selected from `review_slots` with its embedded company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSlotRow {
    pub id: Uuid,
    pub status: SlotStatus,
    #[serde(default)]
    pub reserved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub proof_ref: Option<String>,
    #[serde(default)]
    pub proof_kind: Option<ProofKind>,
    pub company: CompanyRefRow,
}

impl TryFrom<ActiveSlotRow> for ReviewSlot {
    type Error = DomainError;

    fn try_from(row: ActiveSlotRow) -> Result<Self, Self::Error> {
        let mut slot = ReviewSlot::new(
            SlotId::from_uuid(row.id),
            CompanyRef::from(row.company),
            row.status,
        );
        if let Some(reserved_at) = row.reserved_at {
            slot = slot.with_reserved_at(reserved_at);
        }
        if let Some(expires_at) = row.expires_at {
            slot = slot.with_expires_at(expires_at);
        }
        if let Some(proof) = proof_from_wire(row.proof_ref, row.proof_kind) {
            slot = slot.with_proof_ref(proof);
        }
        slot.validate()?;
        Ok(slot)
    }
}

/// Response of the `reserve_slot` stored procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRow {
    pub slot_id: Uuid,
    #[serde(default)]
    pub reserved_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub company: CompanyRefRow,
}

impl TryFrom<ReservationRow> for ActiveReservation {
    type Error = DomainError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let company = CompanyRef::from(row.company);
        company.validate()?;
        let mut active =
            ActiveReservation::new(SlotId::from_uuid(row.slot_id), company, row.expires_at);
        if let Some(reserved_at) = row.reserved_at {
            active = active.with_reserved_at(reserved_at);
        }
        Ok(active)
    }
}

/// One feed row from `available_companies`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableCompanyRow {
    pub id: Uuid,
    pub name: String,
    pub open_capacity: u32,
}

impl From<AvailableCompanyRow> for CompanySummary {
    fn from(row: AvailableCompanyRow) -> Self {
        CompanySummary::new(CompanyId::from_uuid(row.id), row.name, row.open_capacity)
    }
}

/// One row of the user's review history from `my_reviews`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyReviewRow {
    pub id: Uuid,
    pub company_name: String,
    pub status: SlotStatus,
    #[serde(default)]
    pub proof_ref: Option<String>,
    #[serde(default)]
    pub proof_kind: Option<ProofKind>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<MyReviewRow> for ReviewHistoryEntry {
    fn from(row: MyReviewRow) -> Self {
        let mut entry =
            ReviewHistoryEntry::new(SlotId::from_uuid(row.id), row.company_name, row.status);
        if let Some(proof) = proof_from_wire(row.proof_ref, row.proof_kind) {
            entry = entry.with_proof_ref(proof);
        }
        if let Some(created_at) = row.created_at {
            entry = entry.with_created_at(created_at);
        }
        entry
    }
}

/// The user's wallet row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRow {
    pub available_cents: i64,
    pub lifetime_cents: i64,
}

impl TryFrom<WalletRow> for Wallet {
    type Error = DomainError;

    fn try_from(row: WalletRow) -> Result<Self, Self::Error> {
        Wallet::new(row.available_cents, row.lifetime_cents)
    }
}

/// One wallet movement row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionRow> for WalletTransaction {
    fn from(row: TransactionRow) -> Self {
        WalletTransaction::new(
            TransactionId::from_uuid(row.id),
            row.kind,
            row.amount_cents,
            row.created_at,
        )
    }
}

/// One of the user's own withdrawal requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRow {
    pub id: Uuid,
    pub amount_cents: i64,
    pub status: WithdrawalStatus,
    pub pix_key: String,
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
}

impl From<WithdrawalRow> for WithdrawRequest {
    fn from(row: WithdrawalRow) -> Self {
        let mut request = WithdrawRequest::new(
            WithdrawalId::from_uuid(row.id),
            row.amount_cents,
            row.status,
            row.pix_key,
        );
        if let Some(requested_at) = row.requested_at {
            request = request.with_requested_at(requested_at);
        }
        request
    }
}

/// The user's profile row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pix_key: Option<String>,
    #[serde(default)]
    pub pix_kind: Option<PixKind>,
    #[serde(default)]
    pub whatsapp: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        let mut profile = Profile::new(row.name.unwrap_or_default());
        if let (Some(key), Some(kind)) = (row.pix_key, row.pix_kind) {
            profile = profile.with_pix(key, kind);
        }
        if let Some(whatsapp) = row.whatsapp {
            profile = profile.with_whatsapp(whatsapp);
        }
        profile
    }
}

/// One moderation-queue row from `admin_review_queue` (admin read model,
/// consumed as-is by the admin service)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminReviewRow {
    pub slot_id: Uuid,
    pub user_name: String,
    pub company_name: String,
    #[serde(default)]
    pub proof_ref: Option<String>,
    #[serde(default)]
    pub proof_kind: Option<ProofKind>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// One payout row from `admin_withdrawals`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminWithdrawalRow {
    pub id: Uuid,
    pub user_name: String,
    pub pix_key: String,
    #[serde(default)]
    pub pix_kind: Option<PixKind>,
    pub amount_cents: i64,
    pub status: WithdrawalStatus,
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
}

/// One company row from `admin_companies`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminCompanyRow {
    pub id: Uuid,
    pub name: String,
    pub review_link: String,
    pub package_limit: u32,
    pub approved_count: u32,
    pub open_capacity: u32,
}

impl TryFrom<AdminCompanyRow> for Company {
    type Error = DomainError;

    fn try_from(row: AdminCompanyRow) -> Result<Self, Self::Error> {
        let company = Company::new(
            CompanyId::from_uuid(row.id),
            row.name,
            row.review_link,
            row.package_limit,
        )
        .with_approved_count(row.approved_count)
        .with_open_capacity(row.open_capacity);
        company.validate()?;
        Ok(company)
    }
}
