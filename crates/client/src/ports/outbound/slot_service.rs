//! Remote slot service port.
//!
//! Everything the slot lifecycle needs from the backend. The server is the
//! authority on reservation state and deadlines; this port only reports and
//! requests, it never decides.

use async_trait::async_trait;

use commenter_domain::{ActiveReservation, CompanyId, CompanySummary, ProofRef, ReviewSlot, SlotId};

use super::service_error::ServiceError;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SlotServicePort: Send + Sync {
    /// Atomically reserve one open slot of the given company for this user.
    ///
    /// Fails with `NoCapacity` when the company is full and
    /// `AlreadyHoldingSlot` when the user already holds one.
    async fn reserve_slot(&self, company_id: CompanyId)
        -> Result<ActiveReservation, ServiceError>;

    /// The user's currently reserved slot, if any.
    ///
    /// Overdue holds are included so the caller can release them explicitly.
    async fn fetch_active_slot(&self) -> Result<Option<ActiveReservation>, ServiceError>;

    /// Full record of one slot, regardless of status.
    async fn fetch_slot_detail(&self, slot_id: SlotId) -> Result<ReviewSlot, ServiceError>;

    /// Attach proof to a held slot and move it to moderation.
    async fn submit_proof(&self, slot_id: SlotId, proof: ProofRef) -> Result<(), ServiceError>;

    /// Mark the slot expired and return its capacity to the pool.
    ///
    /// Idempotent server-side: releasing an already-expired slot succeeds.
    async fn release_or_expire_slot(&self, slot_id: SlotId) -> Result<(), ServiceError>;

    /// Companies that currently have open capacity.
    async fn list_available_companies(&self) -> Result<Vec<CompanySummary>, ServiceError>;
}
