//! Admin port - moderation queue, payouts, and company registration.
//!
//! Admin reads come back as raw read-model rows (`AdminReviewRow`,
//! `AdminWithdrawalRow`); they are display data, not domain state.

use async_trait::async_trait;

use commenter_domain::{Company, SlotId, WithdrawalId};
use commenter_shared::{AdminReviewRow, AdminWithdrawalRow};

use super::service_error::ServiceError;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AdminPort: Send + Sync {
    /// Whether the current user has the admin role.
    async fn is_admin(&self) -> Result<bool, ServiceError>;

    /// Submitted reviews awaiting moderation, oldest first.
    async fn list_review_queue(&self) -> Result<Vec<AdminReviewRow>, ServiceError>;

    /// Approve a submitted review, crediting the given reward.
    async fn approve_review(&self, slot_id: SlotId, amount_cents: i64)
        -> Result<(), ServiceError>;

    /// Reject a submitted review.
    async fn reject_review(&self, slot_id: SlotId) -> Result<(), ServiceError>;

    /// All withdrawal requests across users.
    async fn list_withdrawals(&self) -> Result<Vec<AdminWithdrawalRow>, ServiceError>;

    /// Mark a withdrawal as paid out.
    async fn mark_withdrawal_paid(&self, withdrawal_id: WithdrawalId)
        -> Result<(), ServiceError>;

    /// Register a new company with a paid review package.
    async fn create_company(
        &self,
        name: String,
        review_link: String,
        package_limit: u32,
    ) -> Result<(), ServiceError>;

    /// All registered companies with their package progress.
    async fn list_companies(&self) -> Result<Vec<Company>, ServiceError>;
}
