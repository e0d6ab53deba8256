//! Account port - wallet, review history, withdrawals, and profile.

use async_trait::async_trait;

use commenter_domain::{Profile, ReviewHistoryEntry, Wallet, WalletTransaction, WithdrawRequest};

use super::service_error::ServiceError;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountPort: Send + Sync {
    /// The user's wallet balances. A user with no wallet row yet is reported
    /// as an empty wallet.
    async fn fetch_wallet(&self) -> Result<Wallet, ServiceError>;

    /// Recent wallet movements, newest first.
    async fn fetch_transactions(&self) -> Result<Vec<WalletTransaction>, ServiceError>;

    /// The user's own review history across all statuses.
    async fn list_my_reviews(&self) -> Result<Vec<ReviewHistoryEntry>, ServiceError>;

    /// Ask the backend to queue a payout of the full available balance.
    async fn request_withdrawal(&self) -> Result<(), ServiceError>;

    /// The user's own withdrawal requests, newest first.
    async fn list_my_withdrawals(&self) -> Result<Vec<WithdrawRequest>, ServiceError>;

    /// The user's profile; a missing row is reported as an empty profile.
    async fn fetch_profile(&self) -> Result<Profile, ServiceError>;

    /// Replace the user's profile fields.
    async fn update_profile(&self, profile: Profile) -> Result<(), ServiceError>;
}
