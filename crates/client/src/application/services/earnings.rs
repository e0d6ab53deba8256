//! Earnings service - wallet balances, pending rewards, and withdrawals.

use std::sync::Arc;

use commenter_domain::{
    pending_balance_cents, SlotStatus, Wallet, WalletTransaction, WithdrawRequest,
};

use crate::ports::outbound::{AccountPort, ServiceError};

/// Balances shown on the earnings screen.
///
/// `pending_cents` is derived client-side: every review still under
/// moderation is worth the standard reward if approved.
#[derive(Debug, Clone, PartialEq)]
pub struct EarningsOverview {
    pub wallet: Wallet,
    pub pending_cents: i64,
    pub submitted_count: u32,
}

#[derive(Clone)]
pub struct EarningsService {
    account: Arc<dyn AccountPort>,
}

impl EarningsService {
    pub fn new(account: Arc<dyn AccountPort>) -> Self {
        Self { account }
    }

    /// Wallet balances plus the pending amount riding on moderation.
    pub async fn fetch_overview(&self) -> Result<EarningsOverview, ServiceError> {
        let wallet = self.account.fetch_wallet().await?;
        let reviews = self.account.list_my_reviews().await?;
        let submitted_count = reviews
            .iter()
            .filter(|entry| entry.status() == SlotStatus::Submitted)
            .count() as u32;
        Ok(EarningsOverview {
            wallet,
            pending_cents: pending_balance_cents(submitted_count),
            submitted_count,
        })
    }

    /// Recent wallet movements, newest first.
    pub async fn fetch_transactions(&self) -> Result<Vec<WalletTransaction>, ServiceError> {
        self.account.fetch_transactions().await
    }

    /// Queue a payout of the full available balance.
    ///
    /// The backend validates balance and payout details; its message is
    /// surfaced unchanged on failure.
    pub async fn request_withdrawal(&self) -> Result<(), ServiceError> {
        self.account.request_withdrawal().await?;
        tracing::info!("withdrawal requested");
        Ok(())
    }

    /// The user's withdrawal requests, newest first.
    pub async fn list_withdrawals(&self) -> Result<Vec<WithdrawRequest>, ServiceError> {
        self.account.list_my_withdrawals().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockAccountPort;
    use commenter_domain::{ReviewHistoryEntry, SlotId, REVIEW_REWARD_CENTS};

    #[tokio::test]
    async fn test_overview_counts_only_submitted_reviews_as_pending() {
        let mut account = MockAccountPort::new();
        account
            .expect_fetch_wallet()
            .times(1)
            .returning(|| Wallet::new(600, 2_400).map_err(ServiceError::from));
        account.expect_list_my_reviews().times(1).returning(|| {
            Ok(vec![
                ReviewHistoryEntry::new(SlotId::new(), "Padaria Central", SlotStatus::Submitted),
                ReviewHistoryEntry::new(SlotId::new(), "Auto Center Silva", SlotStatus::Submitted),
                ReviewHistoryEntry::new(SlotId::new(), "Pet Shop Amigo", SlotStatus::Approved),
                ReviewHistoryEntry::new(SlotId::new(), "Padaria Central", SlotStatus::Expired),
            ])
        });

        let service = EarningsService::new(Arc::new(account));
        let overview = service.fetch_overview().await.unwrap();
        assert_eq!(overview.submitted_count, 2);
        assert_eq!(overview.pending_cents, 2 * REVIEW_REWARD_CENTS);
        assert_eq!(overview.wallet.available_cents(), 600);
    }

    #[tokio::test]
    async fn test_withdrawal_error_is_passed_through() {
        let mut account = MockAccountPort::new();
        account.expect_request_withdrawal().times(1).returning(|| {
            Err(ServiceError::Validation(
                "add a PIX key to your profile first".to_string(),
            ))
        });

        let service = EarningsService::new(Arc::new(account));
        let err = service.request_withdrawal().await.unwrap_err();
        assert_eq!(err.to_string(), "validation failed: add a PIX key to your profile first");
    }
}
