//! Admin service - moderation, payouts, and company registration.

use std::sync::Arc;

use url::Url;

use commenter_domain::{Company, SlotId, WithdrawalId, REVIEW_REWARD_CENTS};
use commenter_shared::{AdminReviewRow, AdminWithdrawalRow};

use crate::ports::outbound::{AdminPort, ServiceError};

#[derive(Clone)]
pub struct AdminService {
    admin: Arc<dyn AdminPort>,
}

impl AdminService {
    pub fn new(admin: Arc<dyn AdminPort>) -> Self {
        Self { admin }
    }

    /// Whether the current user may see the admin screens at all.
    ///
    /// Display gating only; every admin call is re-checked server-side.
    pub async fn is_admin(&self) -> Result<bool, ServiceError> {
        self.admin.is_admin().await
    }

    /// Submitted reviews awaiting a decision, oldest first.
    pub async fn review_queue(&self) -> Result<Vec<AdminReviewRow>, ServiceError> {
        self.admin.list_review_queue().await
    }

    /// Approve a review at the standard reward.
    pub async fn approve(&self, slot_id: SlotId) -> Result<(), ServiceError> {
        self.approve_with_amount(slot_id, REVIEW_REWARD_CENTS).await
    }

    /// Approve a review crediting a custom amount.
    pub async fn approve_with_amount(
        &self,
        slot_id: SlotId,
        amount_cents: i64,
    ) -> Result<(), ServiceError> {
        if amount_cents <= 0 {
            return Err(ServiceError::Validation(
                "reward amount must be positive".to_string(),
            ));
        }
        self.admin.approve_review(slot_id, amount_cents).await?;
        tracing::info!(%slot_id, amount_cents, "review approved");
        Ok(())
    }

    pub async fn reject(&self, slot_id: SlotId) -> Result<(), ServiceError> {
        self.admin.reject_review(slot_id).await?;
        tracing::info!(%slot_id, "review rejected");
        Ok(())
    }

    /// All withdrawal requests across users.
    pub async fn withdrawals(&self) -> Result<Vec<AdminWithdrawalRow>, ServiceError> {
        self.admin.list_withdrawals().await
    }

    pub async fn mark_paid(&self, withdrawal_id: WithdrawalId) -> Result<(), ServiceError> {
        self.admin.mark_withdrawal_paid(withdrawal_id).await?;
        tracing::info!(%withdrawal_id, "withdrawal marked paid");
        Ok(())
    }

    /// Register a company with a paid package of review slots.
    ///
    /// The review link must be an absolute URL; users are sent there to
    /// post their reviews.
    pub async fn create_company(
        &self,
        name: impl Into<String>,
        review_link: impl Into<String>,
        package_limit: u32,
    ) -> Result<(), ServiceError> {
        let name = name.into();
        let review_link = review_link.into();
        if name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "company name cannot be empty".to_string(),
            ));
        }
        if Url::parse(&review_link).is_err() {
            return Err(ServiceError::Validation(
                "review link must be a full URL".to_string(),
            ));
        }
        if package_limit == 0 {
            return Err(ServiceError::Validation(
                "package limit must be at least 1".to_string(),
            ));
        }
        self.admin
            .create_company(name.clone(), review_link, package_limit)
            .await?;
        tracing::info!(company = %name, package_limit, "company registered");
        Ok(())
    }

    /// All registered companies with package progress.
    pub async fn companies(&self) -> Result<Vec<Company>, ServiceError> {
        self.admin.list_companies().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockAdminPort;

    #[tokio::test]
    async fn test_approve_uses_standard_reward() {
        let slot_id = SlotId::new();
        let mut admin = MockAdminPort::new();
        admin
            .expect_approve_review()
            .times(1)
            .withf(move |id, cents| *id == slot_id && *cents == REVIEW_REWARD_CENTS)
            .returning(|_, _| Ok(()));

        let service = AdminService::new(Arc::new(admin));
        service.approve(slot_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_company_rejects_bad_link_locally() {
        // No expectation set: any backend call would panic.
        let service = AdminService::new(Arc::new(MockAdminPort::new()));

        let err = service
            .create_company("Padaria Central", "not a url", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = service
            .create_company("Padaria Central", "https://maps.example.com/p", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_zero_reward_approval_is_rejected() {
        let service = AdminService::new(Arc::new(MockAdminPort::new()));
        let err = service
            .approve_with_amount(SlotId::new(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
