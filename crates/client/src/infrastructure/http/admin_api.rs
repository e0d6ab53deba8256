//! Moderation and company-registration adapter (admin only)

use async_trait::async_trait;
use std::sync::Arc;

use commenter_domain::{Company, SlotId, WithdrawalId};
use commenter_shared::endpoints::{functions, views};
use commenter_shared::{
    AdminCompanyRow, AdminReviewRow, AdminWithdrawalRow, ApproveReviewParams, CreateCompanyParams,
    MarkWithdrawalPaidParams, RejectReviewParams,
};

use super::{decode_rows, encode_params};
use crate::ports::outbound::{AdminPort, RestApiPort, ServiceError};

/// Backend adapter for [`AdminPort`].
///
/// Every call targets admin-only views and functions; the backend rejects
/// them for a non-admin caller regardless of what the client shows.
#[derive(Clone)]
pub struct AdminApi {
    api: Arc<dyn RestApiPort>,
}

impl AdminApi {
    pub fn new(api: Arc<dyn RestApiPort>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AdminPort for AdminApi {
    async fn is_admin(&self) -> Result<bool, ServiceError> {
        let value = self
            .api
            .post_rpc(functions::IS_ADMIN, serde_json::json!({}))
            .await?;
        value
            .as_bool()
            .ok_or_else(|| ServiceError::Parse(format!("is_admin answered {value}")))
    }

    async fn list_review_queue(&self) -> Result<Vec<AdminReviewRow>, ServiceError> {
        let path = format!(
            "{}?select=slot_id,user_name,company_name,proof_ref,proof_kind,submitted_at&order=submitted_at.asc",
            views::ADMIN_REVIEW_QUEUE
        );
        decode_rows(self.api.get_json(&path).await?)
    }

    async fn approve_review(
        &self,
        slot_id: SlotId,
        amount_cents: i64,
    ) -> Result<(), ServiceError> {
        let params = encode_params(&ApproveReviewParams {
            p_slot_id: slot_id.to_uuid(),
            p_amount_cents: amount_cents,
        })?;
        self.api
            .post_rpc_no_response(functions::APPROVE_REVIEW, params)
            .await
    }

    async fn reject_review(&self, slot_id: SlotId) -> Result<(), ServiceError> {
        let params = encode_params(&RejectReviewParams {
            p_slot_id: slot_id.to_uuid(),
        })?;
        self.api
            .post_rpc_no_response(functions::REJECT_REVIEW, params)
            .await
    }

    async fn list_withdrawals(&self) -> Result<Vec<AdminWithdrawalRow>, ServiceError> {
        let path = format!(
            "{}?select=id,user_name,pix_key,pix_kind,amount_cents,status,requested_at&order=requested_at.desc",
            views::ADMIN_WITHDRAWALS
        );
        decode_rows(self.api.get_json(&path).await?)
    }

    async fn mark_withdrawal_paid(&self, withdrawal_id: WithdrawalId) -> Result<(), ServiceError> {
        let params = encode_params(&MarkWithdrawalPaidParams {
            p_withdrawal_id: withdrawal_id.to_uuid(),
        })?;
        self.api
            .post_rpc_no_response(functions::MARK_WITHDRAWAL_PAID, params)
            .await
    }

    async fn create_company(
        &self,
        name: String,
        review_link: String,
        package_limit: u32,
    ) -> Result<(), ServiceError> {
        let params = encode_params(&CreateCompanyParams {
            p_name: name,
            p_review_link: review_link,
            p_package_limit: package_limit,
        })?;
        self.api
            .post_rpc_no_response(functions::CREATE_COMPANY, params)
            .await
    }

    async fn list_companies(&self) -> Result<Vec<Company>, ServiceError> {
        let path = format!(
            "{}?select=id,name,review_link,package_limit,approved_count,open_capacity&order=name.asc",
            views::ADMIN_COMPANIES
        );
        let rows: Vec<AdminCompanyRow> = decode_rows(self.api.get_json(&path).await?)?;
        let companies = rows
            .into_iter()
            .map(Company::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(companies)
    }
}
