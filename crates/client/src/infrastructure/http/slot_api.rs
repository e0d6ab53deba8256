//! Slot reservation adapter over the backend's REST surface

use async_trait::async_trait;
use std::sync::Arc;

use commenter_domain::{ActiveReservation, CompanyId, CompanySummary, ProofRef, ReviewSlot, SlotId};
use commenter_shared::endpoints::{functions, views};
use commenter_shared::{
    ActiveSlotRow, AvailableCompanyRow, ProofKind, ReleaseSlotParams, ReservationRow,
    ReserveSlotParams, SubmitProofParams,
};

use super::{decode_record, decode_rows, encode_params};
use crate::ports::outbound::{RestApiPort, ServiceError, SlotServicePort};

/// Columns selected for slot reads, with the company embedded as a nested
/// resource.
const SLOT_SELECT: &str =
    "select=id,status,reserved_at,expires_at,proof_ref,proof_kind,company:companies(id,name,review_link)";

/// Backend adapter for [`SlotServicePort`].
///
/// Row-level security already scopes `review_slots` to the caller, so the
/// active-slot read needs no user filter. Reads deliberately skip any
/// `expires_at` filter: a hold the backend still records as `reserved` must
/// surface even when its deadline has passed, so the caller can finish the
/// expiry with an explicit release instead of silently dropping it.
#[derive(Clone)]
pub struct SlotApi {
    api: Arc<dyn RestApiPort>,
}

impl SlotApi {
    pub fn new(api: Arc<dyn RestApiPort>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SlotServicePort for SlotApi {
    async fn reserve_slot(&self, company_id: CompanyId) -> Result<ActiveReservation, ServiceError> {
        let params = encode_params(&ReserveSlotParams {
            p_company_id: company_id.to_uuid(),
        })?;
        let value = self.api.post_rpc(functions::RESERVE_SLOT, params).await?;
        let row: ReservationRow = decode_record(value)?;
        Ok(ActiveReservation::try_from(row)?)
    }

    async fn fetch_active_slot(&self) -> Result<Option<ActiveReservation>, ServiceError> {
        let path = format!(
            "{}?{}&status=eq.reserved&limit=1",
            views::REVIEW_SLOTS,
            SLOT_SELECT
        );
        let value = self.api.get_json(&path).await?;
        let rows: Vec<ActiveSlotRow> = decode_rows(value)?;
        match rows.into_iter().next() {
            None => Ok(None),
            Some(row) => {
                let slot = ReviewSlot::try_from(row)?;
                Ok(Some(slot.into_active()?))
            }
        }
    }

    async fn fetch_slot_detail(&self, slot_id: SlotId) -> Result<ReviewSlot, ServiceError> {
        let path = format!(
            "{}?{}&id=eq.{}&limit=1",
            views::REVIEW_SLOTS,
            SLOT_SELECT,
            slot_id
        );
        let value = self.api.get_json(&path).await?;
        let rows: Vec<ActiveSlotRow> = decode_rows(value)?;
        let row = rows.into_iter().next().ok_or_else(|| {
            ServiceError::SlotNotFound(format!("slot {slot_id} is gone from the backend"))
        })?;
        Ok(ReviewSlot::try_from(row)?)
    }

    async fn submit_proof(&self, slot_id: SlotId, proof: ProofRef) -> Result<(), ServiceError> {
        let kind = if proof.is_link() {
            ProofKind::Link
        } else {
            ProofKind::Upload
        };
        let params = encode_params(&SubmitProofParams {
            p_slot_id: slot_id.to_uuid(),
            p_proof_ref: proof.value().to_string(),
            p_proof_kind: kind,
        })?;
        self.api
            .post_rpc_no_response(functions::SUBMIT_REVIEW_PROOF, params)
            .await
    }

    async fn release_or_expire_slot(&self, slot_id: SlotId) -> Result<(), ServiceError> {
        let params = encode_params(&ReleaseSlotParams {
            p_slot_id: slot_id.to_uuid(),
        })?;
        self.api
            .post_rpc_no_response(functions::RELEASE_SLOT, params)
            .await
    }

    async fn list_available_companies(&self) -> Result<Vec<CompanySummary>, ServiceError> {
        let path = format!(
            "{}?select=id,name,open_capacity&order=name.asc",
            views::AVAILABLE_COMPANIES
        );
        let value = self.api.get_json(&path).await?;
        let rows: Vec<AvailableCompanyRow> = decode_rows(value)?;
        Ok(rows.into_iter().map(CompanySummary::from).collect())
    }
}
