//! Parameter payloads for the backend's stored procedures
//!
//! Parameter names carry the backend's `p_` prefix verbatim; each struct
//! serializes to exactly the JSON body `POST /rpc/<fn>` expects.
//! `request_withdrawal` and `is_admin` take no parameters and are called
//! with an empty object.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rows::ProofKind;

/// Body for [`crate::endpoints::functions::RESERVE_SLOT`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReserveSlotParams {
    pub p_company_id: Uuid,
}

/// Body for [`crate::endpoints::functions::RELEASE_SLOT`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseSlotParams {
    pub p_slot_id: Uuid,
}

/// Body for [`crate::endpoints::functions::SUBMIT_REVIEW_PROOF`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitProofParams {
    pub p_slot_id: Uuid,
    pub p_proof_ref: String,
    pub p_proof_kind: ProofKind,
}

/// Body for [`crate::endpoints::functions::APPROVE_REVIEW`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveReviewParams {
    pub p_slot_id: Uuid,
    pub p_amount_cents: i64,
}

/// Body for [`crate::endpoints::functions::REJECT_REVIEW`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectReviewParams {
    pub p_slot_id: Uuid,
}

/// Body for [`crate::endpoints::functions::MARK_WITHDRAWAL_PAID`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkWithdrawalPaidParams {
    pub p_withdrawal_id: Uuid,
}

/// Body for [`crate::endpoints::functions::CREATE_COMPANY`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCompanyParams {
    pub p_name: String,
    pub p_review_link: String,
    pub p_package_limit: u32,
}

/// Body for [`crate::endpoints::functions::UPDATE_PROFILE`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfileParams {
    pub p_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_pix_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_pix_kind: Option<commenter_domain::PixKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_whatsapp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_params_shape() {
        let params = ReserveSlotParams {
            p_company_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "p_company_id": "00000000-0000-0000-0000-000000000000" })
        );
    }

    #[test]
    fn test_submit_proof_params_shape() {
        let params = SubmitProofParams {
            p_slot_id: Uuid::nil(),
            p_proof_ref: "reviews/abc.png".to_string(),
            p_proof_kind: ProofKind::Upload,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["p_proof_kind"], "upload");
        assert_eq!(json["p_proof_ref"], "reviews/abc.png");
    }

    #[test]
    fn test_update_profile_omits_unset_fields() {
        let params = UpdateProfileParams {
            p_name: "Maria Souza".to_string(),
            p_pix_key: None,
            p_pix_kind: None,
            p_whatsapp: None,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({ "p_name": "Maria Souza" }));
    }
}
