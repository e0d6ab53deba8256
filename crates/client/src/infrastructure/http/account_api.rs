//! Wallet, review-history, withdrawal, and profile adapter

use async_trait::async_trait;
use std::sync::Arc;

use commenter_domain::{Profile, ReviewHistoryEntry, Wallet, WalletTransaction, WithdrawRequest};
use commenter_shared::endpoints::{functions, views};
use commenter_shared::{
    MyReviewRow, ProfileRow, TransactionRow, UpdateProfileParams, WalletRow, WithdrawalRow,
};

use super::{decode_rows, encode_params};
use crate::ports::outbound::{AccountPort, RestApiPort, ServiceError};

/// How many wallet movements a single fetch brings back.
const TRANSACTION_PAGE_SIZE: u32 = 50;

/// Backend adapter for [`AccountPort`].
///
/// Wallet and profile rows are provisioned lazily on the backend, so a
/// missing row is a normal answer for a fresh account and maps to the
/// empty value instead of an error.
#[derive(Clone)]
pub struct AccountApi {
    api: Arc<dyn RestApiPort>,
}

impl AccountApi {
    pub fn new(api: Arc<dyn RestApiPort>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AccountPort for AccountApi {
    async fn fetch_wallet(&self) -> Result<Wallet, ServiceError> {
        let path = format!(
            "{}?select=available_cents,lifetime_cents&limit=1",
            views::WALLETS
        );
        let value = self.api.get_json(&path).await?;
        let rows: Vec<WalletRow> = decode_rows(value)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Wallet::try_from(row)?),
            None => Ok(Wallet::default()),
        }
    }

    async fn fetch_transactions(&self) -> Result<Vec<WalletTransaction>, ServiceError> {
        let path = format!(
            "{}?select=id,kind,amount_cents,created_at&order=created_at.desc&limit={}",
            views::WALLET_TRANSACTIONS,
            TRANSACTION_PAGE_SIZE
        );
        let value = self.api.get_json(&path).await?;
        let rows: Vec<TransactionRow> = decode_rows(value)?;
        Ok(rows.into_iter().map(WalletTransaction::from).collect())
    }

    async fn list_my_reviews(&self) -> Result<Vec<ReviewHistoryEntry>, ServiceError> {
        let path = format!(
            "{}?select=id,company_name,status,proof_ref,proof_kind,created_at&order=created_at.desc",
            views::MY_REVIEWS
        );
        let value = self.api.get_json(&path).await?;
        let rows: Vec<MyReviewRow> = decode_rows(value)?;
        Ok(rows.into_iter().map(ReviewHistoryEntry::from).collect())
    }

    async fn request_withdrawal(&self) -> Result<(), ServiceError> {
        self.api
            .post_rpc_no_response(functions::REQUEST_WITHDRAWAL, serde_json::json!({}))
            .await
    }

    async fn list_my_withdrawals(&self) -> Result<Vec<WithdrawRequest>, ServiceError> {
        let path = format!(
            "{}?select=id,amount_cents,status,pix_key,requested_at&order=requested_at.desc",
            views::WITHDRAW_REQUESTS
        );
        let value = self.api.get_json(&path).await?;
        let rows: Vec<WithdrawalRow> = decode_rows(value)?;
        Ok(rows.into_iter().map(WithdrawRequest::from).collect())
    }

    async fn fetch_profile(&self) -> Result<Profile, ServiceError> {
        let path = format!(
            "{}?select=name,pix_key,pix_kind,whatsapp&limit=1",
            views::PROFILES
        );
        let value = self.api.get_json(&path).await?;
        let rows: Vec<ProfileRow> = decode_rows(value)?;
        Ok(rows
            .into_iter()
            .next()
            .map(Profile::from)
            .unwrap_or_else(|| Profile::new("")))
    }

    async fn update_profile(&self, profile: Profile) -> Result<(), ServiceError> {
        let params = encode_params(&UpdateProfileParams {
            p_name: profile.name().to_string(),
            p_pix_key: profile.pix_key().map(str::to_string),
            p_pix_kind: profile.pix_kind(),
            p_whatsapp: profile.whatsapp().map(str::to_string),
        })?;
        self.api
            .post_rpc_no_response(functions::UPDATE_PROFILE, params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockRestApiPort;
    use commenter_domain::PixKind;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_missing_wallet_row_reads_as_empty_wallet() {
        let mut api = MockRestApiPort::new();
        api.expect_get_json()
            .withf(|path| path.starts_with("wallets?"))
            .returning(|_| Ok(json!([])));

        let adapter = AccountApi::new(Arc::new(api));
        let wallet = adapter.fetch_wallet().await.unwrap();
        assert_eq!(wallet.available_cents(), 0);
        assert_eq!(wallet.lifetime_cents(), 0);
    }

    #[tokio::test]
    async fn test_wallet_row_decodes_balances() {
        let mut api = MockRestApiPort::new();
        api.expect_get_json()
            .returning(|_| Ok(json!([{ "available_cents": 900, "lifetime_cents": 4_500 }])));

        let adapter = AccountApi::new(Arc::new(api));
        let wallet = adapter.fetch_wallet().await.unwrap();
        assert_eq!(wallet.available_cents(), 900);
        assert_eq!(wallet.lifetime_cents(), 4_500);
    }

    #[tokio::test]
    async fn test_transactions_survive_unknown_kind_vocabulary() {
        let mut api = MockRestApiPort::new();
        api.expect_get_json().returning(|_| {
            Ok(json!([
                {
                    "id": Uuid::new_v4(),
                    "kind": "earning",
                    "amount_cents": 300,
                    "created_at": "2026-03-01T12:00:00Z"
                },
                {
                    "id": Uuid::new_v4(),
                    "kind": "adjustment",
                    "amount_cents": -50,
                    "created_at": "2026-03-02T12:00:00Z"
                },
            ]))
        });

        let adapter = AccountApi::new(Arc::new(api));
        let transactions = adapter.fetch_transactions().await.unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(
            transactions[0].kind(),
            commenter_domain::TransactionKind::Earning
        );
        assert_eq!(
            transactions[1].kind(),
            commenter_domain::TransactionKind::Unknown
        );
    }

    #[tokio::test]
    async fn test_missing_profile_row_reads_as_blank_profile() {
        let mut api = MockRestApiPort::new();
        api.expect_get_json().returning(|_| Ok(json!([])));

        let adapter = AccountApi::new(Arc::new(api));
        let profile = adapter.fetch_profile().await.unwrap();
        assert_eq!(profile.name(), "");
        assert!(!profile.has_payout_details());
    }

    #[tokio::test]
    async fn test_update_profile_carries_pix_fields() {
        let mut api = MockRestApiPort::new();
        api.expect_post_rpc_no_response()
            .withf(|function, params| {
                function == "update_profile"
                    && params["p_name"] == "Maria Souza"
                    && params["p_pix_key"] == "maria@example.com"
                    && params["p_pix_kind"] == "email"
            })
            .returning(|_, _| Ok(()));

        let adapter = AccountApi::new(Arc::new(api));
        let profile = Profile::new("Maria Souza").with_pix("maria@example.com", PixKind::Email);
        adapter.update_profile(profile).await.unwrap();
    }

    #[tokio::test]
    async fn test_request_withdrawal_takes_no_parameters() {
        let mut api = MockRestApiPort::new();
        api.expect_post_rpc_no_response()
            .withf(|function, params| function == "request_withdrawal" && params == &json!({}))
            .returning(|_, _| Ok(()));

        let adapter = AccountApi::new(Arc::new(api));
        adapter.request_withdrawal().await.unwrap();
    }
}
