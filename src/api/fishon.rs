//! Fishon service operations: session, users, fish catalog, ledger, BNI.
//!
//! Every call fails the way [`ApiClient::dispatch`] does.

#![allow(clippy::missing_errors_doc)]

use serde::Deserialize;
use serde_json::{Value, json};

use super::HEAD_OFFICE_REMARK;
use super::client::ApiClient;
use super::endpoint::Operation;
use super::error::ApiError;
use super::request::Params;
use super::transport::Transport;

/// Area-code prefix of Perindo fish.
const PERINDO_AREA_PREFIX: &str = "PI";

/// The part of the token endpoint's answer the client keeps.
#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
}

impl<T: Transport> ApiClient<T> {
    // =========================================================================
    // SESSION
    // =========================================================================

    /// Password-grant login. On success the returned `access_token` becomes
    /// the session token; on any failure the stored token is left as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<Value, ApiError> {
        let params = Params::new().form([
            ("username", username),
            ("password", password),
            ("grant_type", "password"),
        ]);
        let body = self.dispatch(Operation::Login, params).await?;

        let grant = TokenGrant::deserialize(&body)
            .map_err(|_| ApiError::MissingField { operation: Operation::Login.name(), field: "access_token" })?;
        self.session().set(&grant.access_token)?;
        tracing::info!(%username, "logged in");

        Ok(body)
    }

    /// Drop the session token. Always succeeds for an absent token.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session().clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// Profile of the logged-in user. Doubles as the session probe.
    pub async fn get_current_user(&self) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetCurrentUser, Params::new()).await
    }

    pub async fn get_seaseed_user(&self, uuid: &str) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetSeaseedUser, Params::new().query("uuid", uuid))
            .await
    }

    pub async fn get_current_seaseed_user(&self) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetCurrentSeaseedUser, Params::new())
            .await
    }

    /// Cold-storage users.
    pub async fn get_cold_storage_list(&self) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetColdStorageList, Params::new())
            .await
    }

    /// Cold-storage users with their BNI account numbers.
    pub async fn get_bni_cold_storage_list(&self) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetBniColdStorageList, Params::new())
            .await
    }

    // =========================================================================
    // FISH
    // =========================================================================

    /// Fish catalog, optionally limited to one area code.
    pub async fn get_fish_list(&self, area_code: Option<&str>) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetFishList, Params::new().query_opt("area", area_code))
            .await
    }

    /// Fish registered under Perindo areas only.
    pub async fn get_perindo_fish_list(&self) -> Result<Value, ApiError> {
        let params = Params::new().query("area-prefix", PERINDO_AREA_PREFIX);
        self.dispatch(Operation::GetPerindoFishList, params).await
    }

    pub async fn create_fish(&self, fish: &Value) -> Result<Value, ApiError> {
        self.dispatch(Operation::CreateFish, Params::new().json(fish.clone()))
            .await
    }

    pub async fn update_fish(&self, fish_id: u64, fish: &Value) -> Result<Value, ApiError> {
        let params = Params::new()
            .path("id", fish_id)
            .json(fish.clone());
        self.dispatch(Operation::UpdateFish, params).await
    }

    pub async fn delete_fish(&self, fish_id: u64) -> Result<Value, ApiError> {
        self.dispatch(Operation::DeleteFish, Params::new().path("id", fish_id))
            .await
    }

    /// Put fish up for auction. `group` is the buyer group
    /// (`pemindang` or `pabrik`); `fish` is forwarded as-is.
    pub async fn create_auction(&self, store_code: &str, group: &str, fish: &Value) -> Result<Value, ApiError> {
        let body = json!({ "store": store_code, "group": group, "data": fish });
        self.dispatch(Operation::CreateAuction, Params::new().json(body))
            .await
    }

    // =========================================================================
    // SEASEED LEDGER
    // =========================================================================

    pub async fn get_banks(&self) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetBanks, Params::new()).await
    }

    /// Transaction history of the logged-in Seaseed user.
    pub async fn get_transactions(&self) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetTransactions, Params::new()).await
    }

    /// Head-office transfer between two Seaseed users.
    pub async fn create_transfer(&self, from_uuid: &str, to_uuid: &str, amount: u64) -> Result<Value, ApiError> {
        let params = Params::new().form([
            ("from_user_uuid", from_uuid.to_owned()),
            ("to_user_uuid", to_uuid.to_owned()),
            ("amount", amount.to_string()),
            ("remark", HEAD_OFFICE_REMARK.to_owned()),
        ]);
        self.dispatch(Operation::CreateTransfer, params).await
    }

    pub async fn create_withdrawal(
        &self,
        amount: u64,
        email: &str,
        account_no: &str,
        bank_code: &str,
    ) -> Result<Value, ApiError> {
        let params = Params::new().form([
            ("amount", amount.to_string()),
            ("email", email.to_owned()),
            ("account_no", account_no.to_owned()),
            ("bank_code", bank_code.to_owned()),
        ]);
        self.dispatch(Operation::CreateWithdrawal, params).await
    }

    /// Charge admin cost for pending withdrawals.
    pub async fn process_cost(&self) -> Result<Value, ApiError> {
        self.dispatch(Operation::ProcessCost, Params::new()).await
    }

    // =========================================================================
    // BNI
    // =========================================================================

    pub async fn get_current_bni_account(&self) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetCurrentBniAccount, Params::new())
            .await
    }

    pub async fn get_bni_account_by_no(&self, account_no: &str) -> Result<Value, ApiError> {
        let params = Params::new().query("account_no", account_no);
        self.dispatch(Operation::GetBniAccountByNo, params).await
    }

    pub async fn get_bni_transfers(&self) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetBniTransfers, Params::new()).await
    }

    pub async fn create_bni_transfer(
        &self,
        from_account_no: &str,
        to_account_no: &str,
        amount: u64,
    ) -> Result<Value, ApiError> {
        let params = Params::new().form([
            ("from_account_no", from_account_no.to_owned()),
            ("to_account_no", to_account_no.to_owned()),
            ("amount", amount.to_string()),
            ("remark", HEAD_OFFICE_REMARK.to_owned()),
        ]);
        self.dispatch(Operation::CreateBniTransfer, params).await
    }
}

#[cfg(test)]
#[path = "fishon_test.rs"]
mod tests;
