//! Auction service operations.
//!
//! Every call fails the way [`ApiClient::dispatch`] does.

#![allow(clippy::missing_errors_doc)]

use serde_json::{Value, json};

use super::client::ApiClient;
use super::endpoint::Operation;
use super::error::ApiError;
use super::request::Params;
use super::transport::Transport;

impl<T: Transport> ApiClient<T> {
    /// Config value by key.
    pub async fn get_config(&self, key: &str) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetConfig, Params::new().query("key", key))
            .await
    }

    /// Public auctions, sorted and searched.
    pub async fn get_auctions(&self, sort: &str, search: &str) -> Result<Value, ApiError> {
        let params = Params::new()
            .query("sort", sort)
            .query("search", search);
        self.dispatch(Operation::GetAuctions, params).await
    }

    /// This month's auctions, newest first, filtered by fisherman name.
    pub async fn get_admin_auctions(&self, fisherman: &str) -> Result<Value, ApiError> {
        let params = Params::new()
            .query("sort", "created")
            .query("range", "month")
            .query("fisherman", fisherman);
        self.dispatch(Operation::GetAdminAuctions, params).await
    }

    /// Pending Ospos auctions for a store/area code.
    pub async fn get_pending_auctions(&self, store_code: &str) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetPendingAuctions, Params::new().query("store", store_code))
            .await
    }

    /// Users waiting for approval.
    pub async fn get_approvals(&self) -> Result<Value, ApiError> {
        self.dispatch(Operation::GetApprovals, Params::new()).await
    }

    /// Approve (`true`) or reject (`false`) a pending user.
    pub async fn approve_approval(&self, user_id: u64, approve: bool) -> Result<Value, ApiError> {
        let params = Params::new()
            .path("user_id", user_id)
            .json(json!({ "approve": approve }));
        self.dispatch(Operation::ApproveApproval, params).await
    }

    /// Accept a pending Ospos auction and open it for `duration_minutes`.
    ///
    /// `group` targets the auction at a buyer group; `None` or empty leaves
    /// it open to all.
    pub async fn accept_ospos_auction(
        &self,
        area_code: &str,
        ospos_auction_id: u64,
        duration_minutes: u32,
        group: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut fields = vec![
            ("store", area_code.to_owned()),
            ("ospos_auction_id", ospos_auction_id.to_string()),
            ("minute", duration_minutes.to_string()),
        ];
        if let Some(group) = group.filter(|g| !g.is_empty()) {
            fields.push(("group", group.to_owned()));
        }
        self.dispatch(Operation::AcceptOsposAuction, Params::new().form(fields))
            .await
    }

    /// Reject a pending Ospos auction.
    pub async fn reject_ospos_auction(&self, area_code: &str, ospos_auction_id: u64) -> Result<Value, ApiError> {
        let params = Params::new().form([
            ("store", area_code.to_owned()),
            ("ospos_auction_id", ospos_auction_id.to_string()),
        ]);
        self.dispatch(Operation::RejectOsposAuction, params).await
    }

    /// Settle every finished auction now.
    pub async fn process_auction(&self) -> Result<Value, ApiError> {
        self.dispatch(Operation::ProcessAuction, Params::new()).await
    }

    /// Delete an auction nobody has bid on.
    pub async fn delete_auction(&self, id: u64) -> Result<Value, ApiError> {
        self.dispatch(Operation::DeleteAuction, Params::new().path("id", id))
            .await
    }
}

#[cfg(test)]
#[path = "auction_test.rs"]
mod tests;
