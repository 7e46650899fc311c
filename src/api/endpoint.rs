//! Declarative endpoint table.

use reqwest::Method;

use super::error::ApiError;

/// Backend a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Auction / marketplace service (`lelang`, approvals, configs).
    Auction,
    /// User, fish catalog and ledger service.
    Fishon,
}

/// Credential an endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Static service bearer from config; omitted when unset.
    ServiceToken,
    /// Bearer re-read from the session store for every call.
    Session,
    /// OAuth2 client id/secret as HTTP Basic auth.
    ClientCredentials,
}

/// One row of the endpoint table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub service: Service,
    pub method: Method,
    /// Path with `{name}` placeholders for path parameters.
    pub path: &'static str,
    pub auth: AuthMode,
}

/// Every backend action the facade knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Auction service
    GetConfig,
    GetAuctions,
    GetAdminAuctions,
    GetPendingAuctions,
    GetApprovals,
    ApproveApproval,
    AcceptOsposAuction,
    RejectOsposAuction,
    ProcessAuction,
    DeleteAuction,
    // Fishon service
    Login,
    GetCurrentUser,
    GetSeaseedUser,
    GetCurrentSeaseedUser,
    GetFishList,
    GetPerindoFishList,
    CreateFish,
    UpdateFish,
    DeleteFish,
    GetColdStorageList,
    GetBanks,
    GetTransactions,
    CreateAuction,
    CreateTransfer,
    CreateWithdrawal,
    ProcessCost,
    GetBniColdStorageList,
    GetCurrentBniAccount,
    GetBniAccountByNo,
    GetBniTransfers,
    CreateBniTransfer,
}

impl Operation {
    pub const ALL: [Operation; 31] = [
        Self::GetConfig,
        Self::GetAuctions,
        Self::GetAdminAuctions,
        Self::GetPendingAuctions,
        Self::GetApprovals,
        Self::ApproveApproval,
        Self::AcceptOsposAuction,
        Self::RejectOsposAuction,
        Self::ProcessAuction,
        Self::DeleteAuction,
        Self::Login,
        Self::GetCurrentUser,
        Self::GetSeaseedUser,
        Self::GetCurrentSeaseedUser,
        Self::GetFishList,
        Self::GetPerindoFishList,
        Self::CreateFish,
        Self::UpdateFish,
        Self::DeleteFish,
        Self::GetColdStorageList,
        Self::GetBanks,
        Self::GetTransactions,
        Self::CreateAuction,
        Self::CreateTransfer,
        Self::CreateWithdrawal,
        Self::ProcessCost,
        Self::GetBniColdStorageList,
        Self::GetCurrentBniAccount,
        Self::GetBniAccountByNo,
        Self::GetBniTransfers,
        Self::CreateBniTransfer,
    ];

    /// Stable snake_case name used in logs and error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::GetConfig => "get_config",
            Self::GetAuctions => "get_auctions",
            Self::GetAdminAuctions => "get_admin_auctions",
            Self::GetPendingAuctions => "get_pending_auctions",
            Self::GetApprovals => "get_approvals",
            Self::ApproveApproval => "approve_approval",
            Self::AcceptOsposAuction => "accept_ospos_auction",
            Self::RejectOsposAuction => "reject_ospos_auction",
            Self::ProcessAuction => "process_auction",
            Self::DeleteAuction => "delete_auction",
            Self::Login => "login",
            Self::GetCurrentUser => "get_current_user",
            Self::GetSeaseedUser => "get_seaseed_user",
            Self::GetCurrentSeaseedUser => "get_current_seaseed_user",
            Self::GetFishList => "get_fish_list",
            Self::GetPerindoFishList => "get_perindo_fish_list",
            Self::CreateFish => "create_fish",
            Self::UpdateFish => "update_fish",
            Self::DeleteFish => "delete_fish",
            Self::GetColdStorageList => "get_cold_storage_list",
            Self::GetBanks => "get_banks",
            Self::GetTransactions => "get_transactions",
            Self::CreateAuction => "create_auction",
            Self::CreateTransfer => "create_transfer",
            Self::CreateWithdrawal => "create_withdrawal",
            Self::ProcessCost => "process_cost",
            Self::GetBniColdStorageList => "get_bni_cold_storage_list",
            Self::GetCurrentBniAccount => "get_current_bni_account",
            Self::GetBniAccountByNo => "get_bni_account_by_no",
            Self::GetBniTransfers => "get_bni_transfers",
            Self::CreateBniTransfer => "create_bni_transfer",
        }
    }

    /// The endpoint-table row for this operation.
    #[must_use]
    pub fn endpoint(self) -> Endpoint {
        use AuthMode::{ClientCredentials, ServiceToken, Session};
        use Service::{Auction, Fishon};

        let (service, method, path, auth) = match self {
            Self::GetConfig => (Auction, Method::GET, "/seaseed/configs/", ServiceToken),
            Self::GetAuctions | Self::GetAdminAuctions => {
                (Auction, Method::GET, "/lelang/v2/auctions/pfx/", ServiceToken)
            }
            Self::GetPendingAuctions => (Auction, Method::GET, "/lelang/v2/auctions/pending/", ServiceToken),
            Self::GetApprovals => (Auction, Method::GET, "/seaseed/approvals/", ServiceToken),
            Self::ApproveApproval => (Auction, Method::POST, "/seaseed/approvals/{user_id}/", ServiceToken),
            Self::AcceptOsposAuction => (Auction, Method::POST, "/lelang/v2/auctions/accept/", ServiceToken),
            Self::RejectOsposAuction => (Auction, Method::POST, "/lelang/v2/auctions/reject/", ServiceToken),
            Self::ProcessAuction => (Auction, Method::POST, "/lelang/v2/auctions/process/", ServiceToken),
            Self::DeleteAuction => (Auction, Method::DELETE, "/lelang/v2/auctions/{id}", ServiceToken),

            Self::Login => (Fishon, Method::POST, "/o/token/", ClientCredentials),
            Self::GetCurrentUser => (Fishon, Method::GET, "/api/user/myprofile/", Session),
            Self::GetSeaseedUser => (Fishon, Method::GET, "/api/seaseed/users/", Session),
            Self::GetCurrentSeaseedUser => (Fishon, Method::GET, "/api/seaseed/users/current/", Session),
            Self::GetFishList | Self::GetPerindoFishList => (Fishon, Method::GET, "/api/log/ikan/", Session),
            Self::CreateFish => (Fishon, Method::POST, "/api/log/ikan/", Session),
            Self::UpdateFish => (Fishon, Method::PUT, "/api/log/ikan/{id}/", Session),
            Self::DeleteFish => (Fishon, Method::DELETE, "/api/log/ikan/{id}/", Session),
            Self::GetColdStorageList => (Fishon, Method::GET, "/api/seaseed/users/coldstorage/", Session),
            Self::GetBanks => (Fishon, Method::GET, "/api/seaseed/banks/", Session),
            Self::GetTransactions => (Fishon, Method::GET, "/api/seaseed/transactions/", Session),
            Self::CreateAuction => (Fishon, Method::POST, "/api/jual/", Session),
            Self::CreateTransfer => (Fishon, Method::POST, "/api/seaseed/transfers/", Session),
            Self::CreateWithdrawal => (Fishon, Method::POST, "/api/seaseed/withdrawals/", Session),
            Self::ProcessCost => (Fishon, Method::POST, "/api/seaseed/process/", Session),
            Self::GetBniColdStorageList => (Fishon, Method::GET, "/api/user/coldstorage/", Session),
            Self::GetCurrentBniAccount | Self::GetBniAccountByNo => {
                (Fishon, Method::GET, "/api/bni/accounts/", Session)
            }
            Self::GetBniTransfers => (Fishon, Method::GET, "/api/bni/transfers/", Session),
            Self::CreateBniTransfer => (Fishon, Method::POST, "/api/bni/transfers/", Session),
        };

        Endpoint { service, method, path, auth }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Substitute `{name}` placeholders in `template` from `params`.
///
/// # Errors
///
/// Returns [`ApiError::MissingPathParam`] if a placeholder has no value or
/// is left unterminated.
pub fn render_path(operation: Operation, template: &str, params: &[(&'static str, String)]) -> Result<String, ApiError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            return Err(ApiError::MissingPathParam { operation: operation.name(), param: after.to_owned() });
        };
        let name = &after[..end];
        let Some((_, value)) = params.iter().find(|(key, _)| *key == name) else {
            return Err(ApiError::MissingPathParam { operation: operation.name(), param: name.to_owned() });
        };
        out.push_str(value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

#[cfg(test)]
#[path = "endpoint_test.rs"]
mod tests;
