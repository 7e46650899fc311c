//! API client facade over the auction and Fishon backends.
//!
//! DESIGN
//! ======
//! Every backend action is one row in the [`Operation`] endpoint table
//! (service, method, path template, auth mode). [`ApiClient::dispatch`]
//! turns an operation plus [`Params`] into an [`ApiRequest`], attaches the
//! credential the row asks for, and hands it to a [`Transport`]. The named
//! methods in `auction` and `fishon` only adapt typed arguments to params.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses and transport failures come back unchanged as
//! [`ApiError`]. Nothing here retries.

mod auction;
pub mod client;
pub mod endpoint;
pub mod error;
mod fishon;
pub mod request;
pub mod transport;

pub use client::ApiClient;
pub use endpoint::{AuthMode, Endpoint, Operation, Service};
pub use error::{ApiError, ErrorKind};
pub use request::{ApiRequest, Body, Credential, Params};
pub use transport::{ApiResponse, ReqwestTransport, Transport};
#[cfg(test)]
pub(crate) use transport::ScriptedTransport;

/// Remark attached to head-office transfers.
pub const HEAD_OFFICE_REMARK: &str = "Kirim Head Office";
