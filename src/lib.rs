//! Client library for the Seaseed auction and fish-trading admin.
//!
//! ARCHITECTURE
//! ============
//! Two backends sit behind this crate: the auction service (`lelang`,
//! approvals, configs) and the Fishon service (OAuth2 login, users, fish
//! catalog, ledger, BNI accounts). [`api::ApiClient`] maps every business
//! action to one HTTP request through a declarative endpoint table.
//! [`router::Router`] resolves navigation targets and consults one
//! [`router::RouteGuard`] for every protected route.
//!
//! The session token lives in an explicit [`session::Session`] handle that
//! is shared by the client and the guard; nothing reads ambient globals.

pub mod api;
pub mod config;
pub mod router;
pub mod session;

pub use api::{ApiClient, ApiError, ErrorKind, Operation};
pub use config::AdminConfig;
pub use router::{Navigation, RouteGuard, Router};
pub use session::Session;
