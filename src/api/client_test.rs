use super::*;
use crate::api::endpoint::AuthMode;
use crate::api::error::ErrorKind;
use crate::api::transport::ScriptedTransport;
use crate::config::ClientCredentials;
use serde_json::json;
use std::sync::Arc;

fn test_config(service_token: &str) -> AdminConfig {
    let mut config = AdminConfig::default();
    config.auction.base_url = "http://auction.test".into();
    config.auction.token = service_token.into();
    config.fishon.base_url = "http://fishon.test".into();
    config.fishon.client = Some(ClientCredentials { client_id: "cid".into(), client_secret: "secret".into() });
    config
}

fn client(service_token: &str, session: Session) -> (ApiClient<Arc<ScriptedTransport>>, Arc<ScriptedTransport>) {
    let transport = Arc::new(ScriptedTransport::new());
    let client = ApiClient::new(&test_config(service_token), session, Arc::clone(&transport));
    (client, transport)
}

// =============================================================================
// prepare
// =============================================================================

#[test]
fn prepare_joins_base_url_and_rendered_path() {
    let (client, _) = client("", Session::in_memory());
    let request = client
        .prepare(Operation::DeleteAuction, Params::new().path("id", 9))
        .unwrap();
    assert_eq!(request.url, "http://auction.test/lelang/v2/auctions/9");
    assert_eq!(request.path, "/lelang/v2/auctions/9");
    assert_eq!(request.service, Service::Auction);
}

#[test]
fn prepare_session_row_without_token_is_absent_credential() {
    let (client, transport) = client("", Session::in_memory());
    let err = client
        .prepare(Operation::GetBanks, Params::new())
        .unwrap_err();
    assert!(matches!(err, ApiError::MissingToken));
    assert_eq!(err.kind(), ErrorKind::AbsentCredential);
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn prepare_service_token_omitted_when_unset() {
    let (client, _) = client("", Session::in_memory());
    let request = client
        .prepare(Operation::GetApprovals, Params::new())
        .unwrap();
    assert_eq!(Operation::GetApprovals.endpoint().auth, AuthMode::ServiceToken);
    assert!(request.credential.is_none());
}

#[test]
fn prepare_service_token_attached_when_configured() {
    let (client, _) = client("svc", Session::in_memory());
    let request = client
        .prepare(Operation::GetApprovals, Params::new())
        .unwrap();
    assert_eq!(request.bearer_token(), Some("svc"));
}

#[test]
fn prepare_login_uses_client_credentials() {
    let (client, _) = client("", Session::in_memory());
    let request = client.prepare(Operation::Login, Params::new()).unwrap();
    assert_eq!(
        request.credential,
        Some(Credential::Basic { username: "cid".into(), password: "secret".into() })
    );
}

#[test]
fn prepare_login_without_client_credentials_fails_locally() {
    let mut config = test_config("");
    config.fishon.client = None;
    let transport = Arc::new(ScriptedTransport::new());
    let client = ApiClient::new(&config, Session::in_memory(), Arc::clone(&transport));

    let err = client.prepare(Operation::Login, Params::new()).unwrap_err();
    assert!(matches!(err, ApiError::MissingClientCredentials));
    assert_eq!(err.kind(), ErrorKind::AbsentCredential);
}

// =============================================================================
// dispatch
// =============================================================================

#[tokio::test]
async fn dispatch_returns_raw_body_on_success() {
    let (client, transport) = client("", Session::in_memory());
    transport.reply(200, json!([{ "id": 1 }, { "id": 2 }]));

    let body = client.dispatch(Operation::GetApprovals, Params::new()).await.unwrap();
    assert_eq!(body, json!([{ "id": 1 }, { "id": 2 }]));
}

#[tokio::test]
async fn dispatch_rereads_session_token_each_call() {
    let session = Session::in_memory();
    let (client, transport) = client("", session.clone());

    session.set("first").unwrap();
    client.dispatch(Operation::GetBanks, Params::new()).await.unwrap();
    session.set("second").unwrap();
    client.dispatch(Operation::GetBanks, Params::new()).await.unwrap();

    let sent = transport.requests();
    assert_eq!(sent[0].bearer_token(), Some("first"));
    assert_eq!(sent[1].bearer_token(), Some("second"));
}

#[tokio::test]
async fn dispatch_unauthorized_is_auth_rejection() {
    let session = Session::in_memory();
    session.set("stale").unwrap();
    let (client, transport) = client("", session);
    transport.reply(401, json!({ "detail": "Invalid token" }));

    let err = client.dispatch(Operation::GetBanks, Params::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthRejected);
    assert_eq!(err.status(), Some(401));
    assert!(matches!(err, ApiError::Status { body, .. } if body["detail"] == "Invalid token"));
}

#[tokio::test]
async fn dispatch_validation_error_propagates_body() {
    let (client, transport) = client("", Session::in_memory());
    transport.reply(400, json!({ "store": ["This field is required."] }));

    let err = client
        .dispatch(Operation::RejectOsposAuction, Params::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert_eq!(err.error_code(), "E_API_RESPONSE");
}

#[tokio::test]
async fn dispatch_transport_failure_is_not_retried() {
    let (client, transport) = client("", Session::in_memory());
    transport.fail("connection refused");

    let err = client.dispatch(Operation::ProcessAuction, Params::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn dispatch_without_token_sends_nothing() {
    let (client, transport) = client("", Session::in_memory());

    let err = client.dispatch(Operation::GetCurrentUser, Params::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingToken));
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn from_config_builds_reqwest_client() {
    let client = ApiClient::from_config(&test_config(""), Session::in_memory()).unwrap();
    assert!(!client.session().is_present());
}
