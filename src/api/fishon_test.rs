use super::*;
use crate::api::error::ErrorKind;
use crate::api::request::{ApiRequest, Body, Credential};
use crate::api::transport::ScriptedTransport;
use crate::config::{AdminConfig, ClientCredentials};
use crate::session::Session;
use reqwest::Method;
use std::sync::Arc;

fn client_with(session: Session) -> (ApiClient<Arc<ScriptedTransport>>, Arc<ScriptedTransport>) {
    let mut config = AdminConfig::default();
    config.fishon.client = Some(ClientCredentials { client_id: "cid".into(), client_secret: "csecret".into() });
    let transport = Arc::new(ScriptedTransport::new());
    let client = ApiClient::new(&config, session, Arc::clone(&transport));
    (client, transport)
}

fn logged_in() -> (ApiClient<Arc<ScriptedTransport>>, Arc<ScriptedTransport>) {
    let session = Session::in_memory();
    session.set("tok").unwrap();
    client_with(session)
}

fn last(transport: &ScriptedTransport) -> ApiRequest {
    transport.last_request().unwrap()
}

// =============================================================================
// login / logout
// =============================================================================

#[tokio::test]
async fn login_posts_password_grant_with_client_basic_auth() {
    let (client, transport) = client_with(Session::in_memory());
    transport.reply(200, json!({ "access_token": "tok123", "token_type": "Bearer" }));

    client.login("user1", "pw1").await.unwrap();

    let request = last(&transport);
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url, "http://localhost:8010/o/token/");
    assert_eq!(
        request.credential,
        Some(Credential::Basic { username: "cid".into(), password: "csecret".into() })
    );
    assert_eq!(request.form_value("username"), Some("user1"));
    assert_eq!(request.form_value("password"), Some("pw1"));
    assert_eq!(request.form_value("grant_type"), Some("password"));
}

#[tokio::test]
async fn login_then_current_user_carries_new_token() {
    let (client, transport) = client_with(Session::in_memory());
    transport.reply(200, json!({ "access_token": "tok123" }));

    client.login("user1", "pw1").await.unwrap();
    assert_eq!(client.session().get().as_deref(), Some("tok123"));

    client.get_current_user().await.unwrap();
    let request = last(&transport);
    assert_eq!(request.path, "/api/user/myprofile/");
    assert_eq!(request.bearer_token(), Some("tok123"));
}

#[tokio::test]
async fn failed_login_persists_nothing() {
    let (client, transport) = client_with(Session::in_memory());
    transport.reply(400, json!({ "error": "invalid_grant" }));

    let err = client.login("user1", "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(!client.session().is_present());
}

#[tokio::test]
async fn failed_login_keeps_previous_token() {
    let (client, transport) = logged_in();
    transport.fail("connection reset");

    assert!(client.login("user1", "pw1").await.is_err());
    assert_eq!(client.session().get().as_deref(), Some("tok"));
}

#[tokio::test]
async fn login_success_without_access_token_persists_nothing() {
    let (client, transport) = client_with(Session::in_memory());
    transport.reply(200, json!({ "token_type": "Bearer" }));

    let err = client.login("user1", "pw1").await.unwrap_err();
    assert!(matches!(err, ApiError::MissingField { field: "access_token", .. }));
    assert!(!client.session().is_present());
}

#[tokio::test]
async fn logout_clears_file_token_next_to_non_string_keys() {
    let dir = std::env::temp_dir().join(format!("seaseed-admin-fishon-{}-logout", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("storage.json");
    std::fs::write(&path, r#"{"fishonToken":"abc","theme":1}"#).unwrap();

    let (client, _) = client_with(Session::new(crate::session::FileTokenStore::new(&path)));
    assert_eq!(client.session().get().as_deref(), Some("abc"));

    client.logout().unwrap();
    assert!(!client.session().is_present());
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("fishonToken"));
    assert!(raw.contains("theme"));
}

#[tokio::test]
async fn logout_is_idempotent() {
    let (client, transport) = logged_in();

    client.logout().unwrap();
    assert!(!client.session().is_present());
    client.logout().unwrap();
    assert!(!client.session().is_present());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn calls_after_logout_fail_locally() {
    let (client, transport) = logged_in();
    client.logout().unwrap();

    let err = client.get_banks().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AbsentCredential);
    assert_eq!(transport.request_count(), 0);
}

// =============================================================================
// users
// =============================================================================

#[tokio::test]
async fn seaseed_user_lookups() {
    let (client, transport) = logged_in();

    client.get_seaseed_user("0b6f-uuid").await.unwrap();
    let request = last(&transport);
    assert_eq!(request.path, "/api/seaseed/users/");
    assert_eq!(request.query_value("uuid"), Some("0b6f-uuid"));

    client.get_current_seaseed_user().await.unwrap();
    assert_eq!(last(&transport).path, "/api/seaseed/users/current/");

    client.get_cold_storage_list().await.unwrap();
    assert_eq!(last(&transport).path, "/api/seaseed/users/coldstorage/");

    client.get_bni_cold_storage_list().await.unwrap();
    assert_eq!(last(&transport).path, "/api/user/coldstorage/");
    assert_eq!(last(&transport).bearer_token(), Some("tok"));
}

// =============================================================================
// fish
// =============================================================================

#[tokio::test]
async fn fish_list_area_filter_is_optional() {
    let (client, transport) = logged_in();

    client.get_fish_list(None).await.unwrap();
    assert!(last(&transport).query.is_empty());

    client.get_fish_list(Some("")).await.unwrap();
    assert!(last(&transport).query.is_empty());

    client.get_fish_list(Some("PI01")).await.unwrap();
    assert_eq!(last(&transport).query_value("area"), Some("PI01"));
}

#[tokio::test]
async fn perindo_fish_list_uses_area_prefix() {
    let (client, transport) = logged_in();
    client.get_perindo_fish_list().await.unwrap();

    let request = last(&transport);
    assert_eq!(request.path, "/api/log/ikan/");
    assert_eq!(request.query_value("area-prefix"), Some("PI"));
}

#[tokio::test]
async fn fish_crud_requests() {
    let (client, transport) = logged_in();
    let fish = json!({ "name": "Tongkol", "area": "PI01" });

    client.create_fish(&fish).await.unwrap();
    let request = last(&transport);
    assert_eq!((&request.method, request.path.as_str()), (&Method::POST, "/api/log/ikan/"));
    assert_eq!(request.body, Body::Json(fish.clone()));

    client.update_fish(12, &fish).await.unwrap();
    let request = last(&transport);
    assert_eq!((&request.method, request.path.as_str()), (&Method::PUT, "/api/log/ikan/12/"));
    assert_eq!(request.body, Body::Json(fish));

    client.delete_fish(12).await.unwrap();
    let request = last(&transport);
    assert_eq!((&request.method, request.path.as_str()), (&Method::DELETE, "/api/log/ikan/12/"));
    assert_eq!(request.body, Body::Empty);
}

#[tokio::test]
async fn create_auction_wraps_payload() {
    let (client, transport) = logged_in();
    let fish = json!([{ "ikan": 3, "weight": 12.5 }]);

    client.create_auction("PI01", "pemindang", &fish).await.unwrap();

    let request = last(&transport);
    assert_eq!(request.path, "/api/jual/");
    assert_eq!(
        request.body,
        Body::Json(json!({ "store": "PI01", "group": "pemindang", "data": [{ "ikan": 3, "weight": 12.5 }] }))
    );
}

// =============================================================================
// ledger
// =============================================================================

#[tokio::test]
async fn ledger_reads() {
    let (client, transport) = logged_in();

    client.get_banks().await.unwrap();
    assert_eq!(last(&transport).path, "/api/seaseed/banks/");

    client.get_transactions().await.unwrap();
    assert_eq!(last(&transport).path, "/api/seaseed/transactions/");
}

#[tokio::test]
async fn create_transfer_adds_head_office_remark() {
    let (client, transport) = logged_in();
    client.create_transfer("from-uuid", "to-uuid", 250_000).await.unwrap();

    let request = last(&transport);
    assert_eq!(request.path, "/api/seaseed/transfers/");
    assert_eq!(request.form_value("from_user_uuid"), Some("from-uuid"));
    assert_eq!(request.form_value("to_user_uuid"), Some("to-uuid"));
    assert_eq!(request.form_value("amount"), Some("250000"));
    assert_eq!(request.form_value("remark"), Some("Kirim Head Office"));
}

#[tokio::test]
async fn create_withdrawal_form_fields() {
    let (client, transport) = logged_in();
    client
        .create_withdrawal(100_000, "kasir@example.test", "0123456789", "009")
        .await
        .unwrap();

    let request = last(&transport);
    assert_eq!(request.path, "/api/seaseed/withdrawals/");
    assert_eq!(
        request.body,
        Body::Form(vec![
            ("amount".into(), "100000".into()),
            ("email".into(), "kasir@example.test".into()),
            ("account_no".into(), "0123456789".into()),
            ("bank_code".into(), "009".into()),
        ])
    );
}

#[tokio::test]
async fn process_cost_posts() {
    let (client, transport) = logged_in();
    client.process_cost().await.unwrap();

    let request = last(&transport);
    assert_eq!((&request.method, request.path.as_str()), (&Method::POST, "/api/seaseed/process/"));
}

// =============================================================================
// BNI
// =============================================================================

#[tokio::test]
async fn bni_account_lookups() {
    let (client, transport) = logged_in();

    client.get_current_bni_account().await.unwrap();
    let request = last(&transport);
    assert_eq!(request.path, "/api/bni/accounts/");
    assert!(request.query.is_empty());

    client.get_bni_account_by_no("0987").await.unwrap();
    let request = last(&transport);
    assert_eq!(request.query_value("account_no"), Some("0987"));
    assert_eq!(request.bearer_token(), Some("tok"));

    client.get_bni_transfers().await.unwrap();
    assert_eq!(last(&transport).path, "/api/bni/transfers/");
}

#[tokio::test]
async fn create_bni_transfer_form_fields() {
    let (client, transport) = logged_in();
    client.create_bni_transfer("111", "222", 5_000).await.unwrap();

    let request = last(&transport);
    assert_eq!((&request.method, request.path.as_str()), (&Method::POST, "/api/bni/transfers/"));
    assert_eq!(request.form_value("from_account_no"), Some("111"));
    assert_eq!(request.form_value("to_account_no"), Some("222"));
    assert_eq!(request.form_value("amount"), Some("5000"));
    assert_eq!(request.form_value("remark"), Some("Kirim Head Office"));
}

#[tokio::test]
async fn token_swap_between_calls_is_honored() {
    let (client, transport) = logged_in();

    client.get_banks().await.unwrap();
    client.session().set("rotated").unwrap();
    client.get_banks().await.unwrap();

    let sent = transport.requests();
    assert_eq!(sent[0].bearer_token(), Some("tok"));
    assert_eq!(sent[1].bearer_token(), Some("rotated"));
}
