//! Cursor-walk behavior of the paginator against a mock gateway

use ledger_core::clients::pagination;
use ledger_core::{ConductorClient, ConductorConfig};
use ledger_types::Vendor;
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VENDORS: &str = "/quickbooks-desktop/vendors";

fn client_for(server: &MockServer) -> ConductorClient {
    ConductorClient::new(ConductorConfig {
        api_key: "sk_test".to_string(),
        end_user_id: "end_usr_1".to_string(),
        base_url: server.uri(),
    })
    .unwrap()
}

fn page(ids: &[&str], next_cursor: Option<&str>) -> serde_json::Value {
    let data: Vec<_> = ids
        .iter()
        .map(|id| json!({ "id": id, "name": format!("Vendor {}", id) }))
        .collect();
    match next_cursor {
        Some(c) => json!({ "data": data, "nextCursor": c }),
        None => json!({ "data": data }),
    }
}

#[tokio::test]
async fn test_follows_cursor_chain_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VENDORS))
        .and(query_param("cursor", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["v-3", "v-4"], Some("c2"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(VENDORS))
        .and(query_param("cursor", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["v-5"], None)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(VENDORS))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["v-1", "v-2"], Some("c1"))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let vendors: Vec<Vendor> = pagination::list_all(&client, VENDORS, &[], 20).await.unwrap();

    let ids: Vec<_> = vendors.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["v-1", "v-2", "v-3", "v-4", "v-5"]);
}

#[tokio::test]
async fn test_caller_query_params_survive_across_pages() {
    let server = MockServer::start().await;

    // Page two only matches when the vendor filter is still present.
    Mock::given(method("GET"))
        .and(path("/quickbooks-desktop/bills"))
        .and(query_param("vendorIds", "v-1"))
        .and(query_param("cursor", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "b-2" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/quickbooks-desktop/bills"))
        .and(query_param("vendorIds", "v-1"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "b-1" }],
            "nextCursor": "c1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = vec![("vendorIds".to_string(), "v-1".to_string())];
    let bills: Vec<ledger_types::Bill> =
        pagination::list_all(&client, "/quickbooks-desktop/bills", &query, 20)
            .await
            .unwrap();

    assert_eq!(bills.len(), 2);
}

#[tokio::test]
async fn test_page_cap_truncates_instead_of_hanging() {
    let server = MockServer::start().await;

    // Server that never stops issuing cursors.
    Mock::given(method("GET"))
        .and(path(VENDORS))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["v-1", "v-2"], Some("again"))))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let vendors: Vec<Vendor> = pagination::list_all(&client, VENDORS, &[], 3).await.unwrap();

    assert_eq!(vendors.len(), 6, "three pages of two records each");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_empty_cursor_string_ends_the_walk() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VENDORS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "v-1", "name": "Only" }],
            "nextCursor": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let vendors: Vec<Vendor> = pagination::list_all(&client, VENDORS, &[], 20).await.unwrap();

    assert_eq!(vendors.len(), 1);
}

#[tokio::test]
async fn test_mid_walk_failure_fails_the_whole_read() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VENDORS))
        .and(query_param("cursor", "c1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "backend exploded"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(VENDORS))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["v-1"], Some("c1"))))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result: ledger_core::Result<Vec<Vendor>> =
        pagination::list_all(&client, VENDORS, &[], 20).await;

    let err = result.unwrap_err();
    assert_eq!(err.code(), "ApiError");
}
