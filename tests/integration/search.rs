//! Integration tests for cross-board search.
//!
//! Covers case-insensitive matching across boards, lists, and tasks,
//! access scoping, result caps, and the empty-query error.
//!
//! Verification command: `cargo test --test search`

use std::net::SocketAddr;

use reqwest::StatusCode;
use serde_json::{Value, json};

// =============================================================================
// Helpers
// =============================================================================

async fn start_server() -> SocketAddr {
    let (addr, _handle) = taskdeck_server::start_server("127.0.0.1:0")
        .await
        .expect("failed to start test server");
    addr
}

async fn signup(client: &reqwest::Client, addr: SocketAddr, username: &str) -> String {
    let resp = client
        .post(format!("http://{addr}/api/auth/signup"))
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create_board(
    client: &reqwest::Client,
    addr: SocketAddr,
    token: &str,
    name: &str,
) -> String {
    let resp = client
        .post(format!("http://{addr}/api/boards"))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    body["data"]["board"]["id"].as_str().unwrap().to_string()
}

async fn create_list(
    client: &reqwest::Client,
    addr: SocketAddr,
    token: &str,
    board_id: &str,
    title: &str,
) -> String {
    let resp = client
        .post(format!("http://{addr}/api/boards/{board_id}/lists"))
        .bearer_auth(token)
        .json(&json!({ "title": title }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    body["data"]["list"]["id"].as_str().unwrap().to_string()
}

async fn create_task(
    client: &reqwest::Client,
    addr: SocketAddr,
    token: &str,
    list_id: &str,
    title: &str,
    description: &str,
) {
    let resp = client
        .post(format!("http://{addr}/api/lists/{list_id}/tasks"))
        .bearer_auth(token)
        .json(&json!({ "title": title, "description": description }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

async fn search(
    client: &reqwest::Client,
    addr: SocketAddr,
    token: &str,
    q: &str,
) -> (StatusCode, Value) {
    let resp = client
        .get(format!("http://{addr}/api/search"))
        .query(&[("q", q)])
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

// =============================================================================
// Matching
// =============================================================================

/// Matches are case-insensitive and span board names, list titles, and
/// task titles/descriptions.
#[tokio::test]
async fn matches_all_entity_kinds() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let token = signup(&client, addr, "alice").await;

    let board_id = create_board(&client, addr, &token, "Deploy Pipeline").await;
    let list_id = create_list(&client, addr, &token, &board_id, "deploy blockers").await;
    create_task(&client, addr, &token, &list_id, "Fix CI", "flaky deploy step").await;
    create_task(&client, addr, &token, &list_id, "Unrelated", "nothing here").await;

    let (status, body) = search(&client, addr, &token, "DEPLOY").await;
    assert_eq!(status, StatusCode::OK, "search failed: {body}");
    assert_eq!(body["data"]["count"]["boards"], json!(1));
    assert_eq!(body["data"]["count"]["lists"], json!(1));
    assert_eq!(body["data"]["count"]["tasks"], json!(1));
    assert_eq!(body["data"]["count"]["total"], json!(3));

    assert_eq!(
        body["data"]["results"]["boards"][0]["name"],
        json!("Deploy Pipeline")
    );
    assert_eq!(
        body["data"]["results"]["lists"][0]["title"],
        json!("deploy blockers")
    );
    // The task matched on its description, not its title.
    assert_eq!(body["data"]["results"]["tasks"][0]["title"], json!("Fix CI"));
}

/// An empty or whitespace-only query is rejected.
#[tokio::test]
async fn empty_query_is_rejected() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let token = signup(&client, addr, "alice").await;

    for q in ["", "   "] {
        let (status, body) = search(&client, addr, &token, q).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("search query is required"));
    }

    // Missing `q` entirely behaves the same.
    let resp = client
        .get(format!("http://{addr}/api/search"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

/// No matches yields empty buckets, not an error.
#[tokio::test]
async fn no_matches_is_empty() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let token = signup(&client, addr, "alice").await;
    create_board(&client, addr, &token, "Ordinary board").await;

    let (status, body) = search(&client, addr, &token, "zanzibar").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"]["total"], json!(0));
    assert_eq!(body["data"]["results"]["boards"].as_array().unwrap().len(), 0);
}

// =============================================================================
// Scoping
// =============================================================================

/// Search never leaks another user's boards.
#[tokio::test]
async fn scoped_to_accessible_boards() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let alice = signup(&client, addr, "alice").await;
    let bob = signup(&client, addr, "bob").await;

    create_board(&client, addr, &alice, "alpha secrets").await;
    create_board(&client, addr, &bob, "alpha public").await;

    let (_, body) = search(&client, addr, &bob, "alpha").await;
    assert_eq!(body["data"]["count"]["boards"], json!(1));
    assert_eq!(
        body["data"]["results"]["boards"][0]["name"],
        json!("alpha public")
    );
}

// =============================================================================
// Caps
// =============================================================================

/// The board bucket is capped at 10 results in creation order.
#[tokio::test]
async fn board_results_are_capped() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let token = signup(&client, addr, "alice").await;

    for i in 0..12 {
        create_board(&client, addr, &token, &format!("sprint {i}")).await;
    }

    let (_, body) = search(&client, addr, &token, "sprint").await;
    let boards = body["data"]["results"]["boards"].as_array().unwrap();
    assert_eq!(boards.len(), 10);
    assert_eq!(body["data"]["count"]["boards"], json!(10));
    // Oldest first: the cap drops the newest entries.
    assert_eq!(boards[0]["name"], json!("sprint 0"));
    assert_eq!(boards[9]["name"], json!("sprint 9"));
}

/// The task bucket is capped at 20 results.
#[tokio::test]
async fn task_results_are_capped() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let token = signup(&client, addr, "alice").await;
    let board_id = create_board(&client, addr, &token, "Backlog").await;
    let list_id = create_list(&client, addr, &token, &board_id, "Inbox").await;

    for i in 0..25 {
        create_task(&client, addr, &token, &list_id, &format!("chore {i}"), "").await;
    }

    let (_, body) = search(&client, addr, &token, "chore").await;
    assert_eq!(body["data"]["results"]["tasks"].as_array().unwrap().len(), 20);
    assert_eq!(body["data"]["count"]["tasks"], json!(20));
}
