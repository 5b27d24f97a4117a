//! Integration tests for the board/list/task lifecycle.
//!
//! Covers signup, board creation, list and task auto-positioning, the
//! move operation, assignment, and the cascade delete of a board.
//!
//! Verification command: `cargo test --test board_lifecycle`

use std::net::SocketAddr;

use reqwest::StatusCode;
use serde_json::{Value, json};

// =============================================================================
// Helpers
// =============================================================================

/// Starts a server on a random port for testing.
async fn start_server() -> SocketAddr {
    let (addr, _handle) = taskdeck_server::start_server("127.0.0.1:0")
        .await
        .expect("failed to start test server");
    addr
}

async fn post(
    client: &reqwest::Client,
    addr: SocketAddr,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut req = client.post(format!("http://{addr}{path}")).json(&body);
    if let Some(t) = token {
        req = req.bearer_auth(t);
    }
    let resp = req.send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn get(
    client: &reqwest::Client,
    addr: SocketAddr,
    path: &str,
    token: &str,
) -> (StatusCode, Value) {
    let resp = client
        .get(format!("http://{addr}{path}"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

/// Registers a user and returns their token and id.
async fn signup(
    client: &reqwest::Client,
    addr: SocketAddr,
    username: &str,
    email: &str,
) -> (String, String) {
    let (status, body) = post(
        client,
        addr,
        "/api/auth/signup",
        None,
        json!({ "username": username, "email": email, "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();
    (token, user_id)
}

async fn create_board(
    client: &reqwest::Client,
    addr: SocketAddr,
    token: &str,
    name: &str,
) -> String {
    let (status, body) = post(client, addr, "/api/boards", Some(token), json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "board creation failed: {body}");
    body["data"]["board"]["id"].as_str().unwrap().to_string()
}

async fn create_list(
    client: &reqwest::Client,
    addr: SocketAddr,
    token: &str,
    board_id: &str,
    title: &str,
) -> Value {
    let (status, body) = post(
        client,
        addr,
        &format!("/api/boards/{board_id}/lists"),
        Some(token),
        json!({ "title": title }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "list creation failed: {body}");
    body["data"]["list"].clone()
}

async fn create_task(
    client: &reqwest::Client,
    addr: SocketAddr,
    token: &str,
    list_id: &str,
    title: &str,
) -> Value {
    let (status, body) = post(
        client,
        addr,
        &format!("/api/lists/{list_id}/tasks"),
        Some(token),
        json!({ "title": title }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "task creation failed: {body}");
    body["data"]["task"].clone()
}

// =============================================================================
// Signup and login
// =============================================================================

/// Signup returns a token usable on authenticated routes.
#[tokio::test]
async fn signup_then_me() {
    let addr = start_server().await;
    let client = reqwest::Client::new();

    let (token, user_id) = signup(&client, addr, "alice", "alice@example.com").await;

    let (status, body) = get(&client, addr, "/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["user"]["id"], json!(user_id));
    assert_eq!(body["data"]["user"]["username"], json!("alice"));
    // The hash never leaves the server.
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

/// Duplicate email and duplicate username both conflict.
#[tokio::test]
async fn signup_rejects_duplicates() {
    let addr = start_server().await;
    let client = reqwest::Client::new();

    signup(&client, addr, "alice", "alice@example.com").await;

    let (status, body) = post(
        &client,
        addr,
        "/api/auth/signup",
        None,
        json!({ "username": "alice2", "email": "alice@example.com", "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("email already registered"));

    let (status, body) = post(
        &client,
        addr,
        "/api/auth/signup",
        None,
        json!({ "username": "alice", "email": "other@example.com", "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("username already taken"));
}

/// Login with the right password succeeds; wrong password is a 401 with the
/// same message as an unknown email.
#[tokio::test]
async fn login_paths() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    signup(&client, addr, "alice", "alice@example.com").await;

    let (status, body) = post(
        &client,
        addr,
        "/api/auth/login",
        None,
        json!({ "email": "alice@example.com", "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    assert!(body["data"]["token"].as_str().is_some());

    let (status, wrong_pw) = post(
        &client,
        addr,
        "/api/auth/login",
        None,
        json!({ "email": "alice@example.com", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status2, unknown) = post(
        &client,
        addr,
        "/api/auth/login",
        None,
        json!({ "email": "nobody@example.com", "password": "password123" }),
    )
    .await;
    assert_eq!(status2, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw["message"], unknown["message"]);
}

/// Validation limits: short username, bad email, short password.
#[tokio::test]
async fn signup_validation() {
    let addr = start_server().await;
    let client = reqwest::Client::new();

    let cases = [
        json!({ "username": "ab", "email": "a@b.com", "password": "password123" }),
        json!({ "username": "alice", "email": "not-an-email", "password": "password123" }),
        json!({ "username": "alice", "email": "a@b.com", "password": "short" }),
    ];
    for case in cases {
        let (status, body) = post(&client, addr, "/api/auth/signup", None, case.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case {case} should fail");
        assert_eq!(body["success"], json!(false));
    }
}

// =============================================================================
// Lists and tasks: positioning
// =============================================================================

/// Lists and tasks created without an explicit position get max+1, starting
/// at 0 in an empty container.
#[tokio::test]
async fn auto_positioning() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let (token, _) = signup(&client, addr, "alice", "alice@example.com").await;
    let board_id = create_board(&client, addr, &token, "Project").await;

    let todo = create_list(&client, addr, &token, &board_id, "Todo").await;
    let doing = create_list(&client, addr, &token, &board_id, "Doing").await;
    assert_eq!(todo["position"], json!(0));
    assert_eq!(doing["position"], json!(1));

    let list_id = todo["id"].as_str().unwrap();
    let a = create_task(&client, addr, &token, list_id, "Task A").await;
    let b = create_task(&client, addr, &token, list_id, "Task B").await;
    assert_eq!(a["position"], json!(0));
    assert_eq!(b["position"], json!(1));
}

/// The nested board view returns lists and tasks sorted by position.
#[tokio::test]
async fn board_view_is_sorted() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let (token, _) = signup(&client, addr, "alice", "alice@example.com").await;
    let board_id = create_board(&client, addr, &token, "Project").await;

    // Create out of order via explicit positions.
    let (status, _) = post(
        &client,
        addr,
        &format!("/api/boards/{board_id}/lists"),
        Some(&token),
        json!({ "title": "Second", "position": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = post(
        &client,
        addr,
        &format!("/api/boards/{board_id}/lists"),
        Some(&token),
        json!({ "title": "First", "position": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = get(&client, addr, &format!("/api/boards/{board_id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    let lists = body["data"]["board"]["lists"].as_array().unwrap();
    assert_eq!(lists[0]["title"], json!("First"));
    assert_eq!(lists[1]["title"], json!("Second"));
}

/// Moving a task across lists updates its list and position and both
/// membership arrays.
#[tokio::test]
async fn move_task_across_lists() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let (token, _) = signup(&client, addr, "alice", "alice@example.com").await;
    let board_id = create_board(&client, addr, &token, "Project").await;

    let todo = create_list(&client, addr, &token, &board_id, "Todo").await;
    let done = create_list(&client, addr, &token, &board_id, "Done").await;
    let todo_id = todo["id"].as_str().unwrap();
    let done_id = done["id"].as_str().unwrap();
    let task = create_task(&client, addr, &token, todo_id, "Ship it").await;
    let task_id = task["id"].as_str().unwrap();

    let resp = client
        .patch(format!("http://{addr}/api/lists/task/{task_id}/move"))
        .bearer_auth(&token)
        .json(&json!({ "listId": done_id, "position": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["task"]["list"], json!(done_id));
    assert_eq!(body["data"]["task"]["position"], json!(3));

    let (_, todo_tasks) = get(&client, addr, &format!("/api/lists/{todo_id}/tasks"), &token).await;
    assert_eq!(todo_tasks["data"]["tasks"].as_array().unwrap().len(), 0);
    let (_, done_tasks) = get(&client, addr, &format!("/api/lists/{done_id}/tasks"), &token).await;
    assert_eq!(done_tasks["data"]["tasks"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Assignment
// =============================================================================

/// Assign is rejected on duplicates; unassign is idempotent.
#[tokio::test]
async fn assignment_round_trip() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let (token, user_id) = signup(&client, addr, "alice", "alice@example.com").await;
    let board_id = create_board(&client, addr, &token, "Project").await;
    let list = create_list(&client, addr, &token, &board_id, "Todo").await;
    let task = create_task(&client, addr, &token, list["id"].as_str().unwrap(), "Review").await;
    let task_id = task["id"].as_str().unwrap();

    let (status, body) = post(
        &client,
        addr,
        &format!("/api/lists/task/{task_id}/assign"),
        Some(&token),
        json!({ "userId": user_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "assign failed: {body}");
    let assignees = body["data"]["task"]["assignees"].as_array().unwrap();
    assert_eq!(assignees.len(), 1);
    assert_eq!(assignees[0]["id"], json!(user_id));

    // Second assign of the same user conflicts.
    let (status, body) = post(
        &client,
        addr,
        &format!("/api/lists/task/{task_id}/assign"),
        Some(&token),
        json!({ "userId": user_id }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("user already assigned to this task"));

    // Unassign, then unassign again: both succeed.
    for _ in 0..2 {
        let resp = client
            .delete(format!(
                "http://{addr}/api/lists/task/{task_id}/assign/{user_id}"
            ))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let (_, body) = get(&client, addr, &format!("/api/lists/task/{task_id}"), &token).await;
    assert_eq!(body["data"]["task"]["assignees"].as_array().unwrap().len(), 0);
}

// =============================================================================
// Cascade deletes
// =============================================================================

/// Deleting a list deletes its tasks and unlinks it from the board.
#[tokio::test]
async fn list_delete_cascades_to_tasks() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let (token, _) = signup(&client, addr, "alice", "alice@example.com").await;
    let board_id = create_board(&client, addr, &token, "Project").await;
    let list = create_list(&client, addr, &token, &board_id, "Todo").await;
    let list_id = list["id"].as_str().unwrap();
    let task = create_task(&client, addr, &token, list_id, "Orphan-to-be").await;
    let task_id = task["id"].as_str().unwrap();

    let resp = client
        .delete(format!("http://{addr}/api/boards/list/{list_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, _) = get(&client, addr, &format!("/api/lists/task/{task_id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&client, addr, &format!("/api/boards/{board_id}"), &token).await;
    assert_eq!(body["data"]["board"]["lists"].as_array().unwrap().len(), 0);
}

/// Deleting a board deletes its lists, tasks, and activities.
#[tokio::test]
async fn board_delete_cascades() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let (token, _) = signup(&client, addr, "alice", "alice@example.com").await;
    let board_id = create_board(&client, addr, &token, "Doomed").await;
    let list = create_list(&client, addr, &token, &board_id, "Todo").await;
    let list_id = list["id"].as_str().unwrap();
    let task = create_task(&client, addr, &token, list_id, "Gone soon").await;
    let task_id = task["id"].as_str().unwrap();

    let resp = client
        .delete(format!("http://{addr}/api/boards/{board_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, _) = get(&client, addr, &format!("/api/boards/{board_id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&client, addr, &format!("/api/lists/task/{task_id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(
        &client,
        addr,
        &format!("/api/boards/{board_id}/activities"),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&client, addr, "/api/boards", &token).await;
    assert_eq!(body["data"]["boards"].as_array().unwrap().len(), 0);
}

// =============================================================================
// Patch semantics
// =============================================================================

/// Absent fields stay unchanged; an explicit empty description clears it.
#[tokio::test]
async fn task_update_patch_semantics() {
    let addr = start_server().await;
    let client = reqwest::Client::new();
    let (token, _) = signup(&client, addr, "alice", "alice@example.com").await;
    let board_id = create_board(&client, addr, &token, "Project").await;
    let list = create_list(&client, addr, &token, &board_id, "Todo").await;
    let list_id = list["id"].as_str().unwrap();

    let (status, body) = post(
        &client,
        addr,
        &format!("/api/lists/{list_id}/tasks"),
        Some(&token),
        json!({ "title": "Write docs", "description": "draft the README" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = body["data"]["task"]["id"].as_str().unwrap().to_string();

    // Rename only: description survives.
    let resp = client
        .put(format!("http://{addr}/api/lists/task/{task_id}"))
        .bearer_auth(&token)
        .json(&json!({ "title": "Write better docs" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["task"]["title"], json!("Write better docs"));
    assert_eq!(body["data"]["task"]["description"], json!("draft the README"));

    // Explicit empty description clears it.
    let resp = client
        .put(format!("http://{addr}/api/lists/task/{task_id}"))
        .bearer_auth(&token)
        .json(&json!({ "description": "" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["task"]["description"], json!(""));
    assert_eq!(body["data"]["task"]["title"], json!("Write better docs"));
}
