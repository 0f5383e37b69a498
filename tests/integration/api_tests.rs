//! API integration tests
//!
//! Run against a live server with seeded reference data:
//! an admin staff member (ADM001/admin), at least two rooms and one
//! available wheelchair.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "employee_code": "ADM001",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to fetch two room ids for pickup/destination
async fn get_two_rooms(client: &Client, token: &str) -> (String, String) {
    let response = client
        .get(format!("{}/rooms", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to list rooms");

    let body: Value = response.json().await.expect("Failed to parse rooms");
    let rooms = body.as_array().expect("Rooms not an array");
    assert!(rooms.len() >= 2, "Need at least two seeded rooms");
    (
        rooms[0]["id"].as_str().unwrap().to_string(),
        rooms[1]["id"].as_str().unwrap().to_string(),
    )
}

async fn create_request(client: &Client, token: &str, priority: i64) -> Value {
    let (pickup, destination) = get_two_rooms(client, token).await;

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "priority": priority,
            "equipment_type": "wheelchair",
            "pickup_room_id": pickup,
            "destination_room_id": destination
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse created request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "employee_code": "ADM001",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "employee_code": "ADM001",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["employee_code"], "ADM001");
    assert!(body["password_hash"].is_null(), "Hash must never serialize");
}

#[tokio::test]
#[ignore]
async fn test_create_request_starts_pending() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let created = create_request(&client, &token, 3).await;

    assert_eq!(created["status"], "pending");
    assert_eq!(created["priority_label"], "NORMAL");
    assert!(created["completed_at"].is_null());
    assert!(created["assigned_at"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_create_request_rejects_bad_priority() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (pickup, destination) = get_two_rooms(&client, &token).await;

    for priority in [0, 5, -1] {
        let response = client
            .post(format!("{}/requests", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({
                "priority": priority,
                "equipment_type": "wheelchair",
                "pickup_room_id": pickup,
                "destination_room_id": destination
            }))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), 400);
    }
}

#[tokio::test]
#[ignore]
async fn test_create_request_rejects_bad_equipment_type() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (pickup, destination) = get_two_rooms(&client, &token).await;

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "priority": 2,
            "equipment_type": "gurney",
            "pickup_room_id": pickup,
            "destination_room_id": destination
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_active_requests_ordered_by_priority_then_age() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Older NORMAL first, then a STAT that must jump the queue
    create_request(&client, &token, 3).await;
    create_request(&client, &token, 1).await;

    let response = client
        .get(format!("{}/requests/active", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let tasks = body.as_array().expect("Active list not an array");

    let mut previous: Option<(i64, String)> = None;
    for task in tasks {
        let priority = task["priority"].as_i64().expect("priority not numeric");
        let created_at = task["created_at"].as_str().unwrap().to_string();
        if let Some((prev_priority, prev_created)) = &previous {
            assert!(
                *prev_priority < priority
                    || (*prev_priority == priority && *prev_created <= created_at),
                "Active list out of order"
            );
        }
        previous = Some((priority, created_at));
    }
}

#[tokio::test]
#[ignore]
async fn test_advance_to_completed_stamps_timestamp() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let created = create_request(&client, &token, 2).await;
    let id = created["id"].as_str().unwrap();

    let response = client
        .put(format!("{}/requests/{}/status", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"status": "completed"}))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "completed");
    assert!(body["completed_at"].is_string());
    assert!(body["completed_at"].as_str().unwrap() >= body["created_at"].as_str().unwrap());
}

#[tokio::test]
#[ignore]
async fn test_advance_rejects_unknown_status() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let created = create_request(&client, &token, 2).await;
    let id = created["id"].as_str().unwrap();

    let response = client
        .put(format!("{}/requests/{}/status", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"status": "done"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_completed_request_is_frozen() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let created = create_request(&client, &token, 2).await;
    let id = created["id"].as_str().unwrap();

    client
        .put(format!("{}/requests/{}/status", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"status": "completed"}))
        .send()
        .await
        .expect("Failed to complete request");

    let response = client
        .put(format!("{}/requests/{}/status", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"status": "pending"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_assign_with_unknown_equipment_leaves_request_untouched() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let created = create_request(&client, &token, 2).await;
    let id = created["id"].as_str().unwrap();

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch caller")
        .json()
        .await
        .expect("Failed to parse caller");

    let response = client
        .put(format!("{}/requests/{}/assign", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "assignee_id": me["id"],
            "equipment_id": "00000000-0000-0000-0000-000000000000"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    // Atomicity: the failed assign must not have touched the request
    let after: Value = client
        .get(format!("{}/requests/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch request")
        .json()
        .await
        .expect("Failed to parse request");

    assert_eq!(after["status"], "pending");
    assert!(after["assigned_to_user"].is_null());
    assert!(after["assigned_at"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_assign_couples_available_equipment() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let created = create_request(&client, &token, 2).await;
    let id = created["id"].as_str().unwrap();

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch caller")
        .json()
        .await
        .expect("Failed to parse caller");

    let available: Value = client
        .get(format!("{}/equipment?status=available&type=wheelchair", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to list equipment")
        .json()
        .await
        .expect("Failed to parse equipment");
    let unit = &available.as_array().expect("Equipment not an array")[0];
    let unit_id = unit["id"].as_str().unwrap();

    let response = client
        .put(format!("{}/requests/{}/assign", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"assignee_id": me["id"], "equipment_id": unit_id}))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "assigned");
    assert!(body["assigned_at"].is_string());

    // Equipment side of the coupling
    let unit_after: Value = client
        .get(format!("{}/equipment/{}", BASE_URL, unit_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch equipment")
        .json()
        .await
        .expect("Failed to parse equipment");

    assert_eq!(unit_after["status"], "in_use");
    assert_eq!(unit_after["assigned_request_id"], body["id"]);

    // A second assign racing for the same unit must conflict
    let other = create_request(&client, &token, 2).await;
    let conflict = client
        .put(format!("{}/requests/{}/assign", BASE_URL, other["id"].as_str().unwrap()))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"assignee_id": me["id"], "equipment_id": unit_id}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(conflict.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_cancel_is_idempotent_and_releases_equipment() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let created = create_request(&client, &token, 3).await;
    let id = created["id"].as_str().unwrap();

    let first = client
        .delete(format!("{}/requests/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(first.status().is_success());

    let second = client
        .delete(format!("{}/requests/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(second.status().is_success());

    let body: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "cancelled");

    // No uncancel: advancing a cancelled request must conflict
    let response = client
        .put(format!("{}/requests/{}/status", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"status": "pending"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_workload_overview_shape() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/workload", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_tasks"].is_number());
    assert!(body["completed"].is_number());
    assert!(body["avg_time_minutes"].is_number());
    let efficiency = body["efficiency"].as_i64().unwrap();
    assert!((0..=100).contains(&efficiency));
}

#[tokio::test]
#[ignore]
async fn test_staff_workload_scores_clamped() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/workload/staff", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    for member in body.as_array().expect("Staff workload not an array") {
        let score = member["efficiency_score"].as_i64().unwrap();
        assert!((0..=100).contains(&score));
        let rate = member["completion_rate"].as_i64().unwrap();
        assert!((0..=100).contains(&rate));
    }
}

#[tokio::test]
#[ignore]
async fn test_staff_workload_detail_limits_recent_tasks() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch caller")
        .json()
        .await
        .expect("Failed to parse caller");

    let response = client
        .get(format!("{}/workload/staff/{}", BASE_URL, me["id"].as_str().unwrap()))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let recent = body["recent_tasks"].as_array().expect("recent_tasks missing");
    assert!(recent.len() <= 10);

    // Newest first
    let mut prev: Option<String> = None;
    for task in recent {
        let created = task["created_at"].as_str().unwrap().to_string();
        if let Some(prev) = &prev {
            assert!(*prev >= created);
        }
        prev = Some(created);
    }
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_request_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/requests/active", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
