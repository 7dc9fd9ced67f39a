//! Full-stack API tests driven through in-process oneshot calls
//! Run: cargo test --test http_api

use axum::body::Body;
use library_server::{Config, ServerState};
use serde_json::{Value, json};

async fn boot() -> (tempfile::TempDir, ServerState) {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::with_overrides(tmp.path().to_string_lossy(), 0);
    config.admin_email = "admin@test.local".to_string();
    config.admin_password = "test-admin-pass".to_string();
    config.whatsapp_sender = Some("911112223334".to_string());
    let state = ServerState::initialize(&config).await;
    (tmp, state)
}

fn get(uri: &str, token: Option<&str>) -> http::Request<Body> {
    let mut builder = http::Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn send(method: &str, uri: &str, token: Option<&str>, payload: &Value) -> http::Request<Body> {
    let mut builder = http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

async fn read_json(response: http::Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(state: &ServerState) -> String {
    let response = state
        .http
        .oneshot(send(
            "POST",
            "/api/admin/login",
            None,
            &json!({"email": "admin@test.local", "password": "test-admin-pass"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body = read_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_and_root_are_public() {
    let (_tmp, state) = boot().await;

    let response = state.http.oneshot(get("/api/health", None)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    let response = state.http.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(
        std::str::from_utf8(&bytes).unwrap(),
        "Library System Backend Running"
    );
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let (_tmp, state) = boot().await;

    // No token at all
    let response = state.http.oneshot(get("/api/seats", None)).await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E3001");
    assert_eq!(body["message"], "Please login first");

    // Garbage token
    let response = state
        .http
        .oneshot(get("/api/seats", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E3002");

    // The detailed health check is not on the public list
    let response = state
        .http
        .oneshot(get("/api/health/detailed", None))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (_tmp, state) = boot().await;

    let response = state
        .http
        .oneshot(send(
            "POST",
            "/api/admin/login",
            None,
            &json!({"email": "admin@test.local", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E0006");
    assert_eq!(body["message"], "Invalid email or password");

    // Unknown email gets the identical answer
    let response = state
        .http
        .oneshot(send(
            "POST",
            "/api/admin/login",
            None,
            &json!({"email": "nobody@test.local", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn login_and_profile_flow() {
    let (_tmp, state) = boot().await;
    let token = login(&state).await;

    let response = state
        .http
        .oneshot(get("/api/admin/profile", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body = read_json(response).await;
    assert_eq!(body["email"], "admin@test.local");
    assert_eq!(body["role"], "super_admin");
    assert!(body.get("password").is_none());

    let response = state
        .http
        .oneshot(get("/api/health/detailed", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body = read_json(response).await;
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn member_seat_payment_round_trip() {
    let (_tmp, state) = boot().await;
    let token = login(&state).await;

    // Register a member straight onto seat A1
    let response = state
        .http
        .oneshot(send(
            "POST",
            "/api/members",
            Some(&token),
            &json!({
                "name": "Asha Sharma",
                "fatherName": "Ram Sharma",
                "contact": "9876543210",
                "aadhar": "1234-5678-9012",
                "address": "12 Library Road",
                "gender": "Female",
                "shift": "Full Day (8 AM - 8 PM)",
                "timing": "6 Months",
                "monthlyFees": 600.0,
                "seat": "A1"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let member = read_json(response).await;
    assert_eq!(member["seat"], "A1");
    assert!(member.get("seatWarning").is_none());
    let member_id = member["id"].as_str().unwrap().to_string();

    // The seat now carries the occupancy
    let response = state
        .http
        .oneshot(get("/api/seats/A1", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let seat = read_json(response).await;
    assert_eq!(seat["isOccupied"], true);
    assert_eq!(seat["members"].as_array().unwrap().len(), 1);
    assert_eq!(seat["memberName"], "Asha Sharma");

    // A second full-day assignment on A1 hits the time conflict
    let response = state
        .http
        .oneshot(send(
            "POST",
            "/api/seats/assign",
            Some(&token),
            &json!({
                "seatId": "A1",
                "memberName": "Someone Else",
                "memberContact": "9876501234",
                "shift": "Full Day (8 AM - 8 PM)"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E0005");

    // Record a payment and refresh the paid-till date in one call
    let response = state
        .http
        .oneshot(send(
            "POST",
            "/api/payments",
            Some(&token),
            &json!({
                "memberId": member_id,
                "memberName": "Asha Sharma",
                "memberContact": "9876543210",
                "amount": 600.0,
                "paymentMode": "Cash",
                "updateFeesPaidTill": true,
                "feesPaidTill": "2025-09-01T00:00:00+00:00"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let payment = read_json(response).await;
    assert_eq!(payment["studentName"], "Asha Sharma");
    assert_eq!(payment["status"], "Completed");
    assert!(payment["paymentDate"].is_string());

    let response = state
        .http
        .oneshot(get("/api/payments/stats", Some(&token)))
        .await
        .unwrap();
    let stats = read_json(response).await;
    assert_eq!(stats["totalPayments"], 1);
    assert_eq!(stats["totalAmount"], 600.0);
    assert_eq!(stats["monthlyStats"][0]["count"], 1);

    // The cascade really updated the member record
    let response = state
        .http
        .oneshot(get("/api/members", Some(&token)))
        .await
        .unwrap();
    let members = read_json(response).await;
    let ours = members
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == member_id.as_str())
        .expect("member missing from list");
    assert_eq!(ours["feesPaidTill"], "2025-09-01T00:00:00+00:00");

    // Deleting the member frees the seat and reports it
    let response = state
        .http
        .oneshot(send(
            "DELETE",
            &format!("/api/members/{member_id}"),
            Some(&token),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let report = read_json(response).await;
    assert_eq!(report["msg"], "Member deleted successfully");
    assert_eq!(report["memberName"], "Asha Sharma");
    assert_eq!(report["seatFreed"], "A1");
    assert_eq!(report["cleanupCompleted"], true);

    let response = state
        .http
        .oneshot(get("/api/seats/A1", Some(&token)))
        .await
        .unwrap();
    let seat = read_json(response).await;
    assert_eq!(seat["isOccupied"], false);
    assert!(seat["members"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn seats_listing_and_sync() {
    let (_tmp, state) = boot().await;
    let token = login(&state).await;

    let response = state.http.oneshot(get("/api/seats", Some(&token))).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let seats = read_json(response).await;
    assert_eq!(seats.as_array().unwrap().len(), 90);
    assert_eq!(seats[0]["seatId"], "A1");

    // Available seats require a shift parameter
    let response = state
        .http
        .oneshot(get("/api/seats/available", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E0002");

    let response = state
        .http
        .oneshot(get(
            "/api/seats/available?shift=Half%20Day%20(8%20AM%20-%202%20PM)",
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let available = read_json(response).await;
    assert_eq!(available.as_array().unwrap().len(), 90);

    let response = state
        .http
        .oneshot(send("POST", "/api/seats/sync", Some(&token), &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Data synchronization completed successfully");
    assert_eq!(body["stats"]["totalSeats"], 90);
    assert_eq!(body["stats"]["occupiedSeats"], 0);
    assert_eq!(body["cleanupDetails"]["seatsUpdated"], 0);
}

#[tokio::test]
async fn whatsapp_reminder_formats_the_number() {
    let (_tmp, state) = boot().await;
    let token = login(&state).await;

    let response = state
        .http
        .oneshot(send(
            "POST",
            "/api/whatsapp/send-reminder",
            Some(&token),
            &json!({"studentNumber": "9876543210", "studentName": "Asha"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "WhatsApp reminder sent successfully");
    assert_eq!(body["data"]["to"], "919876543210");
    assert!(
        body["data"]["message"]
            .as_str()
            .unwrap()
            .contains("Hello Asha")
    );

    // Blank input is a validation error
    let response = state
        .http
        .oneshot(send(
            "POST",
            "/api/whatsapp/send-reminder",
            Some(&token),
            &json!({"studentNumber": "", "studentName": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E0002");
}
