//! Integration tests for the queue endpoints.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{json_request, parse_response_body, request, test_config, TestApp};
use domain::models::UserRole;
use regex::Regex;
use serde_json::json;

#[tokio::test]
async fn test_join_returns_ticket() {
    let app = TestApp::new();

    let response = app
        .send(json_request(
            Method::POST,
            "/api/queue/join",
            json!({ "name": "Alice", "phone": "555-0101", "type": "Walk-in" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Successfully joined the queue");

    let data = &body["data"];
    assert_eq!(data["name"], "Alice");
    assert_eq!(data["type"], "Walk-in");
    assert_eq!(data["position"], 1);
    assert_eq!(data["estimatedWait"], "You are next");
    let token_format = Regex::new(r"^QY-[A-Z0-9]{4}$").unwrap();
    assert!(token_format.is_match(data["tokenNumber"].as_str().unwrap()));
}

#[tokio::test]
async fn test_join_without_name_is_rejected() {
    let app = TestApp::new();

    let response = app
        .send(json_request(
            Method::POST,
            "/api/queue/join",
            json!({ "name": "   " }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Please provide a name");
}

#[tokio::test]
async fn test_join_with_malformed_body_uses_error_envelope() {
    let app = TestApp::new();

    let response = app
        .send(
            axum::http::Request::builder()
                .method(Method::POST)
                .uri("/api/queue/join")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_response_body(response).await["success"], false);
}

#[tokio::test]
async fn test_vip_is_placed_ahead_of_walk_in() {
    let app = TestApp::new();
    let alice = app.join("Alice", Some("Walk-in")).await;
    let bob = app.join("Bob", Some("VIP")).await;
    assert_eq!(bob["position"], 1);

    let uri = format!("/api/queue/status/{}", alice["id"].as_str().unwrap());
    let body = app.get_json(&uri, None).await;
    assert_eq!(body["data"]["position"], 2);
    assert_eq!(body["data"]["estimatedWait"], "10 minutes");
    assert_eq!(body["data"]["status"], "waiting");
}

#[tokio::test]
async fn test_status_unknown_and_malformed_ids() {
    let app = TestApp::new();

    let missing = format!("/api/queue/status/{}", uuid::Uuid::new_v4());
    let response = app.send(request(Method::GET, &missing, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        parse_response_body(response).await["message"],
        "Queue item not found"
    );

    let response = app
        .send(request(Method::GET, "/api/queue/status/abc", None))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_current_when_idle() {
    let app = TestApp::new();

    let response = app.send(request(Method::GET, "/api/queue/current", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());
    assert_eq!(body["message"], "No one is currently being served");
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = TestApp::new();
    let entry = app.join("Alice", None).await;
    let uri = format!("/api/queue/start/{}", entry["id"].as_str().unwrap());

    let response = app.send(request(Method::PUT, &uri, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(request(Method::PUT, &uri, Some("not-a-jwt")))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let staff = app.token_for(UserRole::Staff).await;
    let response = app.send(request(Method::PUT, &uri, Some(&staff))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        parse_response_body(response).await["message"],
        "Access denied. Admin only."
    );

    let response = app.send(request(Method::GET, "/api/queue/stats", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_account_is_rejected() {
    let app = TestApp::new();
    let foreign = app
        .state
        .jwt
        .issue(uuid::Uuid::new_v4(), "admin")
        .unwrap()
        .token;

    let response = app
        .send(request(Method::GET, "/api/queue/stats", Some(&foreign)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_serving_hand_over() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let a = app.join("A", None).await;
    let b = app.join("B", None).await;
    let a_id = a["id"].as_str().unwrap();
    let b_id = b["id"].as_str().unwrap();

    let response = app
        .send(request(
            Method::PUT,
            &format!("/api/queue/start/{}", b_id),
            Some(&token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Started serving customer");
    assert_eq!(body["data"]["status"], "serving");

    app.send(request(
        Method::PUT,
        &format!("/api/queue/start/{}", a_id),
        Some(&token),
    ))
    .await;

    let current = app.get_json("/api/queue/current", None).await;
    assert_eq!(current["data"]["id"], a_id);

    let b_status = parse_response_body(
        app.send(request(
            Method::GET,
            &format!("/api/queue/status/{}", b_id),
            None,
        ))
        .await,
    )
    .await;
    assert_eq!(b_status["data"]["status"], "completed");
    assert!(b_status["data"]["position"].is_null());
}

#[tokio::test]
async fn test_complete_twice_is_rejected() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let entry = app.join("A", None).await;
    let uri = format!("/api/queue/complete/{}", entry["id"].as_str().unwrap());

    let response = app.send(request(Method::PUT, &uri, Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await["message"], "Service completed");

    let response = app.send(request(Method::PUT, &uri, Some(&token))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        parse_response_body(response).await["message"],
        "This token has already been completed"
    );
}

#[tokio::test]
async fn test_priority_bump_promotes_to_vip() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    app.join("A", None).await;
    let b = app.join("B", None).await;
    let uri = format!("/api/queue/priority/{}", b["id"].as_str().unwrap());

    let body = parse_response_body(app.send(request(Method::PUT, &uri, Some(&token))).await).await;
    assert_eq!(body["message"], "Priority increased");
    assert_eq!(body["data"]["priorityLevel"], 2);
    assert_eq!(body["data"]["type"], "Walk-in");

    let body = parse_response_body(app.send(request(Method::PUT, &uri, Some(&token))).await).await;
    assert_eq!(body["data"]["priorityLevel"], 3);
    assert_eq!(body["data"]["type"], "VIP");

    let list = app.get_json("/api/queue/list", None).await;
    assert_eq!(list["data"]["queue"][0]["id"], b["id"]);
}

#[tokio::test]
async fn test_priority_bump_on_serving_entry_fails() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let a = app.join("A", None).await;
    let id = a["id"].as_str().unwrap();

    app.send(request(
        Method::PUT,
        &format!("/api/queue/start/{}", id),
        Some(&token),
    ))
    .await;
    let response = app
        .send(request(
            Method::PUT,
            &format!("/api/queue/priority/{}", id),
            Some(&token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        parse_response_body(response).await["message"],
        "Can only change priority for waiting items"
    );
}

#[tokio::test]
async fn test_remove_entry() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let a = app.join("A", None).await;
    let uri = format!("/api/queue/{}", a["id"].as_str().unwrap());

    let response = app.send(request(Method::DELETE, &uri, Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Customer removed from queue");
    assert_eq!(body["data"]["id"], a["id"]);
    assert_eq!(body["data"]["tokenNumber"], a["tokenNumber"]);
    assert_eq!(body["data"]["name"], "A");

    let response = app.send(request(Method::DELETE, &uri, Some(&token))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters() {
    let app = TestApp::new();
    app.join("walk", None).await;
    app.join("vip", Some("VIP")).await;
    app.join("senior", Some("Senior")).await;

    let body = app.get_json("/api/queue/list", None).await;
    let names: Vec<&str> = body["data"]["queue"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["vip", "senior", "walk"]);
    assert!(body["data"]["currentlyServing"].is_null());

    let body = parse_response_body(
        app.send(request(Method::GET, "/api/queue/list?type=Senior", None))
            .await,
    )
    .await;
    assert_eq!(body["data"]["queue"].as_array().unwrap().len(), 1);

    let response = app
        .send(request(Method::GET, "/api/queue/list?status=asleep", None))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let a = app.join("A", None).await;
    app.join("B", Some("VIP")).await;
    app.join("C", Some("Senior")).await;

    app.clock.advance(chrono::Duration::minutes(7));
    app.send(request(
        Method::PUT,
        &format!("/api/queue/complete/{}", a["id"].as_str().unwrap()),
        Some(&token),
    ))
    .await;

    let body = app.get_json("/api/queue/stats", Some(&token)).await;
    let stats = &body["data"];
    assert_eq!(stats["totalWaiting"], 2);
    assert_eq!(stats["servedToday"], 1);
    assert_eq!(stats["averageWaitMinutes"], 10);
    assert!(stats["currentlyServing"].is_null());
    assert_eq!(stats["byType"]["VIP"], 1);
    assert_eq!(stats["byType"]["Senior"], 1);
    assert_eq!(stats["byType"]["Walk-in"], 0);
}

#[tokio::test]
async fn test_join_rate_limit() {
    let mut config = test_config();
    config.security.join_rate_limit_per_minute = 2;
    let app = TestApp::with_config(config);

    app.join("one", None).await;
    app.join("two", None).await;

    let response = app
        .send(json_request(
            Method::POST,
            "/api/queue/join",
            json!({ "name": "three" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let app = TestApp::new();
    let response = app
        .send(
            axum::http::Request::builder()
                .uri("/api/queue/current")
                .header("X-Request-ID", "kiosk-3")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.headers().get("x-request-id").unwrap(), "kiosk-3");
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}
