use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::router::{booking_routes, panel_routes};
use shared_utils::test_utils::{JwtTestUtils, TestConfig};

#[tokio::test]
async fn panel_requires_a_staff_token() {
    let config = Arc::new(TestConfig::with_base_url("http://localhost:1"));
    let app = panel_routes(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/appointments")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn panel_rejects_a_forged_token() {
    let config = Arc::new(TestConfig::with_base_url("http://localhost:1"));
    let app = panel_routes(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/appointments")
                .header("Authorization", "Bearer forged.token.value")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn staff_token_opens_the_panel() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&mock_server)
        .await;

    let config = Arc::new(TestConfig::with_base_url(&mock_server.uri()));
    let token = JwtTestUtils::valid_staff_token(&config);
    let app = panel_routes(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/appointments")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn public_booking_needs_no_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let config = Arc::new(TestConfig::with_base_url(&mock_server.uri()));
    let app = booking_routes(config);

    let body = serde_json::json!({
        "patient_name": "Maria Lopez",
        "phone": "947236123",
        "service": "Limpieza dental",
        "date": "2024-06-01",
        "time": "09:00",
        "note": null,
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_public_booking_is_a_bad_request() {
    let config = Arc::new(TestConfig::with_base_url("http://localhost:1"));
    let app = booking_routes(config);

    let body = serde_json::json!({
        "patient_name": "Maria Lopez",
        "phone": "947236123",
        "service": "Limpieza dental",
        "date": "2024-06-01",
        "time": "quarter past nine",
        "note": null,
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
