mod common;

use actix_web::{http::header, test};
use serial_test::serial;

use common::TestApp;

#[actix_web::test]
async fn test_home_page() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );

    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    assert!(body.contains("Travel Guide Assistant"));
    assert!(body.contains("<a href=\"/\" class=\"active\">"));
    assert!(body.contains("<a href=\"/ticket-info\">"));
}

#[actix_web::test]
#[serial]
async fn test_health_endpoint() {
    std::env::set_var("OPENAI_API_KEY", "sk-test-1234567890");
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"]["airports"]["status"], "ok");
    assert_eq!(
        body["services"]["language_model"]["details"],
        "API key configured (sk-t***7890)"
    );

    std::env::remove_var("OPENAI_API_KEY");
}

#[actix_web::test]
#[serial]
async fn test_health_degraded_without_key() {
    std::env::remove_var("OPENAI_API_KEY");
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["language_model"]["status"], "error");
}

#[actix_web::test]
#[serial]
async fn test_health_with_non_ascii_key() {
    std::env::set_var("OPENAI_API_KEY", "ключ-test-ключ");
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["services"]["language_model"]["details"],
        "API key configured (ключ***ключ)"
    );

    std::env::remove_var("OPENAI_API_KEY");
}

#[actix_web::test]
async fn test_api_allows_cross_origin_reads() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/hotels")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}

#[actix_web::test]
async fn test_unknown_route() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/nonexistent").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
