//! Shared setup: a wiremock server serving the JSON fixtures and a dispatcher
//! registered against it.
#![allow(dead_code)]

use backend_api::{DeliveryMode, EndpointDescriptor, ProcessedResult, RequestDispatcher};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BUSINESS_SUCCESS_FIXTURE: &str = include_str!("../fixtures/business-success.json");
pub const BUSINESS_ERROR_FIXTURE: &str = include_str!("../fixtures/business-error.json");

pub fn business_success_result() -> Value {
    serde_json::from_str(BUSINESS_SUCCESS_FIXTURE).expect("valid fixture")
}

pub fn business_error_result() -> Value {
    serde_json::from_str(BUSINESS_ERROR_FIXTURE).expect("valid fixture")
}

/// Start a server that serves both fixtures. Any other path answers 404.
pub async fn fixture_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fixtures/business-success.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(BUSINESS_SUCCESS_FIXTURE, "application/json"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fixtures/business-error.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(BUSINESS_ERROR_FIXTURE, "application/json"),
        )
        .mount(&server)
        .await;
    server
}

/// Dispatcher with the `error`, `businessSuccess` and `businessError` endpoints.
pub fn dispatcher(server: &MockServer, mode: DeliveryMode) -> RequestDispatcher {
    RequestDispatcher::builder()
        .base_url(server.uri())
        .delivery_mode(mode)
        // communication error: nothing is mounted here
        .endpoint("error", EndpointDescriptor::get("/no-such-endpoint"))
        .endpoint(
            "businessSuccess",
            EndpointDescriptor::get("fixtures/business-success.json"),
        )
        .endpoint(
            "businessError",
            EndpointDescriptor::get("fixtures/business-error.json"),
        )
        .build()
        .expect("dispatcher builds")
}

/// Treats a truthy `status` as a business failure and decorates successful
/// payloads with a user name.
pub fn install_status_processor(api: &mut RequestDispatcher) {
    api.set_result_processor(|body, _, _| {
        if body["status"].as_i64().unwrap_or(0) != 0 {
            return Some(ProcessedResult::failure(body.clone()));
        }
        let mut result = body.clone();
        result["data"]["user"]["name"] = Value::String("patched by processor".to_string());
        Some(ProcessedResult::success(result))
    });
}

/// Number of requests the mock server has received.
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|r| r.len())
        .unwrap_or_default()
}
