//! Registry management through the dispatcher.

use backend_api::{EndpointDescriptor, Method, Registry, RequestDispatcher};
use serde_json::json;

fn api_config() -> Registry {
    serde_json::from_value(json!({
        "error": {"type": "GET", "url": "http://baidu.com"},
        "businessSuccess": {"type": "GET", "url": "fixtures/business-success.json"},
        "businessError": {"type": "GET", "url": "fixtures/business-error.json"}
    }))
    .expect("valid registry")
}

#[test]
fn constructor_takes_initial_registry() {
    let api = RequestDispatcher::new(api_config());
    assert_eq!(api.registry(), &api_config());
}

#[test]
fn configure_replaces_registry() {
    let mut api = RequestDispatcher::new(Registry::new());
    assert!(api.registry().is_empty());

    api.configure(api_config());
    assert_eq!(api.registry(), &api_config());
}

#[test]
fn register_adds_single_endpoint() {
    let mut api = RequestDispatcher::new(Registry::new());
    let test_api = EndpointDescriptor::get("/test");

    api.register("test", test_api.clone());

    assert_eq!(api.lookup("test"), Some(&test_api));
    let expected: Registry = [("test", test_api)].into_iter().collect();
    assert_eq!(api.registry(), &expected);
}

#[test]
fn register_overwrites_existing_endpoint() {
    let mut api = RequestDispatcher::new(api_config());
    api.register("error", EndpointDescriptor::post("/other"));

    let desc = api.lookup("error").unwrap();
    assert_eq!(desc.method, Method::POST);
    assert_eq!(desc.url, "/other");
    assert_eq!(api.registry().len(), 3);
}

#[test]
fn registry_round_trips_through_json() {
    let registry = api_config();
    let value = serde_json::to_value(&registry).unwrap();
    assert_eq!(value["error"]["method"], "GET");
    assert_eq!(serde_json::from_value::<Registry>(value).unwrap(), registry);
}
