//! Quick Start - Named endpoints with hooks
//!
//! Registers two endpoints against a public JSON API, installs a result
//! processor and a global error handler, then calls them in both delivery
//! modes.
//!
//! ## Run
//! ```bash
//! RUST_LOG=backend_api=debug cargo run --example quick_start
//! ```

use backend_api::{
    DeliveryMode, EndpointDescriptor, InvocationHandle, InvocationOptions, PreSendDecision,
    ProcessedResult, RequestDispatcher,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut api = RequestDispatcher::builder()
        .base_url("https://jsonplaceholder.typicode.com")
        .http_debug(true)
        .endpoint("getUser", EndpointDescriptor::get("/users/1"))
        .endpoint("missing", EndpointDescriptor::get("/no-such-resource"))
        .build()?;

    // Treat a payload without an `id` as a business failure.
    api.set_result_processor(|body, _, _| {
        if body.get("id").is_some() {
            Some(ProcessedResult::success(body.clone()))
        } else {
            Some(ProcessedResult::failure(body.clone()))
        }
    });
    api.set_error_handler(|request, err| {
        eprintln!("[global] {} failed: {} ({})", request.endpoint, err, err.reason());
    });
    // Serve a canned user when the caller asks for offline data.
    api.set_pre_send_hook(|_, _, request| {
        if request.data_flag("offline") == Some(true) {
            PreSendDecision::Substitute(json!({"id": 0, "name": "offline user"}))
        } else {
            PreSendDecision::Send
        }
    });

    // Future delivery
    let user = api
        .invoke("getUser", InvocationOptions::new())
        .and_then(InvocationHandle::into_response)
        .ok_or("getUser is not registered")?
        .await?;
    println!("user: {}", user.body["name"]);

    let offline = api
        .invoke(
            "getUser",
            InvocationOptions::new().data(json!({"offline": true})),
        )
        .and_then(InvocationHandle::into_response)
        .ok_or("getUser is not registered")?
        .await?;
    println!("offline user: {}", offline.body["name"]);

    // Callback delivery
    api.set_delivery_mode(DeliveryMode::Callback);
    if let Some(handle) = api.invoke(
        "missing",
        InvocationOptions::new().on_error(|_, err| {
            println!("[call] missing failed with status {:?}", err.status_code());
        }),
    ) {
        handle.wait().await;
    }

    Ok(())
}
