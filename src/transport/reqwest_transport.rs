//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};

use super::{Response, ResponseMeta, Transport, TransportConfig};
use crate::error::DispatchError;
use crate::options::RequestOptions;

/// Query parameter used for cache busting when `cache` is `Some(false)`.
const CACHE_BUST_PARAM: &str = "_";

/// Build an HTTP client from TransportConfig
///
/// Applies timeout, proxy, user agent and default headers in one place so
/// every transport constructed from config behaves the same.
pub fn build_http_client_from_config(
    config: &TransportConfig,
) -> Result<reqwest::Client, DispatchError> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| DispatchError::Configuration(format!("Invalid proxy URL: {e}")))?;
        builder = builder.proxy(proxy);
    }

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    if !config.headers.is_empty() {
        builder = builder.default_headers(header_map(&config.headers)?);
    }

    builder
        .build()
        .map_err(|e| DispatchError::Configuration(format!("Failed to create HTTP client: {e}")))
}

fn header_map<'a, I>(headers: I) -> Result<HeaderMap, DispatchError>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut map = HeaderMap::new();
    for (k, v) in headers {
        let name = HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
            DispatchError::Configuration(format!("Invalid header name '{k}': {e}"))
        })?;
        let value = HeaderValue::from_str(v).map_err(|e| {
            DispatchError::Configuration(format!("Invalid header value for '{k}': {e}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Default [`Transport`] on top of `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, DispatchError> {
        Ok(Self {
            client: build_http_client_from_config(config)?,
            base_url: config.base_url.clone(),
        })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client, base_url: Option<String>) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Resolve a descriptor URL: absolute URLs are used as-is, relative ones
    /// are joined onto the base URL.
    pub fn resolve_url(&self, url: &str) -> Result<Url, DispatchError> {
        if let Ok(absolute) = Url::parse(url) {
            return Ok(absolute);
        }
        let Some(base) = &self.base_url else {
            return Err(DispatchError::Configuration(format!(
                "Relative URL '{url}' requires a base_url"
            )));
        };
        let joined = format!(
            "{}/{}",
            base.trim_end_matches('/'),
            url.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| DispatchError::Configuration(format!("Invalid URL '{joined}': {e}")))
    }

    fn build_request(
        &self,
        request: &RequestOptions,
    ) -> Result<reqwest::RequestBuilder, DispatchError> {
        let url = self.resolve_url(&request.url)?;
        let mut rb = self
            .client
            .request(request.method.clone(), url)
            .headers(header_map(&request.headers)?);

        let mut query = request.query.clone();
        let data_in_query = carries_data_in_query(&request.method);
        if data_in_query {
            if let Some(data) = &request.data {
                query.extend(data_to_query(data)?);
            }
        } else if let Some(data) = &request.data {
            rb = rb.json(data);
        }

        if request.cache == Some(false) && matches!(request.method, Method::GET | Method::HEAD) {
            query.push((
                CACHE_BUST_PARAM.to_string(),
                chrono::Utc::now().timestamp_millis().to_string(),
            ));
        }
        if !query.is_empty() {
            rb = rb.query(&query);
        }

        if let Some(timeout) = request.timeout {
            rb = rb.timeout(timeout);
        }
        Ok(rb)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestOptions) -> Result<Response, DispatchError> {
        let rb = self.build_request(request)?;
        let resp = rb.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or(text);
            tracing::debug!(target: "backend_api::http", request_id=%request.request_id, status=%status.as_u16(), "non-success status");
            return Err(DispatchError::status(status.as_u16(), message));
        }

        let headers = resp.headers().clone();
        let text = resp.text().await?;
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(Response {
            body,
            meta: ResponseMeta::from_http(status, headers),
        })
    }
}

fn carries_data_in_query(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::DELETE)
}

/// Flatten an object into query pairs. `null` entries are skipped and nested
/// values are JSON-encoded.
fn data_to_query(data: &serde_json::Value) -> Result<Vec<(String, String)>, DispatchError> {
    use serde_json::Value;

    let Value::Object(map) = data else {
        return Err(DispatchError::Configuration(
            "Request data for GET/HEAD/DELETE must be a JSON object".to_string(),
        ));
    };
    Ok(map
        .iter()
        .filter_map(|(k, v)| {
            let value = match v {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => other.to_string(),
            };
            Some((k.clone(), value))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointDescriptor;
    use crate::options::TransportOptions;
    use serde_json::json;
    use std::time::Duration;

    fn request(desc: EndpointDescriptor, opts: TransportOptions) -> RequestOptions {
        RequestOptions::merge("test", &desc, opts)
    }

    #[test]
    fn test_build_http_client_default() {
        assert!(build_http_client_from_config(&TransportConfig::default()).is_ok());
    }

    #[test]
    fn test_build_http_client_with_invalid_header_name() {
        let config = TransportConfig::new().with_header("Invalid Header Name", "value");
        let err = build_http_client_from_config(&config).unwrap_err();
        assert!(matches!(err, DispatchError::Configuration(_)));
    }

    #[test]
    fn resolve_url_joins_relative_paths() {
        let transport = ReqwestTransport::new(
            &TransportConfig::new().with_base_url("http://localhost:8080/api/"),
        )
        .unwrap();
        assert_eq!(
            transport.resolve_url("/users").unwrap().as_str(),
            "http://localhost:8080/api/users"
        );
        assert_eq!(
            transport.resolve_url("https://example.com/x").unwrap().as_str(),
            "https://example.com/x"
        );
    }

    #[test]
    fn relative_url_without_base_is_a_configuration_error() {
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let err = transport.resolve_url("fixtures/a.json").unwrap_err();
        assert!(matches!(err, DispatchError::Configuration(_)));
    }

    #[test]
    fn data_to_query_flattens_scalars() {
        let pairs = data_to_query(&json!({"a": 1, "b": "x", "c": null, "d": [1, 2]})).unwrap();
        assert!(pairs.contains(&("a".to_string(), "1".to_string())));
        assert!(pairs.contains(&("b".to_string(), "x".to_string())));
        assert!(pairs.contains(&("d".to_string(), "[1,2]".to_string())));
        assert_eq!(pairs.len(), 3);
        assert!(data_to_query(&json!([1, 2])).is_err());
    }

    #[tokio::test]
    async fn get_sends_data_as_query_and_parses_json() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/users")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "2".into()))
            .match_header("x-trace", "abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"users":[]}"#)
            .create_async()
            .await;

        let transport = ReqwestTransport::new(&TransportConfig::new().with_base_url(server.url()))
            .unwrap();
        let req = request(
            EndpointDescriptor::get("/users"),
            TransportOptions::new()
                .data(json!({"page": 2}))
                .header("x-trace", "abc"),
        );

        let resp = transport.send(&req).await.unwrap();
        assert_eq!(resp.body, json!({"users": []}));
        assert_eq!(resp.meta.status.map(|s| s.as_u16()), Some(200));
        assert_eq!(resp.meta.status_text, "success");
    }

    #[tokio::test]
    async fn post_sends_data_as_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/users")
            .match_body(mockito::Matcher::Json(json!({"name": "a"})))
            .with_status(201)
            .with_body("")
            .create_async()
            .await;

        let transport = ReqwestTransport::new(&TransportConfig::new().with_base_url(server.url()))
            .unwrap();
        let req = request(
            EndpointDescriptor::post("/users"),
            TransportOptions::new().data(json!({"name": "a"})),
        );

        let resp = transport.send(&req).await.unwrap();
        assert_eq!(resp.body, serde_json::Value::Null);
        assert_eq!(resp.meta.status.map(|s| s.as_u16()), Some(201));
    }

    #[tokio::test]
    async fn cache_false_adds_cache_busting_param() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/list")
            .match_query(mockito::Matcher::Regex("_=\\d+".into()))
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let transport = ReqwestTransport::new(&TransportConfig::new().with_base_url(server.url()))
            .unwrap();
        let req = request(
            EndpointDescriptor::get("/list"),
            TransportOptions::new().cache(false),
        );
        transport.send(&req).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_a_communication_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("nope")
            .create_async()
            .await;

        let transport = ReqwestTransport::new(&TransportConfig::new().with_base_url(server.url()))
            .unwrap();
        let err = transport
            .send(&request(
                EndpointDescriptor::get("/missing"),
                TransportOptions::new(),
            ))
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::status(404, "Not Found"));
        assert_eq!(err.reason(), "error");
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/bad")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let transport = ReqwestTransport::new(&TransportConfig::new().with_base_url(server.url()))
            .unwrap();
        let err = transport
            .send(&request(EndpointDescriptor::get("/bad"), TransportOptions::new()))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "parsererror");
    }

    #[tokio::test]
    async fn per_request_timeout_maps_to_timeout() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(&TransportConfig::new().with_base_url(server.uri()))
            .unwrap();
        let err = transport
            .send(&request(
                EndpointDescriptor::get("/slow"),
                TransportOptions::new().timeout(Duration::from_millis(50)),
            ))
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::Timeout);
    }
}
