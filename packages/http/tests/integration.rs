use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use restcall_http::{Client, ClientConfig, Request, ReqwestTransport, Transport};

const SUCCESS_BODY: &str = r#"{"message":"success"}"#;

fn plain_http_client() -> Client {
    Client::with_config(ClientConfig::default().plain_http(true)).unwrap()
}

fn host_of(server: &MockServer) -> String {
    server.address().to_string()
}

#[tokio::test]
async fn test_get_with_multi_value_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/endpoint"))
        .and(query_param("test1", "1"))
        .and(query_param("test3", "3"))
        .and(query_param("test3", "4"))
        .and(query_param("test3", "5"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("headerA", "valueA")
                .set_body_string(SUCCESS_BODY),
        )
        .mount(&server)
        .await;

    let host = host_of(&server);

    let response = tokio::task::spawn_blocking(move || {
        let client = plain_http_client();
        let request = Request::get("/endpoint")
            .with_base_uri(host)
            .with_query("test1", "1")
            .with_query("test3", "3&4&5");
        client.api(&request).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.as_deref(), Some(SUCCESS_BODY));
    // The http crate reports header names in lower case.
    assert_eq!(response.headers.get("headera"), Some(&"valueA".to_string()));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0].url.query(),
        Some("test1=1&test3=3&test3=4&test3=5")
    );
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("Authorization", "Bearer XXXX"))
        .and(header("Content-Type", "application/json"))
        .and(body_string(r#"{"test":"testResult"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string(SUCCESS_BODY))
        .mount(&server)
        .await;

    let host = host_of(&server);

    let response = tokio::task::spawn_blocking(move || {
        let client = plain_http_client();
        let request = Request::post("/v3/mail/send")
            .with_base_uri(host)
            .with_header("Authorization", "Bearer XXXX")
            .with_body(r#"{"test":"testResult"}"#);
        client.api(&request).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(response.status_code, 201);
    assert_eq!(response.body.as_deref(), Some(SUCCESS_BODY));
}

#[tokio::test]
async fn test_put_and_patch() {
    let server = MockServer::start().await;

    for verb in ["PUT", "PATCH"] {
        Mock::given(method(verb))
            .and(path("/v3/templates/1"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SUCCESS_BODY))
            .expect(1)
            .mount(&server)
            .await;
    }

    let host = host_of(&server);

    let (put, patch) = tokio::task::spawn_blocking(move || {
        let client = plain_http_client();
        let put = Request::put("/v3/templates/1")
            .with_base_uri(host.clone())
            .with_body(r#"{"name":"a"}"#);
        let patch = Request::patch("/v3/templates/1")
            .with_base_uri(host)
            .with_body(r#"{"name":"b"}"#);
        (client.api(&put).unwrap(), client.api(&patch).unwrap())
    })
    .await
    .unwrap();

    assert_eq!(put.status_code, 200);
    assert_eq!(patch.status_code, 200);
}

#[tokio::test]
async fn test_delete_with_body_and_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v3/suppression/bounces"))
        .and(header("Content-Type", "application/json"))
        .and(body_string(r#"{"emails":["a@example.com"]}"#))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let host = host_of(&server);

    let response = tokio::task::spawn_blocking(move || {
        let client = plain_http_client();
        let request = Request::delete("/v3/suppression/bounces")
            .with_base_uri(host)
            .with_body(r#"{"emails":["a@example.com"]}"#);
        client.api(&request).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(response.status_code, 204);
    assert!(response.body.is_none());
}

#[tokio::test]
async fn test_empty_body_sends_no_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/scopes"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let host = host_of(&server);

    let response = tokio::task::spawn_blocking(move || {
        let client = plain_http_client();
        let request = Request::post("/v3/scopes").with_base_uri(host);
        client.api(&request).unwrap()
    })
    .await
    .unwrap();

    // 200 carries an entity, even an empty one.
    assert_eq!(response.body.as_deref(), Some(""));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("content-type").is_none());
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn test_error_status_is_a_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/error"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"error":"Internal Server Error"}"#),
        )
        .mount(&server)
        .await;

    let host = host_of(&server);

    let response = tokio::task::spawn_blocking(move || {
        let client = plain_http_client();
        client
            .get(&Request::new().with_base_uri(host).with_endpoint("/api/error"))
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(response.status_code, 500);
    assert!(response.is_server_error());
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["error"], "Internal Server Error");
}

#[tokio::test]
async fn test_borrowed_transport_survives_client_close() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(2)
        .mount(&server)
        .await;

    let host = host_of(&server);

    let (first, second) = tokio::task::spawn_blocking(move || {
        let transport: Arc<dyn Transport> =
            Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap());
        let config = ClientConfig::default().plain_http(true);
        let request = Request::get("/health").with_base_uri(host);

        let client = Client::with_transport_and_config(transport.clone(), config.clone());
        let first = client.api(&request).unwrap();
        client.close().unwrap();

        let client = Client::with_transport_and_config(transport, config);
        let second = client.api(&request).unwrap();
        (first, second)
    })
    .await
    .unwrap();

    assert_eq!(first.body.as_deref(), Some("ok"));
    assert_eq!(second.body.as_deref(), Some("ok"));
}

#[test]
fn test_connection_failure_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let host = listener.local_addr().unwrap().to_string();
    drop(listener);

    let client = plain_http_client();
    let err = client
        .api(&Request::get("/unreachable").with_base_uri(host))
        .unwrap_err();

    assert!(err.is_transport());
}

#[test]
fn test_missing_method_never_reaches_the_network() {
    let client = plain_http_client();
    let err = client
        .api(&Request::new().with_base_uri("127.0.0.1:9").with_endpoint("/x"))
        .unwrap_err();

    assert!(err.is_unsupported_method());
}
