//! ReqwestTransport against a local mockito server

#![cfg(feature = "reqwest")]

mod common;

use common::Model;
use courier::backends::ReqwestTransport;
use courier::{
    Client, Environment, Method, RequestError, RequestErrorKind, Requestable, Resource, Scheme,
    Secret, TransportError,
};
use futures::StreamExt;
use mockito::Matcher;

fn environment_for(server: &mockito::ServerGuard) -> Environment {
    let address = server.socket_address();
    Environment::builder(Scheme::Insecure, address.ip().to_string())
        .port(address.port())
        .secret(Secret::header("X-API-KEY", "c6fb701caa6b1fbe4290a16e77b564b8"))
        .build()
}

#[tokio::test]
async fn test_fetch_success() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/model")
        .match_header("x-api-key", "c6fb701caa6b1fbe4290a16e77b564b8")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name":"Gordon","age":10,"isDone":true}"#)
        .create_async()
        .await;

    let client = Client::new(environment_for(&server), ReqwestTransport::new());
    let model: Model = client
        .fetch(&Resource::json(Requestable::new("/api/model")))
        .await
        .expect("Fetch should succeed");

    assert_eq!(model.name, "Gordon");
    assert_eq!(model.age, 10);
    assert!(model.is_done);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_post_with_query_and_body() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/api/items")
        .match_query(Matcher::UrlEncoded("name".into(), "value".into()))
        .match_header("content-type", "application/json")
        .match_body(r#"{"name":"Gordon"}"#)
        .with_status(201)
        .with_body(r#"{"name":"Gordon","age":11,"isDone":false}"#)
        .create_async()
        .await;

    let request = Requestable::new("/api/items")
        .with_method(Method::Post)
        .with_parameter(("name", "value"))
        .with_header("Content-Type", "application/json")
        .with_body(br#"{"name":"Gordon"}"#.to_vec());

    let client = Client::new(environment_for(&server), ReqwestTransport::new());
    let results: Vec<_> = client.stream(&Resource::<Model>::json(request)).collect().await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].as_ref().expect("Created").age, 11);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/error")
        .with_status(404)
        .with_body("Not Found")
        .create_async()
        .await;

    let client = Client::new(environment_for(&server), ReqwestTransport::new());
    let result = client
        .fetch(&Resource::<Model>::json(Requestable::new("/api/error")))
        .await;

    assert!(matches!(result, Err(RequestError::UnhandledStatusCode(404))));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_json() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/invalid")
        .with_status(200)
        .with_body("not valid json")
        .create_async()
        .await;

    let client = Client::new(environment_for(&server), ReqwestTransport::new());
    let result = client
        .fetch(&Resource::<Model>::json(Requestable::new("/api/invalid")))
        .await;

    assert_eq!(result.expect_err("Invalid JSON").kind(), RequestErrorKind::Decode);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_raw_headers() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/raw")
        .with_status(503)
        .with_header("retry-after", "120")
        .with_body("Unavailable")
        .create_async()
        .await;

    let client = Client::new(environment_for(&server), ReqwestTransport::new());
    let response = client
        .fetch_raw(&Requestable::new("/api/raw"))
        .await
        .expect("HTTP response");

    assert_eq!(response.status, 503);
    assert_eq!(
        response.headers.get("Retry-After").map(|v| v.as_str()),
        Some("120")
    );
    assert_eq!(response.body.as_deref(), Some(&b"Unavailable"[..]));

    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_callback_style() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/api/model")
        .with_status(200)
        .with_body(r#"{"name":"Gordon","age":10,"isDone":true}"#)
        .create_async()
        .await;

    let (tx, rx) = tokio::sync::oneshot::channel();
    let client = Client::new(environment_for(&server), ReqwestTransport::new());
    client
        .submit(
            &Resource::<Model>::json(Requestable::new("/api/model")),
            move |result| {
                let _ = tx.send(result);
            },
        )
        .expect("Request builds")
        .resume();

    let model = rx.await.expect("Callback fired").expect("Decoded");
    assert_eq!(model.name, "Gordon");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused() {
    let environment = Environment::builder(Scheme::Insecure, "127.0.0.1")
        .port(1)
        .build();
    let client = Client::new(environment, ReqwestTransport::new());

    let result = client
        .fetch(&Resource::<Model>::json(Requestable::new("/")))
        .await;

    assert!(matches!(
        result,
        Err(RequestError::Response(TransportError::Connection(_)))
    ));
}
