//! End-to-end tests over a real listener.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_index_route_echoes_query() {
    let server = common::start_server(None).await;

    let response = reqwest::get(server.url("/?name=ada&name=grace")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    assert!(response.headers().contains_key("x-request-id"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["query"], json!({"name": "grace"}));
    assert_eq!(body["params"], json!({}));
    assert!(body["perf"].is_u64());

    server.stop().await;
}

#[tokio::test]
async fn test_index_route_rejects_post() {
    let server = common::start_server(None).await;

    let response = reqwest::Client::new()
        .post(server.url("/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 405);
    assert_eq!(body["success"], false);

    server.stop().await;
}

#[tokio::test]
async fn test_unknown_path_is_404_json() {
    let server = common::start_server(None).await;

    let response = reqwest::get(server.url("/does/not/exist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": false, "code": 404, "error": "Not Found"}));

    server.stop().await;
}

#[tokio::test]
async fn test_dynamic_segment() {
    let server = common::start_server(None).await;

    let response = reqwest::get(server.url("/users/ada%20l")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], "ada l");

    server.stop().await;
}

#[tokio::test]
async fn test_json_body_and_negotiation() {
    let server = common::start_server(None).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/echo"))
        .json(&json!({"n": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({"body": {"n": 1}}));

    let response = client
        .post(server.url("/echo"))
        .header(CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({"body": {}}));

    let response = client
        .post(server.url("/echo"))
        .header(CONTENT_TYPE, "text/plain")
        .body("hi")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);

    server.stop().await;
}

#[tokio::test]
async fn test_multipart_upload() {
    let server = common::start_server(None).await;

    let form = reqwest::multipart::Form::new().text("title", "report").part(
        "file",
        reqwest::multipart::Part::bytes(vec![1u8, 2, 3])
            .file_name("data.bin")
            .mime_str("application/octet-stream")
            .unwrap(),
    );
    let response = reqwest::Client::new()
        .post(server.url("/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["fields"][0]["name"], "title");
    assert_eq!(body["fields"][1]["file_name"], "data.bin");
    assert_eq!(body["fields"][1]["size"], 3);

    server.stop().await;
}

#[tokio::test]
async fn test_static_assets() {
    let server = common::start_server(None).await;

    let response = reqwest::get(server.url("/public/hello.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "hello from disk");

    let response = reqwest::get(server.url("/favicon.ico")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().as_ref(), &[0u8, 0, 1, 0]);

    let response = reqwest::get(server.url("/public/missing.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "Not Found");

    let response = reqwest::get(server.url("/public/%2e%2e/%2e%2e/etc/passwd")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    server.stop().await;
}
