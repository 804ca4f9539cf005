//! End-to-end tests over a real socket.

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{spawn_server, test_config};

#[tokio::test]
async fn test_ping() {
    let server = spawn_server(test_config()).await;
    let res = server.client.get(server.url("/ping")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), r#"{"message":"pong","status":200}"#);
}

#[tokio::test]
async fn test_get_data_token_gate() {
    let server = spawn_server(test_config()).await;

    let res = server.client.get(server.url("/getData")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get("key").is_none());
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"Message": "Token Not Present!"}));

    let res = server
        .client
        .get(server.url("/getData"))
        .header("Token", "auth")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["key"], "Val");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status_code"], 200);
    assert!(body["data"].is_string());
}

#[tokio::test]
async fn test_me_crud() {
    let server = spawn_server(test_config()).await;

    let res = server
        .client
        .post(server.url("/me"))
        .json(&json!({"password": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status_code"], 400);
    assert!(body["error"].is_string());

    let res = server
        .client
        .post(server.url("/me"))
        .json(&json!({"email": "a@b.com", "password": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), r#"{"email":"a@b.com","password":"x"}"#);

    let res = server.client.get(server.url("/me/17")).send().await.unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"user_id": "17"}));

    let res = server.client.delete(server.url("/me/17")).send().await.unwrap();
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"id": "17", "message": "Deleted"})
    );
}

#[tokio::test]
async fn test_query_and_path_echo() {
    let server = spawn_server(test_config()).await;

    let res = server
        .client
        .get(server.url("/get-QryStr?name=Ada&age=36"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"name": "Ada", "age": "36"})
    );

    let res = server
        .client
        .get(server.url("/get-UrlParams/Ada/36"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"name": "Ada", "age": "36"})
    );
}

#[tokio::test]
async fn test_admin_basic_auth() {
    let server = spawn_server(test_config()).await;

    let res = server.client.get(server.url("/admin/getData")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("www-authenticate"));

    let res = server
        .client
        .get(server.url("/admin/getData"))
        .basic_auth("user", Some("wrong"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .get(server.url("/admin/getData"))
        .basic_auth("user", Some("passw"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["user"], "user");
}

#[tokio::test]
async fn test_not_found_and_method_not_allowed() {
    let server = spawn_server(test_config()).await;

    let res = server.client.get(server.url("/does-not-exist")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"error": "route not found", "status_code": 404})
    );

    let res = server.client.put(server.url("/ping")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()["allow"], "GET");
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let server = spawn_server(test_config()).await;

    let mut handles = Vec::new();
    for i in 0..32 {
        let client = server.client.clone();
        let url = server.url(&format!("/me/{}", i));
        handles.push(tokio::spawn(async move {
            let res = client.get(url).send().await.unwrap();
            (i, res.json::<Value>().await.unwrap())
        }));
    }
    for handle in handles {
        let (i, body) = handle.await.unwrap();
        assert_eq!(body["user_id"], i.to_string());
    }
}

#[tokio::test]
async fn test_repeated_gets_identical() {
    let server = spawn_server(test_config()).await;
    let first = server
        .client
        .get(server.url("/getData1"))
        .send()
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    for _ in 0..3 {
        let again = server
            .client
            .get(server.url("/getData1"))
            .send()
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(again, first);
    }
}
