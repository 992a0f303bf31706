mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn users_require_a_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/users", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["response_code"], 401);
    assert_eq!(body["response_message"], "Missing Authorization header");
    Ok(())
}

#[tokio::test]
async fn malformed_and_forged_tokens_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let url = format!("{}/users", server.base_url);

    for header in ["Token abc", "Bearer", "Bearer a b", "Bearer not.a.jwt"] {
        let res = client.get(&url).header("Authorization", header).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{header}");
    }

    let claims = user_crud_api::auth::Claims::new("mallory", common::JWT_ISSUER, 1);
    let forged = user_crud_api::auth::encode_token(&claims, "wrong-secret")?;
    let res = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", forged))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn register_validates_before_touching_storage() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let url = format!("{}/auth/register", server.base_url);

    let res = client
        .post(&url)
        .json(&json!({ "username": "john", "password": "weakpass" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["field_errors"]["password"].is_string(), "{body}");

    let res = client
        .post(&url)
        .json(&json!({ "password": "Secure#Pass1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn login_rejects_malformed_json() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["response_code"], 400);
    Ok(())
}
