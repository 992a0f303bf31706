mod common;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

// Storage-backed tests. They run only when TEST_DATABASE_URL points at a
// disposable Postgres database; the server migrates it at startup.

const PASSWORD: &str = "Secure#Pass1";

/// Usernames unique to one test run, sharing a `like`-able prefix.
fn run_prefix() -> String {
    format!("jo{}", &uuid::Uuid::new_v4().simple().to_string()[..8])
}

async fn register(client: &Client, base_url: &str, username: &str) -> Result<Value> {
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": PASSWORD,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    Ok(body["data"].clone())
}

async fn login(client: &Client, base_url: &str, username: &str) -> Result<String> {
    let res = client
        .post(format!("{}/auth/login", base_url))
        .json(&json!({ "username": username.to_uppercase(), "password": PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["username"], username);
    let token = body["data"]["token"].as_str().context("login returned no token")?;
    Ok(format!("Bearer {}", token))
}

async fn list(client: &Client, base_url: &str, auth: &str, query: &[(&str, &str)]) -> Result<(StatusCode, Value)> {
    let res = client
        .get(format!("{}/users", base_url))
        .header("Authorization", auth)
        .query(query)
        .send()
        .await?;
    let status = res.status();
    Ok((status, res.json().await?))
}

#[tokio::test]
async fn user_lifecycle_against_postgres() -> Result<()> {
    let Some(server) = common::ensure_db_server().await? else {
        return Ok(());
    };
    let client = Client::new();
    let base = server.base_url.as_str();

    let prefix = run_prefix();
    let first_name = format!("{}a", prefix);
    let second_name = format!("{}b", prefix);
    let first = register(&client, base, &first_name).await?;
    let second = register(&client, base, &second_name).await?;
    assert!(first.get("password").is_none());

    // Duplicate usernames are rejected case-insensitively
    let res = client
        .post(format!("{}/auth/register", base))
        .json(&json!({ "username": first_name.to_uppercase(), "password": PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let auth = login(&client, base, &first_name).await?;
    let like = format!("username:{}%:like", prefix);

    // Last sort token wins: newest first, so page 2 of size 1 is the first user
    let (status, body) = list(
        &client,
        base,
        &auth,
        &[
            ("filter", like.as_str()),
            ("sort", "username:asc,created_at:desc"),
            ("pageSize", "1"),
            ("page", "2"),
        ],
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    let pagination = &body["data"]["pagination"];
    assert_eq!(pagination["page"], 2);
    assert_eq!(pagination["page_size"], 1);
    assert_eq!(pagination["total_data"], 2);
    assert_eq!(pagination["total_page"], 2);
    assert_eq!(pagination["total_data_per_page"], 1);
    let rows = body["data"]["data"].as_array().context("data is not an array")?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], first["id"]);

    // Unlimited page, uuid-typed filter
    let id_filter = format!("id:{}:eq|{}", second["id"].as_str().unwrap_or_default(), like);
    let (status, body) = list(&client, base, &auth, &[("filter", id_filter.as_str())]).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["pagination"]["total_data"], 1);
    assert_eq!(body["data"]["pagination"]["total_page"], 1);
    assert_eq!(body["data"]["pagination"]["page_size"], -1);
    assert_eq!(body["data"]["data"][0]["username"], second_name.as_str());

    // `not` over text
    let not_filter = format!("username:{},{}:not|{}", first_name, "nobody", like);
    let (_, body) = list(&client, base, &auth, &[("filter", not_filter.as_str())]).await?;
    assert_eq!(body["data"]["data"][0]["username"], second_name.as_str());
    assert_eq!(body["data"]["pagination"]["total_data"], 1);

    // Update
    let user_url = format!("{}/users/{}", base, first["id"].as_str().unwrap_or_default());
    let renamed = format!("{}z", prefix);
    let res = client
        .put(&user_url)
        .header("Authorization", &auth)
        .json(&json!({ "username": renamed, "password": "Another#Pass2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["username"], renamed.as_str());
    assert_eq!(body["data"]["created_at"], first["created_at"]);

    let res = client.get(&user_url).header("Authorization", &auth).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["data"]["username"], renamed.as_str());

    // Delete, then the user is gone
    let res = client.delete(&user_url).header("Authorization", &auth).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(
        body["response_message"],
        format!("{} has been deleted", first["id"].as_str().unwrap_or_default())
    );

    let res = client.get(&user_url).header("Authorization", &auth).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = client.delete(&user_url).header("Authorization", &auth).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let (_, body) = list(&client, base, &auth, &[("filter", like.as_str())]).await?;
    assert_eq!(body["data"]["pagination"]["total_data"], 1);
    Ok(())
}

#[tokio::test]
async fn badly_typed_filter_value_is_bad_request() -> Result<()> {
    let Some(server) = common::ensure_db_server().await? else {
        return Ok(());
    };
    let client = Client::new();
    let auth = common::bearer_token("tester");

    let (status, body) = list(&client, &server.base_url, &auth, &[("filter", "id:not-a-uuid:eq")]).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["response_message"], "invalid filter value");
    Ok(())
}
