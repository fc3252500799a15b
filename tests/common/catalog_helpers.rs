use reqwest::{Client, Method};
use serde_json::{json, Value};

use crate::common::utils::{make_authenticated_request, TestApp};

async fn create(app: &TestApp, path: &str, body: Value) -> String {
    let client = Client::new();
    let response = make_authenticated_request(
        &client,
        Method::POST,
        &format!("{}/admin/{}", app.address, path),
        &app.organizer_token(),
        Some(body),
    )
    .await;

    assert_eq!(201, response.status().as_u16(), "Failed to create {}", path);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["id"].as_str().expect("No id in response").to_string()
}

pub async fn create_tournament(app: &TestApp) -> String {
    create(app, "tournaments", json!({ "name": "Spring Cup" })).await
}

pub async fn create_match(app: &TestApp, tournament_id: &str, name: &str) -> String {
    create(
        app,
        "matches",
        json!({ "tournament_id": tournament_id, "name": name }),
    )
    .await
}

pub async fn create_team(app: &TestApp, name: &str) -> String {
    create(app, "teams", json!({ "name": name })).await
}

pub async fn create_player(app: &TestApp, name: &str) -> String {
    create(app, "players", json!({ "name": name })).await
}

/// A tournament with one match, returning `(tournament_id, match_id)`.
pub async fn create_fixture(app: &TestApp) -> (String, String) {
    let tournament_id = create_tournament(app).await;
    let match_id = create_match(app, &tournament_id, "Final").await;
    (tournament_id, match_id)
}
