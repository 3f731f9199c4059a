mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use common::StubChat;

fn rome_content() -> Value {
    json!({
        "summary": "Two days in Rome",
        "days": [
            { "day": 1, "title": "Ancient Rome", "attractions": [
                { "name": "Colosseum", "time": "09:00" },
                { "name": "Forum" },
                { "name": "Palatine Hill" }
            ]},
            { "day": 2, "attractions": [ { "name": "Vatican Museums" } ] }
        ]
    })
}

async fn save_plan(app: &common::TestApp, token: &str, name: &str) -> Value {
    let (status, body) = app
        .post("/api/plans", Some(token), json!({ "name": name, "content": rome_content() }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "save plan failed: {}", body);
    body
}

#[tokio::test]
async fn plans_are_private_to_their_owner() {
    let app = common::app().await;
    let (ana, _) = app.register("ana@example.com").await;
    let (ben, _) = app.register("ben@example.com").await;

    let plan = save_plan(&app, &ana, "Rome weekend").await;
    let id = plan["id"].as_str().unwrap();
    assert_eq!(plan["is_favorite"], false);
    assert_eq!(plan["content"]["days"][1]["day"], 2);

    let (status, _) = app.get(&format!("/api/plans/{}", id), Some(&ben)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.delete(&format!("/api/plans/{}", id), Some(&ben)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/plans", Some(&ben)).await;
    assert_eq!(body["pagination"]["total"], 0);

    let (status, body) = app.get(&format!("/api/plans/{}", id), Some(&ana)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Rome weekend");

    let (status, _) = app.get("/api/plans", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn favorites_toggle_and_filter() {
    let app = common::app().await;
    let (ana, _) = app.register("ana@example.com").await;

    let first = save_plan(&app, &ana, "First").await;
    save_plan(&app, &ana, "Second").await;
    let id = first["id"].as_str().unwrap();

    let (status, body) = app
        .post(&format!("/api/plans/{}/favorite", id), Some(&ana), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_favorite"], true);

    let (_, body) = app.get("/api/plans?favorite=true", Some(&ana)).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "First");

    let (_, body) = app.get("/api/plans", Some(&ana)).await;
    assert_eq!(body["pagination"]["total"], 2);

    let (_, body) = app
        .post(&format!("/api/plans/{}/favorite", id), Some(&ana), json!({}))
        .await;
    assert_eq!(body["is_favorite"], false);
}

#[tokio::test]
async fn create_from_legacy_text_and_validation() {
    let app = common::app().await;
    let (ana, _) = app.register("ana@example.com").await;

    let (status, body) = app
        .post(
            "/api/plans",
            Some(&ana),
            json!({
                "name": "Paris",
                "legacy_text": "## Day 1: Museums\n- 09:00 - **Louvre** - Mona Lisa\n- Tuileries: picnic\n## Day 2\n- Eiffel Tower"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["content"]["days"].as_array().unwrap().len(), 2);
    assert_eq!(body["content"]["days"][0]["title"], "Museums");
    assert_eq!(body["content"]["days"][0]["attractions"][0]["name"], "Louvre");
    assert_eq!(body["content"]["days"][0]["attractions"][0]["time"], "09:00");

    let (status, _) = app
        .post(
            "/api/plans",
            Some(&ana),
            json!({ "name": "Nothing", "legacy_text": "We will just wander around." }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/plans", Some(&ana), json!({ "name": "Empty" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = app
        .post("/api/plans", Some(&ana), json!({ "name": "  ", "content": rome_content() }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/plans",
            Some(&ana),
            json!({ "name": "Ghost", "guide_id": "missing", "content": rome_content() }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/plans/parse", Some(&ana), json!({ "text": "Day 1\n- Colosseum" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"][0]["attractions"][0]["name"], "Colosseum");
}

#[tokio::test]
async fn edits_are_applied_and_persisted() {
    let app = common::app().await;
    let (ana, _) = app.register("ana@example.com").await;
    let plan = save_plan(&app, &ana, "Rome").await;
    let edits = format!("/api/plans/{}/edits", plan["id"].as_str().unwrap());

    let (status, body) = app
        .post(
            &edits,
            Some(&ana),
            json!({ "op": "move", "from_day": 0, "from_index": 2, "to_day": 1, "to_index": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["days"][1]["attractions"][0]["name"], "Palatine Hill");
    assert_eq!(body["content"]["days"][0]["attractions"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .post(
            &edits,
            Some(&ana),
            json!({ "op": "note", "day": 0, "index": 0, "note": "Buy tickets online" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(&edits, Some(&ana), json!({ "op": "remove", "day": 1, "index": 1 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(&edits, Some(&ana), json!({ "op": "remove", "day": 4, "index": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");

    let (_, body) = app
        .get(&format!("/api/plans/{}", plan["id"].as_str().unwrap()), Some(&ana))
        .await;
    let days = &body["content"]["days"];
    assert_eq!(days[0]["attractions"][0]["note"], "Buy tickets online");
    assert_eq!(days[1]["attractions"].as_array().unwrap().len(), 1);
    assert_eq!(days[1]["attractions"][0]["name"], "Palatine Hill");
}

#[tokio::test]
async fn update_and_delete_plan() {
    let app = common::app().await;
    let (ana, _) = app.register("ana@example.com").await;
    let plan = save_plan(&app, &ana, "Rome").await;
    let path = format!("/api/plans/{}", plan["id"].as_str().unwrap());

    let (status, body) = app
        .patch(&path, Some(&ana), json!({ "name": "Rome again", "is_offline": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Rome again");
    assert_eq!(body["is_offline"], true);
    assert_eq!(body["content"]["summary"], "Two days in Rome");

    let (status, _) = app.delete(&path, Some(&ana)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&path, Some(&ana)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generate_returns_a_truncated_preview() {
    let reply = json!({
        "summary": "Rome highlights",
        "days": [
            { "day": 1, "activities": [ { "title": "Colosseum", "time": "09:00" } ] },
            { "day": 2, "attractions": [ { "name": "Vatican" } ] },
            { "day": 3, "attractions": [ { "name": "Trastevere" } ] }
        ]
    });
    let app = common::app_with_ai(StubChat::Reply(format!("```json\n{}\n```", reply))).await;
    let (ana, _) = app.register("ana@example.com").await;
    let guide = app.create_guide(&ana, "Rome", "Rome", 0.0).await;

    let (status, body) = app
        .post(
            "/api/plans/generate",
            Some(&ana),
            json!({ "guide_id": guide, "days": 2, "preferences": { "interests": ["history"] } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["content"]["days"].as_array().unwrap().len(), 2);
    assert_eq!(body["content"]["days"][0]["attractions"][0]["name"], "Colosseum");
    assert_eq!(body["generation_params"]["days"], 2);
    assert_eq!(body["generation_params"]["preferences"]["interests"], json!(["history"]));

    // 미리보기만, 저장 안 됨
    let (_, plans) = app.get("/api/plans", Some(&ana)).await;
    assert_eq!(plans["pagination"]["total"], 0);

    let (status, _) = app
        .post("/api/plans/generate", Some(&ana), json!({ "guide_id": guide, "days": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/plans/generate", Some(&ana), json!({ "guide_id": "missing", "days": 2 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generate_surfaces_upstream_failures() {
    let app = common::app_with_ai(StubChat::Reply("Sorry, I can't help with that.".into())).await;
    let (ana, _) = app.register("ana@example.com").await;
    let guide = app.create_guide(&ana, "Rome", "Rome", 0.0).await;

    let (status, body) = app
        .post("/api/plans/generate", Some(&ana), json!({ "guide_id": guide, "days": 1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "AI returned invalid JSON");

    let app = common::app_with_ai(StubChat::Fail).await;
    let (ana, _) = app.register("ana@example.com").await;
    let guide = app.create_guide(&ana, "Rome", "Rome", 0.0).await;

    let (status, body) = app
        .post("/api/plans/generate", Some(&ana), json!({ "guide_id": guide, "days": 1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "upstream_error");
}

#[tokio::test]
async fn generate_accepts_loose_model_output() {
    let reply = json!({
        "days": [{ "attractions": [
            { "name": "Louvre", "title": "Louvre Museum", "notes": "book ahead" },
            { "name": null, "title": "Orsay" }
        ]}],
        "tips": ["Buy a museum pass", null]
    });
    let app = common::app_with_ai(StubChat::Reply(reply.to_string())).await;
    let (ana, _) = app.register("ana@example.com").await;
    let guide = app.create_guide(&ana, "Paris", "Paris", 0.0).await;

    let (status, body) = app
        .post("/api/plans/generate", Some(&ana), json!({ "guide_id": guide, "days": 1 }))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let items = &body["content"]["days"][0]["attractions"];
    assert_eq!(items[0]["name"], "Louvre");
    assert_eq!(items[0]["note"], "book ahead");
    assert_eq!(items[1]["name"], "Orsay");
    assert_eq!(body["content"]["tips"], json!(["Buy a museum pass"]));
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = common::app().await;
    let (ana, _) = app.register("ana@example.com").await;
    let plan = save_plan(&app, &ana, "Rome").await;
    let id = plan["id"].as_str().unwrap();

    let (status, body) = app
        .post(&format!("/api/plans/{}/edits", id), Some(&ana), json!({ "op": "swap" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
    assert!(body["error"].is_string());

    let (status, body) = app.get("/api/plans?favorite=maybe", Some(&ana)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");

    let (status, body) = app
        .post("/api/plans", Some(&ana), json!({ "content": rome_content() }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn offline_bundle_includes_guide_snapshot() {
    let app = common::app().await;
    let (ana, _) = app.register("ana@example.com").await;
    let guide = app.create_guide(&ana, "Rome", "Rome", 0.0).await;

    let (_, plan) = app
        .post(
            "/api/plans",
            Some(&ana),
            json!({ "name": "Rome", "guide_id": guide, "content": rome_content() }),
        )
        .await;
    save_plan(&app, &ana, "Not offline").await;
    app.patch(
        &format!("/api/plans/{}", plan["id"].as_str().unwrap()),
        Some(&ana),
        json!({ "is_offline": true }),
    )
    .await;

    let (status, body) = app.get("/api/offline/plans", Some(&ana)).await;
    assert_eq!(status, StatusCode::OK);
    let plans = body["plans"].as_array().unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0]["plan"]["name"], "Rome");
    assert_eq!(plans[0]["guide"]["title"], "Rome");
    assert!(plans[0]["guide"]["attractions"].is_array());
}

#[tokio::test]
async fn sync_replays_in_order_with_last_write_wins() {
    let app = common::app().await;
    let (ana, _) = app.register("ana@example.com").await;
    let (ben, _) = app.register("ben@example.com").await;
    let plan = save_plan(&app, &ana, "Rome").await;
    let id = plan["id"].as_str().unwrap();
    let bens = save_plan(&app, &ben, "Ben's").await;

    let soon = Utc::now() + Duration::minutes(1);
    let later = soon + Duration::seconds(30);
    let long_ago = Utc::now() - Duration::days(2);

    // 순서를 섞어 보냄. queued_at 순으로 재생하므로 `false`가 마지막에 적용
    let (status, body) = app
        .post(
            "/api/offline/sync",
            Some(&ana),
            json!({ "actions": [
                { "kind": "favorite", "plan_id": id, "value": false, "queued_at": later.to_rfc3339() },
                { "kind": "favorite", "plan_id": id, "value": true, "queued_at": soon.to_rfc3339() },
                { "kind": "offline", "plan_id": id, "value": true, "queued_at": long_ago.to_rfc3339() },
                { "kind": "offline", "plan_id": bens["id"], "value": true, "queued_at": soon.to_rfc3339() }
            ]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    let indices: Vec<u64> = results.iter().map(|r| r["index"].as_u64().unwrap()).collect();
    assert_eq!(indices, vec![2, 1, 3, 0]);
    assert_eq!(results[0]["status"], "stale");
    assert_eq!(results[0]["kind"], "offline");
    assert_eq!(results[1]["status"], "applied");
    assert_eq!(results[2]["status"], "not_found");
    assert_eq!(results[3]["status"], "applied");

    let (_, body) = app.get(&format!("/api/plans/{}", id), Some(&ana)).await;
    assert_eq!(body["is_favorite"], false);
    assert_eq!(body["is_offline"], false);
}
