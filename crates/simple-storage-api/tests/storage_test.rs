//! Integration tests for the storage engine routes.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

const DEPLOYER: &str = "00000000-0000-0000-0000-0000000000d1";
const STRANGER: &str = "00000000-0000-0000-0000-0000000000e2";

async fn store(
    app: axum::Router,
    storage_id: &str,
    caller: &str,
    favorite_number: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    common::post_json(
        app,
        "/api/v1/storage/store",
        &json!({
            "storage_id": storage_id,
            "caller": caller,
            "favorite_number": favorite_number
        }),
    )
    .await
}

async fn add_person(
    app: axum::Router,
    storage_id: &str,
    caller: &str,
    name: &str,
    favorite_number: u64,
) -> (StatusCode, serde_json::Value) {
    common::post_json(
        app,
        "/api/v1/storage/add-person",
        &json!({
            "storage_id": storage_id,
            "caller": caller,
            "name": name,
            "favorite_number": favorite_number
        }),
    )
    .await
}

#[tokio::test]
async fn test_deploy_sets_owner_and_zero_number() {
    let app = common::build_test_app();

    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    let (status, json) =
        common::get_json(app.clone(), &format!("/api/v1/storage/{storage_id}/owner")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["owner"], DEPLOYER);

    let (status, json) =
        common::get_json(app, &format!("/api/v1/storage/{storage_id}/retrieve")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["favorite_number"], 0);
}

#[tokio::test]
async fn test_owner_store_is_retrievable_and_logged() {
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    let (status, json) = store(app.clone(), &storage_id, DEPLOYER, json!(5)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["event_ids"].as_array().unwrap().len(), 1);

    let (_, json) =
        common::get_json(app.clone(), &format!("/api/v1/storage/{storage_id}/retrieve")).await;
    assert_eq!(json["favorite_number"], 5);

    let (status, events) =
        common::get_json(app, &format!("/api/v1/storage/{storage_id}/events")).await;
    assert_eq!(status, StatusCode::OK);
    let events = events.as_array().unwrap();
    let stored: Vec<_> = events
        .iter()
        .filter(|e| e["event_type"] == "storage.number_stored")
        .collect();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["payload"]["NumberStored"]["favorite_number"], 5);
    assert_eq!(stored[0]["initiated_by"], DEPLOYER);
}

#[tokio::test]
async fn test_stranger_store_is_rejected_and_number_unchanged() {
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    let (status, json) = store(app.clone(), &storage_id, STRANGER, json!(5)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "unauthorized");

    let (_, json) =
        common::get_json(app.clone(), &format!("/api/v1/storage/{storage_id}/retrieve")).await;
    assert_eq!(json["favorite_number"], 0);

    let (_, events) =
        common::get_json(app, &format!("/api/v1/storage/{storage_id}/events")).await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_type"], "storage.deployed");
}

#[tokio::test]
async fn test_any_caller_can_add_person() {
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    let (status, _) = add_person(app.clone(), &storage_id, STRANGER, "Person", 5).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = common::get_json(
        app.clone(),
        &format!("/api/v1/storage/{storage_id}/favorite-numbers?name=Person"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["favorite_number"], 5);

    let (_, events) =
        common::get_json(app, &format!("/api/v1/storage/{storage_id}/events")).await;
    let added: Vec<_> = events
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["event_type"] == "storage.person_added")
        .collect();
    assert_eq!(added.len(), 1);
    assert_eq!(
        added[0]["payload"]["PersonAdded"],
        json!({ "name": "Person", "favorite_number": 5 })
    );
    assert_eq!(added[0]["initiated_by"], STRANGER);
}

#[tokio::test]
async fn test_duplicate_name_overwrites_lookup_but_keeps_both_entries() {
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    add_person(app.clone(), &storage_id, STRANGER, "Jane Doe", 3).await;
    add_person(app.clone(), &storage_id, DEPLOYER, "Jane Doe", 9).await;

    let (_, json) = common::get_json(
        app.clone(),
        &format!("/api/v1/storage/{storage_id}/favorite-numbers?name=Jane%20Doe"),
    )
    .await;
    assert_eq!(json["favorite_number"], 9);

    let (status, people) =
        common::get_json(app.clone(), &format!("/api/v1/storage/{storage_id}/people")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        people,
        json!([
            { "name": "Jane Doe", "favorite_number": 3 },
            { "name": "Jane Doe", "favorite_number": 9 }
        ])
    );

    let (status, person) =
        common::get_json(app.clone(), &format!("/api/v1/storage/{storage_id}/people/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(person["favorite_number"], 9);

    let (_, view) = common::get_json(app, &format!("/api/v1/storage/{storage_id}")).await;
    assert_eq!(view["distinct_people"], 1);
    assert_eq!(view["person_entries"], 2);
    assert_eq!(view["version"], 3);
}

#[tokio::test]
async fn test_unknown_name_looks_up_as_zero() {
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    let (status, json) = common::get_json(
        app,
        &format!("/api/v1/storage/{storage_id}/favorite-numbers?name=Nobody"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["favorite_number"], 0);
}

#[tokio::test]
async fn test_negative_number_returns_400() {
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    let (status, json) = store(app, &storage_id, DEPLOYER, json!(-5)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_input");
}

#[tokio::test]
async fn test_number_above_u64_max_returns_400() {
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;
    let body = format!(
        r#"{{"storage_id":"{storage_id}","caller":"{DEPLOYER}","favorite_number":18446744073709551616}}"#
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/storage/store")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(json["error"], "invalid_input");
}

#[tokio::test]
async fn test_u64_max_is_stored_exactly() {
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    let (status, _) = store(app.clone(), &storage_id, DEPLOYER, json!(u64::MAX)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) =
        common::get_json(app, &format!("/api/v1/storage/{storage_id}/retrieve")).await;
    assert_eq!(json["favorite_number"], u64::MAX);
}

#[tokio::test]
async fn test_unknown_storage_returns_404() {
    let app = common::build_test_app();
    let unknown = Uuid::new_v4();

    let (status, json) =
        common::get_json(app.clone(), &format!("/api/v1/storage/{unknown}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "aggregate_not_found");

    let (status, _) = store(app.clone(), &unknown.to_string(), DEPLOYER, json!(1)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = add_person(app, &unknown.to_string(), DEPLOYER, "Person", 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_engines_are_isolated() {
    let app = common::build_test_app();
    let first = common::deploy(app.clone(), DEPLOYER).await;
    let second = common::deploy(app.clone(), STRANGER).await;

    store(app.clone(), &first, DEPLOYER, json!(7)).await;

    let (_, json) =
        common::get_json(app.clone(), &format!("/api/v1/storage/{first}/retrieve")).await;
    assert_eq!(json["favorite_number"], 7);
    let (_, json) = common::get_json(app, &format!("/api/v1/storage/{second}/retrieve")).await;
    assert_eq!(json["favorite_number"], 0);
}

#[tokio::test]
async fn test_empty_name_is_stored_and_looked_up() {
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    let (status, _) = add_person(app.clone(), &storage_id, STRANGER, "", 4).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = common::get_json(
        app.clone(),
        &format!("/api/v1/storage/{storage_id}/favorite-numbers?name="),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["favorite_number"], 4);

    let (_, person) =
        common::get_json(app, &format!("/api/v1/storage/{storage_id}/people/0")).await;
    assert_eq!(person, json!({ "name": "", "favorite_number": 4 }));
}

#[tokio::test]
async fn test_lookup_without_name_is_rejected() {
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/v1/storage/{storage_id}/favorite-numbers"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_favorite_number_getter_tracks_store() {
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    let (status, json) = common::get_json(
        app.clone(),
        &format!("/api/v1/storage/{storage_id}/favorite-number"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["favorite_number"], 0);

    store(app.clone(), &storage_id, DEPLOYER, json!(12)).await;

    let (status, json) =
        common::get_json(app, &format!("/api/v1/storage/{storage_id}/favorite-number")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["favorite_number"], 12);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_add_person_calls_are_serialized() {
    const WRITERS: u64 = 16;
    let app = common::build_test_app();
    let storage_id = common::deploy(app.clone(), DEPLOYER).await;

    let mut writers = tokio::task::JoinSet::new();
    for n in 0..WRITERS {
        let app = app.clone();
        let storage_id = storage_id.clone();
        writers.spawn(async move {
            add_person(app, &storage_id, STRANGER, &format!("person-{n}"), n).await
        });
    }
    while let Some(joined) = writers.join_next().await {
        let (status, json) = joined.unwrap();
        assert_eq!(status, StatusCode::OK, "add-person failed: {json}");
    }

    let (_, view) = common::get_json(app.clone(), &format!("/api/v1/storage/{storage_id}")).await;
    assert_eq!(view["version"], WRITERS + 1);
    assert_eq!(view["distinct_people"], WRITERS);

    let (_, events) =
        common::get_json(app, &format!("/api/v1/storage/{storage_id}/events")).await;
    let events = events.as_array().unwrap();
    let added = events
        .iter()
        .filter(|e| e["event_type"] == "storage.person_added")
        .count();
    assert_eq!(u64::try_from(added).unwrap(), WRITERS);
    let sequence: Vec<u64> = events
        .iter()
        .map(|e| e["sequence_number"].as_u64().unwrap())
        .collect();
    assert_eq!(sequence, (1..=WRITERS + 1).collect::<Vec<_>>());
}
