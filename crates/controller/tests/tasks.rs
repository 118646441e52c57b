// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use actix_web::http::StatusCode;
use actix_web::{test, App};
use common::{delete, get, id_of, movienight, post, put};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_util::TestContext;

mod common;

#[actix_web::test]
async fn tasks_are_added_and_deleted() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice");
    let bob = ctx.create_user("bob");
    let token = ctx.token_for(alice.id);

    let app = test::init_service(App::new().configure(ctx.api_config())).await;

    let resp = test::call_service(
        &app,
        post("/v1/events", &token)
            .set_json(movienight())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let event_id = id_of(&body, "event");

    let resp = test::call_service(
        &app,
        post(&format!("/v1/events/{event_id}/guests/{}", bob.id), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        post(&format!("/v1/events/{event_id}/tasks"), &token)
            .set_json(json!({
                "name": "Bring Soda",
                "description": "two bottles",
                "assignees": bob.id,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let task_id = id_of(&body, "task");
    assert_eq!(body["task"]["name"], "Bring Soda");
    assert_eq!(body["task"]["done"], false);
    assert_eq!(body["task"]["event_id"], json!(event_id));
    assert_eq!(body["task"]["assignees"], json!([bob.id]));

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}/tasks"), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let tasks = body["tasks"].as_array().cloned().unwrap_or_default();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], json!(task_id));
    assert_eq!(tasks[0]["assignees"][0]["handle"], "bob");

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}"), &token).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["event"]["tasks"][0]["name"], "Bring Soda");

    let resp = test::call_service(
        &app,
        delete(&format!("/v1/events/{event_id}/tasks/{task_id}"), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "tasks": [] }));

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}/tasks"), &token).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "tasks": [] }));

    let resp = test::call_service(
        &app,
        delete(&format!("/v1/events/{event_id}/tasks/{task_id}"), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "task_not_in_event");
}

#[actix_web::test]
async fn guest_toggles_done() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice");
    let bob = ctx.create_user("bob");
    let alice_token = ctx.token_for(alice.id);
    let bob_token = ctx.token_for(bob.id);

    let app = test::init_service(App::new().configure(ctx.api_config())).await;

    let resp = test::call_service(
        &app,
        post("/v1/events", &alice_token)
            .set_json(movienight())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let event_id = id_of(&body, "event");

    let resp = test::call_service(
        &app,
        post(&format!("/v1/events/{event_id}/guests/{}", bob.id), &alice_token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        post(&format!("/v1/events/{event_id}/tasks"), &alice_token)
            .set_json(json!({ "name": "Bring Chips" }))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let task_id = id_of(&body, "task");
    let task_uri = format!("/v1/events/{event_id}/tasks/{task_id}");

    for done in [true, false, true] {
        let resp = test::call_service(
            &app,
            put(&task_uri, &bob_token)
                .set_json(json!({ "done": done }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["task"]["done"], done);
        assert_eq!(body["task"]["name"], "Bring Chips");
    }

    let resp = test::call_service(&app, get(&task_uri, &bob_token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["task"]["done"], true);

    // adding and removing tasks is up to the admin
    let resp = test::call_service(
        &app,
        post(&format!("/v1/events/{event_id}/tasks"), &bob_token)
            .set_json(json!({ "name": "Bring Cake" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, delete(&task_uri, &bob_token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn unknown_assignee_creates_no_task() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice");
    let token = ctx.token_for(alice.id);

    let app = test::init_service(App::new().configure(ctx.api_config())).await;

    let resp = test::call_service(
        &app,
        post("/v1/events", &token)
            .set_json(movienight())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let event_id = id_of(&body, "event");

    let resp = test::call_service(
        &app,
        post(&format!("/v1/events/{event_id}/tasks"), &token)
            .set_json(json!({
                "name": "Bring Soda",
                "assignees": ["00000000-0000-0000-0000-000000000000"],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "user_not_found");

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}/tasks"), &token).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "tasks": [] }));
}

#[actix_web::test]
async fn blank_task_name_is_rejected() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice");
    let token = ctx.token_for(alice.id);

    let app = test::init_service(App::new().configure(ctx.api_config())).await;

    let resp = test::call_service(
        &app,
        post("/v1/events", &token)
            .set_json(movienight())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let event_id = id_of(&body, "event");

    let resp = test::call_service(
        &app,
        post(&format!("/v1/events/{event_id}/tasks"), &token)
            .set_json(json!({ "name": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}/tasks"), &token).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "tasks": [] }));
}

#[actix_web::test]
async fn removed_guest_is_unassigned() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice");
    let bob = ctx.create_user("bob");
    let token = ctx.token_for(alice.id);

    let app = test::init_service(App::new().configure(ctx.api_config())).await;

    let resp = test::call_service(
        &app,
        post("/v1/events", &token)
            .set_json(movienight())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let event_id = id_of(&body, "event");
    let guest_uri = format!("/v1/events/{event_id}/guests/{}", bob.id);

    let resp = test::call_service(&app, post(&guest_uri, &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        post(&format!("/v1/events/{event_id}/tasks"), &token)
            .set_json(json!({ "name": "Bring Soda", "assignees": [bob.id] }))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let task_id = id_of(&body, "task");

    let resp = test::call_service(&app, delete(&guest_uri, &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}/tasks/{task_id}"), &token).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["task"]["assignees"], json!([]));
}

#[actix_web::test]
async fn task_of_other_event_is_not_found() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice");
    let token = ctx.token_for(alice.id);

    let app = test::init_service(App::new().configure(ctx.api_config())).await;

    let mut event_ids = vec![];
    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            post("/v1/events", &token)
                .set_json(movienight())
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        event_ids.push(id_of(&body, "event"));
    }

    let resp = test::call_service(
        &app,
        post(&format!("/v1/events/{}/tasks", event_ids[0]), &token)
            .set_json(json!({ "name": "Bring Soda" }))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let task_id = id_of(&body, "task");

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{}/tasks/{task_id}", event_ids[1]), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "task_not_found");
}
