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
async fn event_round_trip() {
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
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let event_id = id_of(&body, "event");
    assert_eq!(body["event"]["name"], "movienight");
    assert_eq!(body["event"]["description"], "movie night with the boys");
    assert_eq!(body["event"]["tags"], json!(["movie"]));
    assert_eq!(body["event"]["address"], "1333 something lane");
    assert_eq!(body["event"]["date"], "Monday");
    assert_eq!(body["event"]["admin"], json!(alice.id));
    assert_eq!(body["event"]["guests"], json!([]));

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}"), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["event"]["name"], "movienight");
    assert_eq!(body["event"]["admin"]["id"], json!(alice.id));
    assert_eq!(body["event"]["admin"]["handle"], "alice");
    assert_eq!(body["event"]["tasks"], json!([]));

    let resp = test::call_service(&app, get("/v1/events", &token).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["events"].as_array().map(Vec::len), Some(1));

    let resp = test::call_service(
        &app,
        delete(&format!("/v1/events/{event_id}"), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "status": "deleted" }));

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}"), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "event_not_found");
}

#[actix_web::test]
async fn single_tag_is_accepted() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice");
    let token = ctx.token_for(alice.id);

    let app = test::init_service(App::new().configure(ctx.api_config())).await;

    let resp = test::call_service(
        &app,
        post("/v1/events", &token)
            .set_json(json!({ "name": "bbq", "tags": "food" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["event"]["tags"], json!(["food"]));
}

#[actix_web::test]
async fn blank_name_is_rejected() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice");
    let token = ctx.token_for(alice.id);

    let app = test::init_service(App::new().configure(ctx.api_config())).await;

    let resp = test::call_service(
        &app,
        post("/v1/events", &token)
            .set_json(json!({ "name": "   ", "date": "Monday" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "validation_failed");
    assert_eq!(
        body["errors"],
        json!([{ "field": "name", "code": "missing_value" }])
    );

    let resp = test::call_service(&app, get("/v1/events", &token).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "events": [] }));
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice");
    let token = ctx.token_for(alice.id);

    let app = test::init_service(App::new().configure(ctx.api_config())).await;

    let resp = test::call_service(
        &app,
        post("/v1/events", &token)
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": ")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "invalid_json");
}

#[actix_web::test]
async fn malformed_ids_are_a_bad_request() {
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

    let requests = [
        get("/v1/events/not-a-uuid", &token),
        post("/v1/events/not-a-uuid/tasks", &token).set_json(json!({ "name": "Bring Soda" })),
        post(&format!("/v1/events/{event_id}/guests/not-a-uuid"), &token),
        get(&format!("/v1/events/{event_id}/tasks/not-a-uuid"), &token),
        delete("/v1/friends/not-a-uuid", &token),
    ];

    for request in requests {
        let resp = test::call_service(&app, request.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get("content-type").map(|v| v.as_bytes()),
            Some(&b"application/json"[..])
        );

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({
                "code": "invalid_id",
                "message": "The path contains a malformed id"
            })
        );
    }
}

#[actix_web::test]
async fn admin_updates_event() {
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

    // guests may read but not edit
    let resp = test::call_service(
        &app,
        put(&format!("/v1/events/{event_id}"), &bob_token)
            .set_json(json!({ "date": "Tuesday" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        put(&format!("/v1/events/{event_id}"), &alice_token)
            .set_json(json!({ "date": "Tuesday" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["event"]["date"], "Tuesday");
    assert_eq!(body["event"]["name"], "movienight");
}

#[actix_web::test]
async fn non_admin_delete_leaves_the_event() {
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
        delete(&format!("/v1/events/{event_id}"), &bob_token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "status": "left" }));

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}"), &bob_token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}/guests"), &alice_token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "guests": [] }));
}

#[actix_web::test]
async fn guests_are_added_and_removed() {
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

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["guest"]["id"], json!(bob.id));
    assert_eq!(body["guest"]["events"], json!([event_id]));

    let resp = test::call_service(&app, post(&guest_uri, &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "already_guest");

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}/guests"), &token).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let guests = body["guests"].as_array().cloned().unwrap_or_default();
    assert_eq!(guests.len(), 1);
    assert_eq!(guests[0]["id"], json!(bob.id));

    let resp = test::call_service(&app, delete(&guest_uri, &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "remaining_guests": [] }));

    let resp = test::call_service(
        &app,
        get(&format!("/v1/events/{event_id}/guests"), &token).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "guests": [] }));

    let resp = test::call_service(&app, delete(&guest_uri, &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "not_a_guest");
}

#[actix_web::test]
async fn admin_cannot_be_removed() {
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
        delete(&format!("/v1/events/{event_id}/guests/{}", alice.id), &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "cannot_remove_admin");
}

#[actix_web::test]
async fn unknown_events_are_not_found_and_foreign_events_forbidden() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice");
    let carol = ctx.create_user("carol");
    let alice_token = ctx.token_for(alice.id);
    let carol_token = ctx.token_for(carol.id);

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
    let unknown_id = "00000000-0000-0000-0000-000000000000";

    for event in [event_id.as_str(), unknown_id] {
        let expected = if event == unknown_id {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::FORBIDDEN
        };

        let requests = [
            get(&format!("/v1/events/{event}"), &carol_token),
            put(&format!("/v1/events/{event}"), &carol_token).set_json(json!({ "name": "x" })),
            delete(&format!("/v1/events/{event}"), &carol_token),
            get(&format!("/v1/events/{event}/guests"), &carol_token),
            post(&format!("/v1/events/{event}/guests/{}", carol.id), &carol_token),
            delete(&format!("/v1/events/{event}/guests/{}", alice.id), &carol_token),
            get(&format!("/v1/events/{event}/tasks"), &carol_token),
            post(&format!("/v1/events/{event}/tasks"), &carol_token)
                .set_json(json!({ "name": "Bring Soda" })),
        ];

        for request in requests {
            let resp = test::call_service(&app, request.to_request()).await;
            assert_eq!(resp.status(), expected);
        }
    }
}
