// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

#![allow(dead_code)]

use actix_web::http::{header, Method};
use actix_web::test::TestRequest;
use serde_json::{json, Value};

/// Build a request to the REST API authenticated with `token`
pub fn request(method: Method, uri: &str, token: &str) -> TestRequest {
    TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

pub fn get(uri: &str, token: &str) -> TestRequest {
    request(Method::GET, uri, token)
}

pub fn post(uri: &str, token: &str) -> TestRequest {
    request(Method::POST, uri, token)
}

pub fn put(uri: &str, token: &str) -> TestRequest {
    request(Method::PUT, uri, token)
}

pub fn delete(uri: &str, token: &str) -> TestRequest {
    request(Method::DELETE, uri, token)
}

/// Body of a new event
pub fn movienight() -> Value {
    json!({
        "name": "movienight",
        "description": "movie night with the boys",
        "tags": ["movie"],
        "address": "1333 something lane",
        "date": "Monday"
    })
}

/// Extracts the id of a created resource from `body[key]["id"]`
pub fn id_of(body: &Value, key: &str) -> String {
    body[key]["id"]
        .as_str()
        .unwrap_or_else(|| panic!("response has no {key} id: {body}"))
        .to_owned()
}
