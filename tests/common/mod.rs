#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const COLLECT_PATH: &str = "/api/collect/";

pub fn status_path(reference: &str) -> String {
    format!("/api/transaction/{reference}/")
}

/// Body of an accepted collection.
pub fn accepted(reference: &str) -> Value {
    json!({
        "reference": reference,
        "ussd_code": "*126#",
        "operator": "MTN"
    })
}

/// Body of a status query answer, shaped like the live gateway's.
pub fn status_json(reference: &str, status: &str, reason: Option<&str>) -> Value {
    json!({
        "reference": reference,
        "external_reference": null,
        "status": status,
        "amount": 100,
        "currency": "XAF",
        "operator": "MTN",
        "code": "CP250101T00001",
        "operator_reference": "1880106956",
        "description": "Test payment",
        "reason": reason,
        "phone_number": "237670000000",
        "endpoint": "COLLECT"
    })
}

pub fn json_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

/// Answers every collect request with `response`.
pub async fn mount_collect(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(COLLECT_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Answers status queries for `reference` with `rounds` in order; the last one repeats.
pub async fn mount_status_rounds(
    server: &MockServer,
    reference: &str,
    rounds: Vec<ResponseTemplate>,
) {
    let Some((last, first)) = rounds.split_last() else {
        return;
    };
    // Earlier mounts win while they still have answers left.
    for response in first {
        Mock::given(method("GET"))
            .and(path(status_path(reference)))
            .respond_with(response.clone())
            .up_to_n_times(1)
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(status_path(reference)))
        .respond_with(last.clone())
        .mount(server)
        .await;
}

pub async fn received(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

/// Requests the server saw with the given method, in arrival order.
pub async fn received_with_method(server: &MockServer, verb: &str) -> Vec<Request> {
    received(server)
        .await
        .into_iter()
        .filter(|request| request.method.as_str() == verb)
        .collect()
}

pub fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
}
