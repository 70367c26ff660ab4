//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use todo_core::{
    ApiError, CreateTodo, DeleteTodo, HttpMethod, HttpRequest, HttpResponse, Snapshot, TodoClient,
    UpdateTodo,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn cases(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Check a built request against `expected_request`, then feed the
/// simulated response through `parse_snapshot`.
fn check_case(c: &TodoClient, case: &Value, req: HttpRequest) {
    let name = case["name"].as_str().unwrap();
    let expected_req = &case["expected_request"];

    assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected_req["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected_req.get("body") {
        Some(expected_body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, expected_body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }

    let sim = &case["simulated_response"];
    let response = HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    };
    let result = c.parse_snapshot(response);

    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        match expected_error.as_str().unwrap() {
            "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
            "HttpError" => assert!(matches!(err, ApiError::HttpError { .. }), "{name}: expected HttpError"),
            other => panic!("{name}: unknown expected_error: {other}"),
        }
    } else {
        let snapshot = result.unwrap();
        let expected: Snapshot = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(snapshot, expected, "{name}: parsed result");
    }
}

#[test]
fn read_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/read.json")) {
        check_case(&c, &case, c.build_read());
    }
}

#[test]
fn create_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/create.json")) {
        let input: CreateTodo = serde_json::from_value(case["input"].clone()).unwrap();
        let req = c.build_create(&input).unwrap();
        check_case(&c, &case, req);
    }
}

#[test]
fn update_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/update.json")) {
        let input: UpdateTodo = serde_json::from_value(case["input"].clone()).unwrap();
        let req = c.build_update(&input).unwrap();
        check_case(&c, &case, req);
    }
}

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/delete.json")) {
        let input: DeleteTodo = serde_json::from_value(case["input"].clone()).unwrap();
        let req = c.build_delete(&input).unwrap();
        check_case(&c, &case, req);
    }
}
