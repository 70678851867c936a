//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, the expected request, a simulated
//! response, and the expected outcome or error. Cases with
//! `expected_build_error` must fail validation before any request exists.

use penio_core::{
    HttpMethod, HttpRequest, HttpResponse, NewPage, Outcome, PageClient, PageError, PageUpdate,
};
use pretty_assertions::assert_eq;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> PageClient {
    PageClient::with_base_url(BASE_URL, "key")
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "HEAD" => HttpMethod::Head,
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn error_kind(err: &PageError) -> &'static str {
    match err {
        PageError::InvalidName { .. } => "InvalidName",
        PageError::InvalidPassword { .. } => "InvalidPassword",
        PageError::InvalidTitle { .. } => "InvalidTitle",
        PageError::InvalidFormat(_) => "InvalidFormat",
        PageError::ResponseError { .. } => "ResponseError",
        PageError::Transport(_) => "Transport",
        PageError::Serialization(_) => "Serialization",
        PageError::Config(_) => "Config",
    }
}

fn assert_outcome(name: &str, outcome: &Outcome, expected: &Value) {
    match expected {
        Value::String(kind) => assert_eq!(&format!("{outcome:?}"), kind, "{name}: outcome"),
        Value::Object(map) => {
            let body = map["Page"].as_str().unwrap();
            assert_eq!(outcome, &Outcome::Page(body.to_string()), "{name}: page body");
        }
        other => panic!("{name}: bad expected_result: {other}"),
    }
}

/// Drive every case in a vector file through `build` and `parse`.
fn run_vectors<B, P>(raw: &str, build: B, parse: P)
where
    B: Fn(&Value) -> Result<HttpRequest, PageError>,
    P: Fn(HttpResponse) -> Result<Outcome, PageError>,
{
    let vectors: Value = serde_json::from_str(raw).unwrap();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let built = build(&case["input"]);

        if let Some(expected) = case.get("expected_build_error") {
            let err = built.unwrap_err();
            assert_eq!(error_kind(&err), expected.as_str().unwrap(), "{name}: build error");
            continue;
        }

        // Verify build
        let req = built.unwrap();
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
        assert_eq!(
            req.body.as_deref(),
            expected_req["body"].as_str(),
            "{name}: body"
        );

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = parse(response);

        if let Some(expected) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(error_kind(&err), expected.as_str().unwrap(), "{name}: parse error");
        } else {
            assert_outcome(name, &result.unwrap(), &case["expected_result"]);
        }
    }
}

#[test]
fn check_test_vectors() {
    let c = client();
    run_vectors(
        include_str!("../../test-vectors/check.json"),
        |input| c.build_check_page(input["name"].as_str().unwrap()),
        |response| c.parse_check_page(response),
    );
}

#[test]
fn create_test_vectors() {
    let c = client();
    run_vectors(
        include_str!("../../test-vectors/create.json"),
        |input| {
            let page: NewPage = serde_json::from_value(input.clone()).unwrap();
            c.build_create_page(&page)
        },
        |response| c.parse_create_page(response),
    );
}

#[test]
fn update_test_vectors() {
    let c = client();
    run_vectors(
        include_str!("../../test-vectors/update.json"),
        |input| {
            let update: PageUpdate = serde_json::from_value(input["update"].clone()).unwrap();
            c.build_update_page(
                input["name"].as_str().unwrap(),
                input["password"].as_str().unwrap(),
                &update,
            )
        },
        |response| c.parse_update_page(response),
    );
}

#[test]
fn delete_test_vectors() {
    let c = client();
    run_vectors(
        include_str!("../../test-vectors/delete.json"),
        |input| {
            c.build_delete_page(
                input["name"].as_str().unwrap(),
                input["password"].as_str().unwrap(),
            )
        },
        |response| c.parse_delete_page(response),
    );
}

#[test]
fn get_test_vectors() {
    let c = client();
    run_vectors(
        include_str!("../../test-vectors/get.json"),
        |input| {
            c.build_get_page(
                input["name"].as_str().unwrap(),
                input["password"].as_str(),
                input["format"].as_str().unwrap(),
            )
        },
        |response| c.parse_get_page(response),
    );
}
