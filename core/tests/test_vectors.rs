//! Verify URL derivation and list parsing against JSON test vectors stored in
//! `test-vectors/`.
//!
//! List vectors start from a client holding one sentinel widget. A vector
//! with `"expected_entities": null` expects that sentinel to survive.

mod common;

use common::Widget;
use jsonable_core::{Api, ApiError, ClientConfig, HttpRequest, HttpResult, ResponseHooks};
use serde_json::Value;

fn client(base_url: &str, response: HttpResult) -> Api<Widget> {
    let transport = move |_: HttpRequest| response.clone();
    Api::with_config(ClientConfig::new(base_url), transport)
}

#[derive(Default)]
struct CountListHooks(usize);

impl ResponseHooks<Widget> for CountListHooks {
    fn on_list_response(&mut self, _: usize, _: &mut Widget, _: &Value, _: &HttpResult) {
        self.0 += 1;
    }
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

#[test]
fn url_test_vectors() {
    let raw = include_str!("../../test-vectors/urls.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let api = client(case["base_url"].as_str().unwrap(), HttpResult::default());

        let collection = api.collection_url();
        let resource = match case["int_id"].as_i64() {
            Some(id) => api.resource_url(id),
            None => api.resource_url(case["id"].as_str().unwrap()),
        };

        if let Some(expected_error) = case.get("expected_error") {
            let err = collection.unwrap_err();
            match expected_error.as_str().unwrap() {
                "InvalidUrl" => assert!(
                    matches!(err, ApiError::InvalidUrl { .. }),
                    "{name}: expected InvalidUrl"
                ),
                "EmptyBaseUrl" => assert!(
                    matches!(err, ApiError::EmptyBaseUrl),
                    "{name}: expected EmptyBaseUrl"
                ),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            assert!(resource.is_err(), "{name}: resource url should fail too");
        } else {
            assert_eq!(
                collection.unwrap(),
                case["expected_collection_url"].as_str().unwrap(),
                "{name}: collection"
            );
            assert_eq!(
                resource.unwrap(),
                case["expected_resource_url"].as_str().unwrap(),
                "{name}: resource"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let response = HttpResult {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: vec![(
                "Content-Type".to_string(),
                sim["content_type"].as_str().unwrap().to_string(),
            )],
            data: sim["body"].as_str().unwrap().as_bytes().to_vec(),
            error: None,
        };

        let sentinel = Widget {
            id: "sentinel".to_string(),
            name: "sentinel".to_string(),
            quantity: 0,
        };
        let mut api = client("https://api.test/", response).with_hooks(CountListHooks::default());
        api.append(sentinel.clone());

        let mut completed = None;
        api.list(|result| completed = Some(result.status)).unwrap();
        assert_eq!(completed, Some(sim["status"].as_u64().unwrap() as u16), "{name}: callback");

        let expected: Vec<Widget> = match &case["expected_entities"] {
            Value::Null => vec![sentinel],
            other => serde_json::from_value(other.clone()).unwrap(),
        };
        assert_eq!(api.entities(), &expected[..], "{name}: entities");
        assert_eq!(
            api.hooks().0 as u64,
            case["expected_hook_calls"].as_u64().unwrap(),
            "{name}: hook calls"
        );
    }
}
