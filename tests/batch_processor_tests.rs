//! Integration tests for batched execution.
//!
//! A mock Data API echoes one entry per bound id so tests can check how
//! inputs were sliced, how callback arguments line up with entries, and how
//! failed batches are isolated.

use std::sync::Arc;

use rcsb_query::{
    BatchError, BatchOptions, BatchProcessor, DataApiConfig, EndpointUrl, QueryBuilder,
    SchemaIndex,
};
use serde_json::{json, Map, Value};
use wiremock::{Match, Mock, MockServer, Request, Respond, ResponseTemplate};

fn config_for(server: &MockServer) -> DataApiConfig {
    DataApiConfig::builder()
        .endpoint(EndpointUrl::new(format!("{}/graphql", server.uri())).unwrap())
        .build()
        .unwrap()
}

fn schema() -> Arc<SchemaIndex> {
    Arc::new(
        SchemaIndex::from_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/data_api_schema.json"
        ))
        .unwrap(),
    )
}

fn entries_query() -> QueryBuilder {
    QueryBuilder::new(schema())
        .field_with("entries", [("entry_ids", "$ids")])
        .unwrap()
        .field("rcsb_id")
        .unwrap()
        .end()
}

fn ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{i:04}")).collect()
}

fn variables_of(request: &Request) -> Value {
    serde_json::from_slice::<Value>(&request.body)
        .map(|body| body["variables"].clone())
        .unwrap_or(Value::Null)
}

/// Responds with one `{"rcsb_id": id}` entry per id bound to `variable`.
struct EchoIds {
    field: &'static str,
    variable: &'static str,
}

impl Respond for EchoIds {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let entries: Vec<Value> = variables_of(request)[self.variable]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|id| json!({ "rcsb_id": id }))
            .collect();
        let mut data = Map::new();
        data.insert(self.field.to_string(), Value::Array(entries));
        ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
    }
}

/// Matches the batch whose first bound id is the given id.
struct FirstIdIs(&'static str);

impl Match for FirstIdIs {
    fn matches(&self, request: &Request) -> bool {
        variables_of(request)["ids"][0] == self.0
    }
}

fn rcsb_id(entry: Value, _kwargs: &Map<String, Value>) -> String {
    entry["rcsb_id"].as_str().unwrap_or_default().to_string()
}

// ============================================================================
// Slicing
// ============================================================================

#[tokio::test]
async fn test_inputs_over_default_batch_size_send_two_requests() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::method("POST"))
        .respond_with(EchoIds {
            field: "entries",
            variable: "ids",
        })
        .expect(2)
        .mount(&server)
        .await;

    let processor = BatchProcessor::new(&config_for(&server)).unwrap();
    let mut results = processor
        .run(&entries_query(), ids(250), rcsb_id, BatchOptions::new())
        .await
        .unwrap();

    results.sort();
    assert_eq!(results, ids(250));

    let requests = server.received_requests().await.unwrap();
    let mut sizes: Vec<usize> = requests
        .iter()
        .map(|r| variables_of(r)["ids"].as_array().map_or(0, Vec::len))
        .collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![50, 200]);
}

#[tokio::test]
async fn test_single_worker_still_processes_every_batch() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::method("POST"))
        .respond_with(EchoIds {
            field: "entries",
            variable: "ids",
        })
        .expect(5)
        .mount(&server)
        .await;

    let processor = BatchProcessor::new(&config_for(&server)).unwrap();
    let results = processor
        .run(
            &entries_query(),
            ids(45),
            rcsb_id,
            BatchOptions::new().batch_size(10).max_workers(1),
        )
        .await
        .unwrap();

    // One worker drains batches in dispatch order
    assert_eq!(results, ids(45));
}

#[tokio::test]
async fn test_every_request_carries_the_same_query() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::method("POST"))
        .respond_with(EchoIds {
            field: "entries",
            variable: "ids",
        })
        .mount(&server)
        .await;

    let processor = BatchProcessor::new(&config_for(&server)).unwrap();
    processor
        .run(
            &entries_query(),
            ids(30),
            rcsb_id,
            BatchOptions::new().batch_size(10),
        )
        .await
        .unwrap();

    let expected = "query entries($ids: [String!]!) {\n  entries(entry_ids: $ids) {\n    rcsb_id\n  }\n}";
    for request in server.received_requests().await.unwrap() {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["query"], expected);
    }
}

// ============================================================================
// Failure Isolation
// ============================================================================

#[tokio::test]
async fn test_failed_batch_is_dropped_without_error() {
    let server = MockServer::start().await;
    Mock::given(FirstIdIs("0200"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(wiremock::matchers::method("POST"))
        .respond_with(EchoIds {
            field: "entries",
            variable: "ids",
        })
        .expect(1)
        .mount(&server)
        .await;

    let processor = BatchProcessor::new(&config_for(&server)).unwrap();
    let mut results = processor
        .run(&entries_query(), ids(400), rcsb_id, BatchOptions::new())
        .await
        .unwrap();

    results.sort();
    assert_eq!(results.len(), 200);
    assert_eq!(results, ids(200));
}

#[tokio::test]
async fn test_graphql_errors_drop_only_their_batch() {
    let server = MockServer::start().await;
    Mock::given(FirstIdIs("0000"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": null, "errors": [{"message": "bad id"}]})),
        )
        .mount(&server)
        .await;
    Mock::given(wiremock::matchers::method("POST"))
        .respond_with(EchoIds {
            field: "entries",
            variable: "ids",
        })
        .mount(&server)
        .await;

    let processor = BatchProcessor::new(&config_for(&server)).unwrap();
    let results = processor
        .run(
            &entries_query(),
            ids(20),
            rcsb_id,
            BatchOptions::new().batch_size(10),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 10);
    assert!(results.iter().all(|id| id.as_str() >= "0010"));
}

// ============================================================================
// Callback Arguments
// ============================================================================

#[tokio::test]
async fn test_iter_kwargs_follow_absolute_input_position() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::method("POST"))
        .respond_with(EchoIds {
            field: "entries",
            variable: "ids",
        })
        .expect(3)
        .mount(&server)
        .await;

    let labels: Vec<Value> = (0..25).map(|i| json!(format!("label-{i:04}"))).collect();
    let options = BatchOptions::new()
        .batch_size(10)
        .const_kwarg("source", json!("rcsb"))
        .iter_kwarg("label", labels);

    let processor = BatchProcessor::new(&config_for(&server)).unwrap();
    let results = processor
        .run(
            &entries_query(),
            ids(25),
            |entry, kwargs| {
                (
                    entry["rcsb_id"].as_str().unwrap_or_default().to_string(),
                    kwargs["label"].as_str().unwrap_or_default().to_string(),
                    kwargs["source"].clone(),
                )
            },
            options,
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 25);
    for (id, label, source) in results {
        assert_eq!(label, format!("label-{id}"));
        assert_eq!(source, json!("rcsb"));
    }
}

#[tokio::test]
async fn test_records_bind_one_list_per_variable() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::method("POST"))
        .respond_with(EchoIds {
            field: "polymer_entity",
            variable: "entity",
        })
        .expect(1)
        .mount(&server)
        .await;

    let query = QueryBuilder::new(schema())
        .field_with(
            "polymer_entity",
            [("entry_id", "$entry"), ("entity_id", "$entity")],
        )
        .unwrap()
        .field("rcsb_id")
        .unwrap()
        .end();

    let records: Vec<Map<String, Value>> = [("4HHB", "1"), ("1TUP", "2")]
        .into_iter()
        .map(|(entry, entity)| {
            let mut record = Map::new();
            record.insert("entry".to_string(), json!(entry));
            record.insert("entity".to_string(), json!(entity));
            record
        })
        .collect();

    let processor = BatchProcessor::new(&config_for(&server)).unwrap();
    let results = processor
        .run(&query, records, rcsb_id, BatchOptions::new())
        .await
        .unwrap();
    assert_eq!(results, vec!["1", "2"]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        variables_of(&requests[0]),
        json!({"entry": ["4HHB", "1TUP"], "entity": ["1", "2"]})
    );
}

// ============================================================================
// Preconditions
// ============================================================================

#[tokio::test]
async fn test_preconditions_fail_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let processor = BatchProcessor::new(&config_for(&server)).unwrap();

    let unbound = QueryBuilder::new(schema())
        .field_with("entry", [("entry_id", "4HHB")])
        .unwrap()
        .field("rcsb_id")
        .unwrap();
    let error = processor
        .run(&unbound, ids(3), rcsb_id, BatchOptions::new())
        .await
        .unwrap_err();
    assert_eq!(
        error,
        BatchError::NoBoundVariable {
            field: "entry".to_string()
        }
    );

    let error = processor
        .run(
            &entries_query(),
            ids(3),
            rcsb_id,
            BatchOptions::new().iter_kwarg("label", vec![json!("a")]),
        )
        .await
        .unwrap_err();
    assert!(matches!(error, BatchError::IterKwargsLength { expected: 3, actual: 1, .. }));

    let error = processor
        .run(&QueryBuilder::new(schema()), ids(3), rcsb_id, BatchOptions::new())
        .await
        .unwrap_err();
    assert_eq!(error, BatchError::MissingRootField);
}
