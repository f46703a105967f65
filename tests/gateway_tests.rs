//! Gateway Tests
//!
//! Decode and encode against an in-memory state store.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use flyglance::gateway::{MemoryStateStore, QueryParams, RemoteStateGateway};
use flyglance::state::{AnnotationLayer, StateDocument};
use flyglance::{Credential, GatewayConfig, GlancerError};

fn config(token: &str) -> GatewayConfig {
    GatewayConfig::new()
        .with_state_url("https://store/nglstate")
        .with_viewer_url("https://viewer.example")
        .with_credential(Credential::new(token))
}

fn gateway_with(store: &Arc<MemoryStateStore>, token: &str) -> RemoteStateGateway {
    RemoteStateGateway::new(store.clone(), config(token))
}

// === Decode ===

#[test]
fn test_decode_json_url_with_bearer_token() {
    let store = Arc::new(MemoryStateStore::new().requiring_token("T"));
    store.insert("https://store/x123", json!({"layers": []})).unwrap();

    let document = gateway_with(&store, "T")
        .decode("https://ngl.flywire.ai/?json_url=https://store/x123")
        .unwrap();

    assert!(document.is_empty());
    assert_eq!(store.fetch_count(), 1);
    assert_eq!(store.tokens_seen(), vec!["T".to_string()]);
}

#[test]
fn test_decode_accepts_parsed_query() {
    let store = Arc::new(MemoryStateStore::new());
    store.insert("https://store/x123", json!({"layers": []})).unwrap();

    let mut params = QueryParams::new();
    params.insert("json_url".to_string(), vec!["https://store/x123".to_string()]);

    let document = gateway_with(&store, "T").decode(params).unwrap();
    assert!(document.is_empty());
}

#[test]
fn test_decode_fetch_failure_is_fatal() {
    let store = Arc::new(MemoryStateStore::new().failing_with(500));
    let err = gateway_with(&store, "T")
        .decode("https://ngl.flywire.ai/?json_url=https://store/x123")
        .unwrap_err();

    assert!(matches!(err, GlancerError::FetchFailed { status: 500, .. }));
    assert_eq!(store.fetch_count(), 1);
}

#[test]
fn test_decode_rejected_token() {
    let store = Arc::new(MemoryStateStore::new().requiring_token("T"));
    store.insert("https://store/x123", json!({"layers": []})).unwrap();

    let err = gateway_with(&store, "other")
        .decode("https://ngl.flywire.ai/?json_url=https://store/x123")
        .unwrap_err();
    assert!(matches!(err, GlancerError::FetchFailed { status: 401, .. }));
}

#[test]
fn test_decode_payload_without_layers_is_schema_error() {
    let store = Arc::new(MemoryStateStore::new());
    store.insert("https://store/bad", json!({"position": [0, 0, 0]})).unwrap();

    let err = gateway_with(&store, "T")
        .decode("https://ngl.flywire.ai/?json_url=https://store/bad")
        .unwrap_err();
    assert_eq!(err.error_code(), "SCHEMA_ERROR");
}

#[test]
fn test_bare_query_mode_builds_state_from_params() {
    let store = Arc::new(MemoryStateStore::new());
    let document = gateway_with(&store, "T")
        .decode("https://ngl.flywire.ai/?layers=%5B%5D&layout=3d")
        .unwrap();

    assert!(document.is_empty());
    assert_eq!(document.extra.get("layout"), Some(&json!("3d")));
    assert_eq!(store.call_count(), 0);
}

// === Encode ===

#[test]
fn test_round_trip_through_store() {
    let store = Arc::new(MemoryStateStore::new());
    let gateway = gateway_with(&store, "T");

    let original = StateDocument::from_value(json!({
        "dimensions": {"x": [4e-9, "m"], "y": [4e-9, "m"], "z": [4e-8, "m"]},
        "position": [100.5, 200.5, 30.0],
        "layout": "xy-3d",
        "layers": [
            {"type": "image", "name": "em", "source": "precomputed://gs://bucket/em"},
            {"type": "segmentation_with_graph", "name": "seg", "chunkedGraph": "https://cg"}
        ]
    }))
    .unwrap()
    .with_layer(AnnotationLayer::precomputed(
        "somepoints",
        "precomputed://h/precomputed/somepoints",
        "#ff0000",
    ));

    let url = gateway.encode(&original).unwrap();
    assert!(url.starts_with("https://viewer.example/?json_url=https://store/nglstate/"));

    let decoded = gateway.decode(url.as_str()).unwrap();
    assert_eq!(decoded, original);
    assert_eq!(store.publish_count(), 1);
    assert_eq!(store.fetch_count(), 1);
}

#[test]
fn test_repeated_encodes_yield_distinct_pointers() {
    let store = Arc::new(MemoryStateStore::new());
    let gateway = gateway_with(&store, "T");
    let document = StateDocument::from_space("hemibrain").unwrap();

    let first = gateway.encode(&document).unwrap();
    let second = gateway.encode(&document).unwrap();

    assert_ne!(first, second);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_publish_failure_is_fatal() {
    let store = Arc::new(MemoryStateStore::new().failing_with(503));
    let err = gateway_with(&store, "T")
        .encode(&StateDocument::empty())
        .unwrap_err();

    assert!(matches!(err, GlancerError::PublishFailed { status: 503, .. }));
    assert!(store.is_empty());
}
