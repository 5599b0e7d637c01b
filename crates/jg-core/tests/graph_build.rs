//! Integration tests: JSONC text → graph, and parse → emit → re-parse.
//!
//! Exercises the parser, builder, emitter and identity inference together on
//! fixture documents.

use jg_core::emitter::{emit_document, node_content};
use jg_core::identity::{infer_identity, show_label};
use jg_core::json_path;
use jg_core::model::*;
use jg_core::parser::parse_jsonc;
use jg_core::path::JsonPath;
use jg_core::sizing::GraphConfig;
use jg_core::{DEFAULT_COLOR, parse_graph};
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn graph_of(input: &str) -> JsonGraph {
    parse_graph(input, &GraphConfig::default()).expect("fixture should parse")
}

fn paths(graph: &JsonGraph) -> Vec<String> {
    graph.nodes().map(|n| n.path.to_string()).collect()
}

/// Emit the parsed document, rebuild from the emitted text, and compare.
fn assert_roundtrip_preserves(input: &str) {
    let value = parse_jsonc(input).expect("first parse failed");
    let emitted = emit_document(&value);
    let reparsed = parse_jsonc(&emitted).expect("re-parse failed");
    assert_eq!(value, reparsed, "value changed after round-trip:\n{emitted}");

    let g1 = graph_of(input);
    let g2 = graph_of(&emitted);
    assert_eq!(paths(&g1), paths(&g2), "node paths changed after round-trip");
    assert_eq!(
        g1.edges.iter().map(|e| e.id.clone()).collect::<Vec<_>>(),
        g2.edges.iter().map(|e| e.id.clone()).collect::<Vec<_>>(),
    );
}

// ─── Fixture: JSONC ──────────────────────────────────────────────────────

#[test]
fn jsonc_fixture_builds() {
    let g = graph_of(include_str!("fixtures/orders.jsonc"));
    assert_eq!(
        paths(&g),
        vec![
            "$",
            "$[\"customer\"]",
            "$[\"orders\"][0]",
            "$[\"orders\"][0][\"items\"][0]",
            "$[\"orders\"][0][\"items\"][1]",
            "$[\"orders\"][1]",
        ]
    );

    let root = g.find_by_path(&JsonPath::root()).unwrap();
    assert_eq!(root.rows[2].value, RowValue::Str("https://example.com/a//b".into()));

    let edge_text: Vec<Option<&str>> = g.edges.iter().map(|e| e.text.as_deref()).collect();
    assert_eq!(
        edge_text,
        vec![
            Some("customer"),
            Some("orders"),
            Some("items"),
            Some("items"),
            Some("orders"),
        ]
    );
}

#[test]
fn jsonc_fixture_identities() {
    let g = graph_of(include_str!("fixtures/orders.jsonc"));

    let customer = g.find_by_path(&json_path!["customer"]).unwrap();
    let identity = infer_identity(customer);
    assert_eq!(identity.name, "Ann Lee");
    assert_eq!(identity.color, "#22c55e");

    // first row is a number: rule 2 still applies
    let order = g.find_by_path(&json_path!["orders", 0]).unwrap();
    assert_eq!(infer_identity(order).name, "1001");
    assert_eq!(infer_identity(order).color, DEFAULT_COLOR);

    // bare element: no key, so the parent key wins over the value
    let pen = g.find_by_path(&json_path!["orders", 0, "items", 0]).unwrap();
    assert_eq!(infer_identity(pen).name, "items");
    assert!(!show_label(pen));
}

#[test]
fn jsonc_fixture_content() {
    let g = graph_of(include_str!("fixtures/orders.jsonc"));
    let second = g.find_by_path(&json_path!["orders", 1]).unwrap();
    assert_eq!(
        node_content(second),
        "{\n  \"id\": 1002,\n  \"total\": 7,\n  \"note\": null\n}"
    );
}

#[test]
fn roundtrip_jsonc_fixture() {
    assert_roundtrip_preserves(include_str!("fixtures/orders.jsonc"));
}

// ─── Fixture: JSON ───────────────────────────────────────────────────────

#[test]
fn json_fixture_flattens_nested_arrays() {
    let g = graph_of(include_str!("fixtures/catalog.json"));
    assert_eq!(g.len(), 9);

    for path in [json_path!["matrix", 0, 0], json_path!["matrix", 0, 1], json_path!["matrix", 1, 0]] {
        let node = g.find_by_path(&path).unwrap();
        assert!(node.is_bare());
        assert_eq!(node.parent_key.as_deref(), Some("matrix"));
        assert_eq!(node.parent_type, Some(ContainerKind::Array));
    }

    let root = g.find_by_path(&JsonPath::root()).unwrap();
    let matrix = root.rows.iter().find(|r| r.key() == Some("matrix")).unwrap();
    assert_eq!(matrix.children_count(), Some(2));
    assert_eq!(matrix.to.len(), 3);
}

#[test]
fn json_fixture_empty_object() {
    let g = graph_of(include_str!("fixtures/catalog.json"));
    let empty = g.find_by_path(&json_path!["empty"]).unwrap();
    assert_eq!(empty.rows.len(), 1);
    assert_eq!(empty.rows[0].key, None);
    assert_eq!(empty.rows[0].children_count(), Some(0));
    assert_eq!(node_content(empty), "{0 keys}");
}

#[test]
fn image_previews_are_square() {
    let input = include_str!("fixtures/catalog.json");
    let config = GraphConfig {
        image_preview: true,
        ..GraphConfig::default()
    };
    let g = parse_graph(input, &config).unwrap();
    let image = g.find_by_path(&json_path!["gallery", 0]).unwrap();
    assert_eq!((image.width, image.height), (80.0, 80.0));

    let plain = graph_of(input);
    let text = plain.find_by_path(&json_path!["gallery", 0]).unwrap();
    assert_eq!(text.height, 36.0);
    assert!(text.width > 80.0);
}

#[test]
fn roundtrip_json_fixture() {
    assert_roundtrip_preserves(include_str!("fixtures/catalog.json"));
}

// ─── Errors ──────────────────────────────────────────────────────────────

#[test]
fn invalid_documents_are_rejected() {
    for input in ["", "{", "{\"a\": }", "/* open", "[1 2]"] {
        let err = parse_graph(input, &GraphConfig::default()).unwrap_err();
        assert!(err.starts_with("JSON parse error: "), "{input:?} → {err}");
    }
}
