//! Integration Tests for API Endpoints
//!
//! Drives the full router against a mocked Logseq HTTP API.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use logseq_context::{create_router, AppState, Config, LogseqClient};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// == Helper Functions ==

fn create_test_app(server: &MockServer, graph_path: Option<PathBuf>) -> Router {
    let client = LogseqClient::new(&server.uri(), None, Duration::from_secs(5)).unwrap();
    let config = Config {
        api_url: server.uri(),
        graph_path,
        ..Config::default()
    };
    create_router(AppState::from_config(Arc::new(client), config))
}

/// Answers `api_method` called with exactly `args`.
async fn mock_call(server: &MockServer, api_method: &str, args: Value, result: Value) {
    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_json(json!({ "method": api_method, "args": args })))
        .respond_with(ResponseTemplate::new(200).set_body_json(result))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Answers `api_method` for any arguments, below exact matches.
async fn mock_any(server: &MockServer, api_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_partial_json(json!({ "method": api_method })))
        .respond_with(ResponseTemplate::new(200).set_body_json(result))
        .with_priority(10)
        .mount(server)
        .await;
}

async fn send(app: &Router, http_method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(http_method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, Body::empty()).await
}

fn pages(names: &[&str]) -> Value {
    Value::Array(names.iter().map(|name| json!({ "name": name })).collect())
}

// == Resource Listing ==

#[tokio::test]
async fn test_list_resources() {
    let server = MockServer::start().await;
    let app = create_test_app(&server, None);

    let (status, json) = get(&app, "/resources").await;

    assert_eq!(status, StatusCode::OK);
    let uris: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["uri"].as_str().unwrap())
        .collect();
    assert_eq!(
        uris,
        vec![
            "logseq://graph/info",
            "logseq://pages/recent",
            "logseq://journal/recent",
            "logseq://templates/list",
            "logseq://graph/structure",
        ]
    );
}

// == Graph Info ==

#[tokio::test]
async fn test_graph_info_with_file_stats() {
    let server = MockServer::start().await;
    mock_any(&server, "logseq.App.getCurrentGraph", json!({ "name": "notes" })).await;

    let graph = TempDir::new().unwrap();
    fs::create_dir(graph.path().join("pages")).unwrap();
    fs::create_dir(graph.path().join("journals")).unwrap();
    fs::write(graph.path().join("pages/a.md"), "- a").unwrap();
    fs::write(graph.path().join("pages/b.md"), "- b").unwrap();
    fs::write(graph.path().join("journals/2024_12_01.md"), "- j").unwrap();

    let app = create_test_app(&server, Some(graph.path().to_path_buf()));
    let (status, json) = get(&app, "/resources/graph/info").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "notes");
    assert_eq!(json["file_stats"]["page_count"], 2);
    assert_eq!(json["file_stats"]["journal_count"], 1);
    assert_eq!(json["cache_ttl"], 300);
    assert_eq!(json["api_url"], server.uri());
}

// == Caching ==

#[tokio::test]
async fn test_resource_fetched_once_until_write() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_partial_json(json!({ "method": "logseq.App.getCurrentGraph" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "notes" })))
        .expect(2)
        .mount(&server)
        .await;
    mock_any(&server, "logseq.Editor.appendBlockInPage", json!({ "uuid": "b-1" })).await;
    let app = create_test_app(&server, None);

    get(&app, "/resources/graph/info").await;
    get(&app, "/resources/graph/info").await;

    let (_, stats) = get(&app, "/cache/stats").await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["total_entries"], 1);

    let (status, _) = send(
        &app,
        "POST",
        "/tools/blocks",
        Body::from(r#"{"page":"inbox","content":"new [[idea]]"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = get(&app, "/cache/stats").await;
    assert_eq!(stats["total_entries"], 0);

    // refetched after the write cleared the cache
    get(&app, "/resources/graph/info").await;
}

#[tokio::test]
async fn test_cache_invalidation_endpoints() {
    let server = MockServer::start().await;
    mock_any(&server, "logseq.App.getCurrentGraph", json!({})).await;
    mock_any(&server, "logseq.Editor.getPage", Value::Null).await;
    mock_any(&server, "logseq.DB.q", json!([])).await;
    let app = create_test_app(&server, None);

    get(&app, "/resources/graph/info").await;
    get(&app, "/resources/templates/list").await;

    let (status, json) = send(&app, "DELETE", "/cache/graph_info", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 1);
    assert_eq!(json["message"], "Key 'graph_info' invalidated");

    let (_, json) = send(&app, "DELETE", "/cache", Body::empty()).await;
    assert_eq!(json["removed"], 1);
    assert_eq!(json["message"], "Cache cleared");
}

// == Recent Pages and Journals ==

#[tokio::test]
async fn test_recent_pages_with_graph_files() {
    let server = MockServer::start().await;
    mock_any(
        &server,
        "logseq.Editor.getAllPages",
        pages(&["rust", "Projects/Web", "no file"]),
    )
    .await;

    let graph = TempDir::new().unwrap();
    fs::create_dir(graph.path().join("pages")).unwrap();
    fs::write(graph.path().join("pages/rust.md"), "- ownership").unwrap();
    fs::write(graph.path().join("pages/Projects___Web.md"), "- axum").unwrap();

    let app = create_test_app(&server, Some(graph.path().to_path_buf()));
    let (status, json) = get(&app, "/resources/pages/recent").await;

    assert_eq!(status, StatusCode::OK);
    let recent = json.as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|page| page["file_path"].is_string()));
    assert!(recent.iter().all(|page| page["modified_time"].as_f64().unwrap() > 0.0));
    assert!(recent.iter().any(|page| page["name"] == "Projects/Web"));
}

#[tokio::test]
async fn test_recent_journals_from_journal_files() {
    let server = MockServer::start().await;
    mock_any(
        &server,
        "logseq.Editor.getAllPages",
        json!([
            { "name": "Dec 1st, 2024", "journal?": true, "journalDay": 20241201 },
            { "name": "Dec 1st, 2024 notes", "journal?": false },
            { "name": "Nov 3rd, 2024", "journal?": true, "journalDay": 20241103 }
        ]),
    )
    .await;

    let graph = TempDir::new().unwrap();
    fs::create_dir(graph.path().join("journals")).unwrap();
    fs::write(graph.path().join("journals/2024_12_01.md"), "- today").unwrap();

    let app = create_test_app(&server, Some(graph.path().to_path_buf()));
    let (status, json) = get(&app, "/resources/journal/recent").await;

    assert_eq!(status, StatusCode::OK);
    let recent = json.as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["name"], "Dec 1st, 2024");
    assert!(recent[0]["file_path"]
        .as_str()
        .unwrap()
        .ends_with("2024_12_01.md"));
}

// == Templates ==

#[tokio::test]
async fn test_templates_from_templates_page() {
    let server = MockServer::start().await;
    mock_call(
        &server,
        "logseq.Editor.getPage",
        json!(["Templates"]),
        json!({ "name": "templates" }),
    )
    .await;
    mock_any(&server, "logseq.Editor.getPage", Value::Null).await;
    mock_call(
        &server,
        "logseq.Editor.getPageBlocksTree",
        json!(["Templates"]),
        json!([
            { "id": 1, "content": "Meeting\n- agenda", "level": 1,
              "children": [{ "id": 2, "content": "- agenda", "level": 2 }] },
            { "id": 3, "content": "Weekly review", "level": 1 }
        ]),
    )
    .await;
    mock_any(&server, "logseq.DB.q", json!([])).await;
    let app = create_test_app(&server, None);

    let (status, json) = get(&app, "/resources/templates/list").await;

    assert_eq!(status, StatusCode::OK);
    let templates = json.as_array().unwrap();
    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0]["name"], "Meeting");
    assert_eq!(templates[0]["source_page"], "Templates");
    assert_eq!(templates[1]["name"], "Weekly review");
}

// == Graph Structure ==

#[tokio::test]
async fn test_graph_structure_namespaces() {
    let server = MockServer::start().await;
    mock_any(
        &server,
        "logseq.Editor.getAllPages",
        pages(&["A/2", "B/1", "A/1", "C"]),
    )
    .await;
    mock_any(&server, "logseq.Editor.getPageLinkedReferences", json!([])).await;
    mock_any(&server, "logseq.Editor.getPageBlocksTree", json!([])).await;
    let app = create_test_app(&server, None);

    let (status, json) = get(&app, "/resources/graph/structure").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_pages"], 4);
    assert_eq!(json["root_pages"], 1);
    assert_eq!(
        json["namespaces"],
        json!({
            "A": { "page_count": 2, "pages": ["A/1", "A/2"] },
            "B": { "page_count": 1, "pages": ["B/1"] }
        })
    );
}

#[tokio::test]
async fn test_graph_structure_orphans_and_links() {
    let server = MockServer::start().await;
    mock_any(
        &server,
        "logseq.Editor.getAllPages",
        pages(&["hub", "linker", "island"]),
    )
    .await;
    mock_call(
        &server,
        "logseq.Editor.getPageLinkedReferences",
        json!(["hub"]),
        json!([[{ "name": "linker" }, []], [{ "name": "other" }, []]]),
    )
    .await;
    mock_any(&server, "logseq.Editor.getPageLinkedReferences", json!([])).await;
    mock_call(
        &server,
        "logseq.Editor.getPageBlocksTree",
        json!(["linker"]),
        json!([{ "content": "parent", "children": [{ "content": "see [[hub]]" }] }]),
    )
    .await;
    mock_any(
        &server,
        "logseq.Editor.getPageBlocksTree",
        json!([{ "content": "no links here" }]),
    )
    .await;
    let app = create_test_app(&server, None);

    let (status, json) = get(&app, "/resources/graph/structure").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["orphaned_pages"], json!({ "count": 1, "pages": ["island"] }));
    assert_eq!(json["most_linked_pages"][0], json!({ "page": "hub", "link_count": 2 }));
    assert_eq!(json["skipped_pages"], json!([]));
}

#[tokio::test]
async fn test_graph_structure_skips_failing_page() {
    let server = MockServer::start().await;
    mock_any(&server, "logseq.Editor.getAllPages", pages(&["ok", "broken"])).await;
    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_json(json!({
            "method": "logseq.Editor.getPageLinkedReferences",
            "args": ["broken"]
        })))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .with_priority(1)
        .mount(&server)
        .await;
    mock_any(&server, "logseq.Editor.getPageLinkedReferences", json!([{}])).await;
    let app = create_test_app(&server, None);

    let (status, json) = get(&app, "/resources/graph/structure").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_pages"], 2);
    assert_eq!(json["skipped_pages"][0]["page"], "broken");
    assert_eq!(json["most_linked_pages"], json!([{ "page": "ok", "link_count": 1 }]));
}

// == Tools ==

#[tokio::test]
async fn test_get_page_not_found() {
    let server = MockServer::start().await;
    mock_any(&server, "logseq.Editor.getPage", Value::Null).await;
    let app = create_test_app(&server, None);

    let (status, json) = get(&app, "/tools/pages/ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn test_search_passes_query() {
    let server = MockServer::start().await;
    mock_call(
        &server,
        "logseq.DB.q",
        json!(["rust"]),
        json!([{ "uuid": "b-1", "content": "learning rust" }]),
    )
    .await;
    let app = create_test_app(&server, None);

    let (status, json) = get(&app, "/tools/search?query=rust").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["content"], "learning rust");
}

#[tokio::test]
async fn test_create_page_sends_properties() {
    let server = MockServer::start().await;
    mock_call(
        &server,
        "logseq.Editor.createPage",
        json!(["Projects/Rust", { "status": "active" }, { "redirect": false }]),
        json!({ "name": "projects/rust" }),
    )
    .await;
    let app = create_test_app(&server, None);

    let (status, json) = send(
        &app,
        "POST",
        "/tools/pages",
        Body::from(r#"{"name":"Projects/Rust","properties":{"status":"active"}}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "projects/rust");
}

#[tokio::test]
async fn test_get_block_by_uuid() {
    let server = MockServer::start().await;
    mock_call(
        &server,
        "logseq.Editor.getBlock",
        json!(["b-1"]),
        json!({ "uuid": "b-1", "content": "see [[Rust]]", "children": [] }),
    )
    .await;
    mock_any(&server, "logseq.Editor.getBlock", Value::Null).await;
    let app = create_test_app(&server, None);

    let (status, json) = get(&app, "/tools/blocks/b-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["content"], "see [[Rust]]");

    let (status, json) = get(&app, "/tools/blocks/b-9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("b-9"));
}

/// Caches graph info so a later write can be seen clearing it.
async fn prime_graph_info(server: &MockServer, app: &Router) {
    mock_any(server, "logseq.App.getCurrentGraph", json!({ "name": "notes" })).await;
    let (status, _) = get(app, "/resources/graph/info").await;
    assert_eq!(status, StatusCode::OK);
    let (_, stats) = get(app, "/cache/stats").await;
    assert_eq!(stats["total_entries"], 1);
}

async fn cached_entries(app: &Router) -> Value {
    let (_, stats) = get(app, "/cache/stats").await;
    stats["total_entries"].clone()
}

#[tokio::test]
async fn test_insert_child_block() {
    let server = MockServer::start().await;
    mock_call(
        &server,
        "logseq.Editor.insertBlock",
        json!([
            "parent-1",
            "first step",
            { "before": true, "sibling": false, "properties": { "status": "todo" } }
        ]),
        json!({ "uuid": "child-1", "content": "first step" }),
    )
    .await;
    let app = create_test_app(&server, None);
    prime_graph_info(&server, &app).await;

    let (status, json) = send(
        &app,
        "POST",
        "/tools/blocks/parent-1/children",
        Body::from(r#"{"content":"first step","properties":{"status":"todo"},"before":true}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["uuid"], "child-1");
    assert_eq!(cached_entries(&app).await, 0);
}

#[tokio::test]
async fn test_move_block_under_target() {
    let server = MockServer::start().await;
    mock_call(
        &server,
        "logseq.Editor.moveBlock",
        json!(["b-1", "b-2", { "before": false, "children": true }]),
        Value::Null,
    )
    .await;
    let app = create_test_app(&server, None);
    prime_graph_info(&server, &app).await;

    let (status, json) = send(
        &app,
        "POST",
        "/tools/blocks/b-1/move",
        Body::from(r#"{"target":"b-2","as_child":true}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json.is_null());
    assert_eq!(cached_entries(&app).await, 0);
}

#[tokio::test]
async fn test_remove_block() {
    let server = MockServer::start().await;
    mock_call(&server, "logseq.Editor.removeBlock", json!(["b-1"]), Value::Null).await;
    let app = create_test_app(&server, None);
    prime_graph_info(&server, &app).await;

    let (status, _) = send(&app, "DELETE", "/tools/blocks/b-1", Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cached_entries(&app).await, 0);
}

#[tokio::test]
async fn test_delete_page() {
    let server = MockServer::start().await;
    mock_call(&server, "logseq.Editor.deletePage", json!(["Scratch"]), Value::Null).await;
    let app = create_test_app(&server, None);
    prime_graph_info(&server, &app).await;

    let (status, _) = send(&app, "DELETE", "/tools/pages/Scratch", Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cached_entries(&app).await, 0);
}

#[tokio::test]
async fn test_failed_delete_keeps_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_partial_json(json!({ "method": "logseq.Editor.deletePage" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("no such page"))
        .mount(&server)
        .await;
    let app = create_test_app(&server, None);
    prime_graph_info(&server, &app).await;

    let (status, _) = send(&app, "DELETE", "/tools/pages/Ghost", Body::empty()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(cached_entries(&app).await, 1);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;
    let app = create_test_app(&server, None);

    let (status, json) = get(&app, "/tools/pages").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("401"));
}

// == Health ==

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    let app = create_test_app(&server, None);

    let (status, json) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}
