use serde_json::{json, Map, Value};
use solr_engine::{
    DynamicRecord, InMemoryModelRepository, ModelClass, SearchBuilder, SearchEngine, SolrConfig,
    SolrEngine,
};
use wiremock::matchers::{body_string, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer) -> SolrEngine {
    SolrEngine::from_config(&SolrConfig::with_base_url(format!("{}/solr", server.uri()))).unwrap()
}

fn post(fields: Value) -> DynamicRecord {
    let fields: Map<String, Value> = match fields {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    DynamicRecord::new("Post", "posts", fields).unwrap()
}

fn update_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"responseHeader": {"status": 0, "QTime": 1}}))
}

#[tokio::test]
async fn test_empty_batches_never_reach_solr() {
    let mock_server = MockServer::start().await;
    let engine = engine_for(&mock_server);
    let none: Vec<DynamicRecord> = Vec::new();

    engine.update(&none).await.unwrap();
    engine.delete(&none).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_update_sends_one_committed_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/solr/posts/update"))
        .and(body_string_contains(r#""_class":"Post""#))
        .and(body_string_contains(r#""commit":{}"#))
        .respond_with(update_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = engine_for(&mock_server);
    engine
        .update(&[
            post(json!({"id": 1, "title": "First", "draft": null})),
            post(json!({"id": 2, "title": "Second"})),
        ])
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert_eq!(body.matches(r#""add":"#).count(), 2);
    assert!(!body.contains("draft"));
}

#[tokio::test]
async fn test_delete_sends_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/solr/posts/update"))
        .and(body_string(r#"{"delete":["5","7"],"commit":{}}"#))
        .respond_with(update_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = engine_for(&mock_server);
    engine
        .delete(&[post(json!({"id": 5})), post(json!({"id": 7}))])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_flush_deletes_by_class_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/solr/posts/update"))
        .and(body_string(
            r#"{"delete":{"query":"_class:\"Post\""},"commit":{}}"#,
        ))
        .respond_with(update_ok())
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = engine_for(&mock_server);
    engine.flush(&ModelClass::new("Post", "posts")).await.unwrap();
}

#[tokio::test]
async fn test_paginate_and_map_in_relevance_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/solr/posts/select"))
        .and(query_param("q", "rust"))
        .and(query_param("fq", "status:\"active\""))
        .and(query_param("start", "20"))
        .and(query_param("rows", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseHeader": {"status": 0, "QTime": 1},
            "response": {"numFound": 23, "start": 20, "docs": [
                {"id": "3"}, {"id": "2"}, {"id": "1"}
            ]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = engine_for(&mock_server);
    let builder = SearchBuilder::new("posts", "rust").with_where("status", "active");
    let results = engine.paginate(&builder, 10, 3).await.unwrap();

    assert_eq!(engine.get_total_count(&results), 23);

    let repository = InMemoryModelRepository::from_records(vec![
        post(json!({"id": 1, "title": "one"})),
        post(json!({"id": 3, "title": "three"})),
    ]);
    let mapped: Vec<DynamicRecord> = engine.map(&builder, &results, &repository).await.unwrap();
    let titles: Vec<&Value> = mapped.iter().map(|record| &record.fields()["title"]).collect();
    assert_eq!(titles, vec![&json!("three"), &json!("one")]);
}

#[tokio::test]
async fn test_search_without_query_uses_match_all() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/solr/posts/select"))
        .and(query_param("q", "*:*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseHeader": {"status": 0, "QTime": 0},
            "response": {"numFound": 0, "start": 0, "docs": []}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = engine_for(&mock_server);
    let builder = SearchBuilder::new("posts", "");
    let results = engine.search(&builder).await.unwrap();

    assert!(engine.map_ids(&results).is_empty());
    let repository: InMemoryModelRepository<DynamicRecord> = InMemoryModelRepository::new();
    let mapped = engine.map(&builder, &results, &repository).await.unwrap();
    assert!(mapped.is_empty());
}
