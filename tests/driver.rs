//! End-to-end driver tests against an in-memory store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use surreal_sql::entity;
use surreal_sql::error::BoxError;
use surreal_sql::prelude::*;

/// Answers `query` calls from a fixed table keyed by normalized text.
struct MemoryStore {
    answers: BTreeMap<String, serde_json::Value>,
    seen: Vec<Vec<Value>>,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            answers: BTreeMap::new(),
            seen: Vec::new(),
        }
    }

    fn answer(mut self, query: &str, response: serde_json::Value) -> Self {
        self.answers.insert(query.to_string(), response);
        self
    }
}

#[async_trait]
impl Transport for MemoryStore {
    async fn send(&mut self, command: &str, args: Vec<Value>) -> Result<Value, BoxError> {
        if command != "query" {
            return Ok(Value::from(json!([])));
        }
        self.seen.push(args.clone());
        let text = args
            .first()
            .and_then(Value::as_str)
            .ok_or("missing query text")?;
        match self.answers.get(text) {
            Some(response) => Ok(Value::from(response.clone())),
            None => Ok(Value::from(json!([{
                "status": "ERR",
                "detail": format!("parse error near {text}")
            }]))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct Post {
    #[serde(flatten)]
    entity: BaseEntity,
    title: String,
    slug: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct Posted {
    #[serde(flatten)]
    edge: BaseRelationship,
    when: String,
}

#[derive(Debug, Clone)]
struct User {
    id: String,
    name: String,
    age: i64,
}

entity!(User {
    #[json = "id"] id,
    #[json = "name,omitempty"] name,
    #[json = "age"] age,
});

const USER_WITH_POSTS: &str = "SELECT id, name, ->posted as posted, ->posted->post AS posts FROM user:mark fetch posts, posted";

fn user_with_posts() -> serde_json::Value {
    json!([{
        "status": "OK",
        "time": "1.5ms",
        "result": [{
            "id": "user:mark",
            "name": "mark",
            "posted": [
                {"id": "posted:a", "in": "user:mark", "out": "post:0", "when": "2024-05-01T10:00:00Z"},
                {"id": "posted:b", "in": "user:mark", "out": "post:1", "when": "2024-05-01T10:00:01Z"}
            ],
            "posts": [
                {"id": "post:0", "title": "0", "slug": "0"},
                {"id": "post:1", "title": "1", "slug": "1"}
            ]
        }]
    }])
}

#[tokio::test]
async fn test_fetch_graph_rows_in_canonical_order() {
    let store = MemoryStore::new().answer(USER_WITH_POSTS, user_with_posts());
    let mut conn = Conn::new(store);

    let mut rows = conn
        .query(
            "SELECT id, name, ->posted as posted, ->posted->post AS posts\n    FROM user:mark fetch posts, posted",
            (),
        )
        .await
        .unwrap();
    assert_eq!(rows.columns(), vec!["id", "name", "posted", "posts"]);

    let mut scanned = 0;
    while rows.next() {
        let mut id = RecordId::default();
        let mut name = String::new();
        let mut posted: Many<Posted> = Many::default();
        let mut posts: Many<Post> = Many::default();
        rows.scan(&mut [&mut id, &mut name, &mut posted, &mut posts])
            .unwrap();

        assert_eq!(id.as_str(), "user:mark");
        assert_eq!(name, "mark");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].entity.id, "post:1");
        assert_eq!(posted[0].edge.outbound, "post:0");
        let when = StoreTime::parse(&posted[1].when).unwrap();
        assert_eq!(when.to_string(), "2024-05-01T10:00:01+00:00");
        scanned += 1;
    }
    assert_eq!(scanned, 1);
}

#[tokio::test]
async fn test_named_arguments_from_entity() {
    let query = "UPDATE $id SET name = $name, age = $age";
    let store = MemoryStore::new().answer(
        query,
        json!([{"status": "OK", "result": [{"id": "user:mark", "name": "mark", "age": 10000}]}]),
    );
    let mut conn = Conn::new(store);

    let user = User {
        id: "user:mark".into(),
        name: "mark".into(),
        age: 10000,
    };
    let args = conn.binder().named_args(&user, &[]);

    let mut stmt = conn.prepare(query);
    assert_eq!(stmt.num_input(), 3);
    let result = stmt.exec(args).await.unwrap();
    assert_eq!(result.rows_affected(), 1);
    stmt.close().unwrap();

    let sent = &conn.transport().seen[0];
    assert_eq!(
        sent[1],
        Value::from(json!({"id": "user:mark", "name": "mark", "age": 10000}))
    );
}

#[tokio::test]
async fn test_store_errors_surface_as_query_errors() {
    let mut conn = Conn::new(MemoryStore::new());
    let err = conn.query("SELEC X", ()).await.unwrap_err();
    match err {
        SurrealError::Query { detail } => assert_eq!(detail, "parse error near SELEC X"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_result_yields_no_rows() {
    let store = MemoryStore::new().answer(
        "SELECT * FROM post WHERE title = $title",
        json!([{"status": "OK", "result": []}]),
    );
    let mut conn = Conn::new(store);

    let mut rows = conn
        .query(
            "SELECT * FROM post WHERE title = $title",
            named("title", "missing"),
        )
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert!(!rows.next());
}

#[tokio::test]
async fn test_ids_and_arrays_decode_from_rows() {
    let query = "SELECT * FROM user";
    let store = MemoryStore::new().answer(
        query,
        json!([{"status": "OK", "result": [{
            "id": "user:`3f2504e0-4f89-11d3-9a0c-0305e82c3301`",
            "post": "post:42",
            "scores": [1, 2.5],
            "tags": ["a", "b"],
            "visits": [3, 1, 2]
        }]}]),
    );
    let mut conn = Conn::new(store);

    let mut rows = conn.query(query, ()).await.unwrap();
    assert!(rows.next());

    let mut id = RecordUuid::default();
    let mut post = AutoId::default();
    let mut scores = FloatArray::default();
    let mut tags = StringArray::default();
    let mut visits = IntArray::default();
    rows.scan(&mut [&mut id, &mut post, &mut scores, &mut tags, &mut visits])
        .unwrap();

    assert_eq!(id.uuid().to_string(), "3f2504e0-4f89-11d3-9a0c-0305e82c3301");
    assert_eq!(post.as_str(), "42");
    assert_eq!(scores.0, vec![1.0, 2.5]);
    assert_eq!(tags.0, vec!["a", "b"]);
    assert_eq!(visits.0, vec![3, 1, 2]);
}
