use std::sync::{Arc, Mutex};

use axum::extract::{OriginalUri, Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use reel_core::config::{ApiCredentials, AppwriteConfig, TmdbConfig};
use reel_core::error::TrendingStoreError;
use reel_core::movie::Movie;
use reel_core::trending::{AppwriteTrendingStore, TrendingStore};
use serde_json::{json, Value};

#[derive(Clone, Debug)]
struct Seen {
    method: Method,
    path: String,
    queries: Vec<Value>,
    body: Option<Value>,
    project: Option<String>,
    key: Option<String>,
}

/// In-memory document collection answering the handful of REST calls the
/// store makes.
#[derive(Clone, Default)]
struct Collection {
    docs: Arc<Mutex<Vec<Value>>>,
    requests: Arc<Mutex<Vec<Seen>>>,
    fail_with: Arc<Mutex<Option<StatusCode>>>,
}

impl Collection {
    fn seen(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: Option<Value>) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(Seen {
            method,
            path: uri.path().to_string(),
            queries: parse_queries(uri.query().unwrap_or_default()),
            body,
            project: header("x-appwrite-project"),
            key: header("x-appwrite-key"),
        });
    }

    fn failure(&self) -> Option<Response> {
        let status = (*self.fail_with.lock().unwrap())?;
        Some(
            (
                status,
                Json(json!({
                    "message": "Collection with the requested ID could not be found.",
                    "code": status.as_u16()
                })),
            )
                .into_response(),
        )
    }

    fn requests(&self) -> Vec<Seen> {
        self.requests.lock().unwrap().clone()
    }

    fn docs(&self) -> Vec<Value> {
        self.docs.lock().unwrap().clone()
    }
}

/// `queries[]=<json>` pairs, decoded.
fn parse_queries(raw: &str) -> Vec<Value> {
    raw.split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(k, _)| urlencoding::decode(k).is_ok_and(|k| k == "queries[]"))
        .filter_map(|(_, v)| {
            let plus_decoded = v.replace('+', " ");
            let v = urlencoding::decode(&plus_decoded).ok()?;
            serde_json::from_str(&v).ok()
        })
        .collect()
}

async fn list_documents(
    State(col): State<Collection>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    col.seen(Method::GET, &uri, &headers, None);
    if let Some(resp) = col.failure() {
        return resp;
    }
    let mut docs = col.docs();
    for q in parse_queries(uri.query().unwrap_or_default()) {
        let attr = q["attribute"].as_str().unwrap_or_default();
        match q["method"].as_str() {
            Some("equal") => docs.retain(|d| d[attr] == q["values"][0]),
            Some("orderDesc") => {
                docs.sort_by_key(|d| std::cmp::Reverse(d[attr].as_u64().unwrap_or(0)))
            }
            // `limit` is ignored so the caller's own cap is what gets tested.
            _ => {}
        }
    }
    Json(json!({"total": docs.len(), "documents": docs})).into_response()
}

async fn create_document(
    State(col): State<Collection>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    col.seen(Method::POST, &uri, &headers, Some(body.clone()));
    if let Some(resp) = col.failure() {
        return resp;
    }
    let mut docs = col.docs.lock().unwrap();
    let mut doc = body["data"].clone();
    doc["$id"] = json!(format!("doc-{}", docs.len() + 1));
    docs.push(doc.clone());
    (StatusCode::CREATED, Json(doc)).into_response()
}

async fn update_document(
    State(col): State<Collection>,
    Path((_db, _col, id)): Path<(String, String, String)>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    col.seen(Method::PATCH, &uri, &headers, Some(body.clone()));
    if let Some(resp) = col.failure() {
        return resp;
    }
    let mut docs = col.docs.lock().unwrap();
    let Some(doc) = docs.iter_mut().find(|d| d["$id"] == id.as_str()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(fields) = body["data"].as_object() {
        for (k, v) in fields {
            doc[k.as_str()] = v.clone();
        }
    }
    Json(doc.clone()).into_response()
}

async fn mock_appwrite(col: Collection) -> String {
    let app = Router::new()
        .route(
            "/v1/databases/:db/collections/:col/documents",
            get(list_documents).post(create_document),
        )
        .route(
            "/v1/databases/:db/collections/:col/documents/:id",
            patch(update_document),
        )
        .with_state(col);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

fn store(endpoint: &str) -> AppwriteTrendingStore {
    let config = AppwriteConfig {
        endpoint: endpoint.to_string(),
        project_id: "reel".into(),
        database_id: "db1".into(),
        collection_id: "metrics".into(),
        ..AppwriteConfig::default()
    };
    let creds = ApiCredentials {
        tmdb_token: String::new(),
        appwrite_key: Some("secret-key".into()),
    };
    AppwriteTrendingStore::new(&config, &creds, TmdbConfig::default()).unwrap()
}

fn movie(id: u64, title: &str) -> Movie {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "poster_path": format!("/{}.jpg", id)
    }))
    .unwrap()
}

fn doc(id: &str, term: &str, count: u64, movie_id: u64) -> Value {
    json!({
        "$id": id,
        "searchTerm": term,
        "count": count,
        "movie_id": movie_id,
        "title": term,
        "poster_url": ""
    })
}

const DOCUMENTS: &str = "/v1/databases/db1/collections/metrics/documents";

#[tokio::test]
async fn new_term_is_created_with_count_one() {
    let col = Collection::default();
    let base = mock_appwrite(col.clone()).await;
    store(&base)
        .record_search("batman", &movie(268, "Batman"))
        .await
        .unwrap();

    let requests = col.requests();
    assert_eq!(requests.len(), 2);

    let lookup = &requests[0];
    assert_eq!(lookup.method, Method::GET);
    assert_eq!(lookup.path, DOCUMENTS);
    assert_eq!(
        lookup.queries,
        vec![json!({"method": "equal", "attribute": "searchTerm", "values": ["batman"]})]
    );
    assert_eq!(lookup.project.as_deref(), Some("reel"));
    assert_eq!(lookup.key.as_deref(), Some("secret-key"));

    let create = &requests[1];
    assert_eq!(create.method, Method::POST);
    assert_eq!(create.path, DOCUMENTS);
    let body = create.body.clone().unwrap();
    assert_eq!(body["documentId"], "unique()");
    assert_eq!(body["data"]["searchTerm"], "batman");
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["movie_id"], 268);
    assert_eq!(body["data"]["title"], "Batman");
    assert_eq!(
        body["data"]["poster_url"],
        "https://image.tmdb.org/t/p/w500/268.jpg"
    );
    assert_eq!(col.docs().len(), 1);
}

#[tokio::test]
async fn existing_term_is_incremented_in_place() {
    let col = Collection::default();
    *col.docs.lock().unwrap() = vec![doc("abc", "batman", 4, 268), doc("def", "dune", 9, 438631)];
    let base = mock_appwrite(col.clone()).await;

    store(&base)
        .record_search("batman", &movie(999, "Not Batman"))
        .await
        .unwrap();

    let requests = col.requests();
    assert_eq!(requests.len(), 2);
    let update = &requests[1];
    assert_eq!(update.method, Method::PATCH);
    assert_eq!(update.path, format!("{}/abc", DOCUMENTS));
    assert_eq!(update.body, Some(json!({"data": {"count": 5}})));

    let docs = col.docs();
    assert_eq!(docs[0]["count"], 5);
    // The first credited movie is kept.
    assert_eq!(docs[0]["movie_id"], 268);
    assert_eq!(docs[1]["count"], 9);
}

#[tokio::test]
async fn list_top_orders_by_count_and_caps() {
    let col = Collection::default();
    *col.docs.lock().unwrap() = (1..=7)
        .map(|n| doc(&format!("id{}", n), &format!("term{}", n), n, n))
        .collect();
    let base = mock_appwrite(col.clone()).await;

    let top = store(&base).list_top(5).await.unwrap();
    assert_eq!(top.len(), 5);
    assert_eq!(top[0].search_term, "term7");
    assert_eq!(top[0].id, "id7");
    assert!(top.windows(2).all(|w| w[0].count >= w[1].count));

    let requests = col.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].queries,
        vec![
            json!({"method": "orderDesc", "attribute": "count"}),
            json!({"method": "limit", "values": [5]}),
        ]
    );
}

#[tokio::test]
async fn error_status_is_reported_with_body() {
    let col = Collection::default();
    *col.fail_with.lock().unwrap() = Some(StatusCode::NOT_FOUND);
    let base = mock_appwrite(col.clone()).await;
    let s = store(&base);

    match s.list_top(5).await {
        Err(TrendingStoreError::Status { status, body }) => {
            assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
            assert!(body.contains("could not be found"));
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let err = s
        .record_search("batman", &movie(268, "Batman"))
        .await
        .unwrap_err();
    assert!(matches!(err, TrendingStoreError::Status { .. }));
    // A failed lookup never falls through to creating a document.
    assert!(col.requests().iter().all(|r| r.method == Method::GET));
}
