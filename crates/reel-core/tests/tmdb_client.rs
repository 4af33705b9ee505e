use std::sync::{Arc, Mutex};

use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use reel_core::config::{ApiCredentials, TmdbConfig};
use reel_core::error::FetchError;
use reel_core::search::{self, SearchOutcome};
use reel_core::tmdb::{Endpoint, MovieApi, TmdbClient};
use serde_json::json;

#[derive(Clone, Default)]
struct Seen {
    requests: Arc<Mutex<Vec<(String, Option<String>, Option<String>)>>>,
}

async fn catalog(
    State(seen): State<Seen>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    seen.requests.lock().unwrap().push((
        uri.to_string(),
        header("authorization"),
        header("accept"),
    ));

    if header("authorization").as_deref() != Some("Bearer good-token") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"status_message": "Invalid API key"})))
            .into_response();
    }
    let query = uri.query().unwrap_or_default();
    if query.contains("query=nothing") {
        return (StatusCode::OK, Json(json!({"Response": "False", "Error": "Movie not found!"})))
            .into_response();
    }
    if query.contains("query=maintenance") {
        return (StatusCode::OK, "<html>down for maintenance</html>").into_response();
    }
    (
        StatusCode::OK,
        Json(json!({
            "page": 1,
            "results": [{"id": 27205, "title": "Inception", "vote_average": 8.4}],
            "total_results": 1
        })),
    )
        .into_response()
}

async fn mock_server() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/3/discover/movie", get(catalog))
        .route("/3/search/movie", get(catalog))
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/3", addr), seen)
}

fn client(base_url: &str, token: &str) -> TmdbClient {
    let config = TmdbConfig {
        base_url: base_url.to_string(),
        ..TmdbConfig::default()
    };
    let creds = ApiCredentials {
        tmdb_token: token.to_string(),
        appwrite_key: None,
    };
    TmdbClient::new(&config, &creds)
}

#[tokio::test]
async fn discover_sends_bearer_and_accept_headers() {
    let (base, seen) = mock_server().await;
    let resp = client(&base, "good-token")
        .fetch(Endpoint::Discover)
        .await
        .unwrap();
    assert_eq!(resp.results[0].title, "Inception");

    let requests = seen.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let (uri, auth, accept) = &requests[0];
    assert_eq!(uri, "/3/discover/movie?sort_by=popularity.desc");
    assert_eq!(auth.as_deref(), Some("Bearer good-token"));
    assert_eq!(accept.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn search_query_is_percent_encoded_on_the_wire() {
    let (base, seen) = mock_server().await;
    client(&base, "good-token")
        .fetch(Endpoint::Search("fast & furious 7".into()))
        .await
        .unwrap();
    let requests = seen.requests.lock().unwrap().clone();
    assert_eq!(requests[0].0, "/3/search/movie?query=fast%20%26%20furious%207");
}

#[tokio::test]
async fn unauthorized_is_a_status_error() {
    let (base, _seen) = mock_server().await;
    let err = client(&base, "").fetch(Endpoint::Discover).await.unwrap_err();
    assert!(matches!(err, FetchError::Status(s) if s == reqwest::StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = client(&format!("http://{}/3", addr), "good-token")
        .fetch(Endpoint::Discover)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn logical_failure_over_http_is_rejected() {
    let (base, _seen) = mock_server().await;
    let api = client(&base, "good-token");
    match search::resolve(&api, "nothing").await {
        SearchOutcome::Rejected(msg) => assert_eq!(msg, "Movie not found!"),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn undecodable_body_is_a_transport_error() {
    let (base, _seen) = mock_server().await;
    let api = client(&base, "good-token");
    let err = api
        .fetch(Endpoint::Search("maintenance".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));

    // A failure, not a rejection with a message for the user.
    assert!(matches!(
        search::resolve(&api, "maintenance").await,
        SearchOutcome::Failed(FetchError::Transport(_))
    ));
}
