use std::sync::Arc;

use super::*;
use axum::{
    extract::State,
    http::StatusCode as HttpStatus,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::UserId;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// A base url nothing is listening on.
async fn closed_server_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

fn client_for(base_url: &str) -> HttpResourceClient {
    HttpResourceClient::new(&ClientSettings::with_base_url(base_url)).expect("client")
}

#[derive(Clone)]
struct CaptureState {
    status: HttpStatus,
    tx: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
}

async fn capture_acronym(State(state): State<CaptureState>, Json(body): Json<Value>) -> HttpStatus {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(body);
    }
    state.status
}

async fn spawn_acronym_server(status: HttpStatus) -> (String, oneshot::Receiver<Value>) {
    let (tx, rx) = oneshot::channel();
    let state = CaptureState {
        status,
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route(ACRONYMS_PATH, post(capture_acronym))
        .with_state(state);
    (spawn_server(app).await, rx)
}

#[tokio::test]
async fn fetch_users_preserves_server_order() {
    let app = Router::new().route(
        USERS_PATH,
        get(|| async {
            Json(json!([
                {"id": 3, "name": "Tim"},
                {"id": 1, "name": "Ray"},
                {"id": 2, "name": "Vicki"}
            ]))
        }),
    );
    let base_url = spawn_server(app).await;

    let users = client_for(&base_url).fetch_users().await.expect("users");
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Tim", "Ray", "Vicki"]);
    assert_eq!(users[1].id, UserId::Numeric(1));
}

#[tokio::test]
async fn fetch_users_accepts_any_success_status() {
    let app = Router::new().route(
        USERS_PATH,
        get(|| async { (HttpStatus::NON_AUTHORITATIVE_INFORMATION, Json(json!([]))) }),
    );
    let base_url = spawn_server(app).await;

    let users = client_for(&base_url).fetch_users().await.expect("users");
    assert!(users.is_empty());
}

#[tokio::test]
async fn fetch_users_classifies_rejected_status_as_server_error() {
    let app = Router::new().route(
        USERS_PATH,
        get(|| async {
            (
                HttpStatus::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("database offline")),
            )
        }),
    );
    let base_url = spawn_server(app).await;

    let err = client_for(&base_url)
        .fetch_users()
        .await
        .expect_err("500 must fail");
    assert_eq!(err.kind(), FailureKind::Server);
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.reason(), Some("database offline"));
}

#[tokio::test]
async fn fetch_users_classifies_schema_mismatch_as_decode_error() {
    let app = Router::new().route(
        USERS_PATH,
        get(|| async { Json(json!({"users": [{"id": 1, "name": "Ray"}]})) }),
    );
    let base_url = spawn_server(app).await;

    let err = client_for(&base_url)
        .fetch_users()
        .await
        .expect_err("object body must fail");
    assert_eq!(err.kind(), FailureKind::Decode);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn fetch_users_rejects_blank_user_name_as_decode_error() {
    let app = Router::new().route(
        USERS_PATH,
        get(|| async { Json(json!([{"id": 1, "name": ""}])) }),
    );
    let base_url = spawn_server(app).await;

    let err = client_for(&base_url)
        .fetch_users()
        .await
        .expect_err("blank name must fail");
    assert_eq!(err.kind(), FailureKind::Decode);
}

#[tokio::test]
async fn fetch_users_classifies_refused_connection_as_transport_error() {
    let base_url = closed_server_url().await;

    let err = client_for(&base_url)
        .fetch_users()
        .await
        .expect_err("nothing listening");
    assert_eq!(err.kind(), FailureKind::Transport);
}

#[tokio::test]
async fn create_acronym_posts_draft_body() {
    let (base_url, body_rx) = spawn_acronym_server(HttpStatus::OK).await;
    let draft = AcronymDraft::new("TIL", "Today I Learned", UserId::Numeric(2));

    client_for(&base_url)
        .create_acronym(&draft)
        .await
        .expect("accepted");

    let body = body_rx.await.expect("captured body");
    assert_eq!(
        body,
        json!({"short": "TIL", "long": "Today I Learned", "userID": 2})
    );
}

#[tokio::test]
async fn create_acronym_only_accepts_exact_ok() {
    let (base_url, _body_rx) = spawn_acronym_server(HttpStatus::CREATED).await;
    let draft = AcronymDraft::new("IKR", "I Know, Right?", UserId::Numeric(1));

    let err = client_for(&base_url)
        .create_acronym(&draft)
        .await
        .expect_err("201 is outside the accepted set");
    assert_eq!(err, ClientError::Server { status: 201, reason: None });
}

#[tokio::test]
async fn create_acronym_surfaces_server_failure() {
    let (base_url, _body_rx) = spawn_acronym_server(HttpStatus::INTERNAL_SERVER_ERROR).await;
    let draft = AcronymDraft::new("TIL", "Today I Learned", UserId::Numeric(1));

    let err = client_for(&base_url)
        .create_acronym(&draft)
        .await
        .expect_err("500 must fail");
    assert_eq!(err.kind(), FailureKind::Server);
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn create_acronym_surfaces_transport_failure() {
    let base_url = closed_server_url().await;
    let draft = AcronymDraft::new("TIL", "Today I Learned", UserId::Numeric(1));

    let err = client_for(&base_url)
        .create_acronym(&draft)
        .await
        .expect_err("nothing listening");
    assert_eq!(err.kind(), FailureKind::Transport);
}

#[test]
fn trailing_slash_on_base_url_is_dropped() {
    let client = HttpResourceClient::with_client(Client::new(), "http://localhost:8080/");
    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[test]
fn rejects_invalid_settings() {
    assert!(HttpResourceClient::new(&ClientSettings::with_base_url("ftp://example.com")).is_err());
    assert!(HttpResourceClient::new(&ClientSettings::with_base_url("not a url")).is_err());
}
