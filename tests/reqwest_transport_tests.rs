// End to end tests for the network transport.
//
// Responsibilities when you add code
// - Start a throwaway axum backend on 127.0.0.1:0, one per test.
// - Drive it through ReqwestTransport and ApiClient, the same stack the binary uses.
// - Assert on what the backend saw as well as on what the client returned.
use axum::Router;
use axum::extract::{Multipart, Query as AxumQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value as Json, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use timesheet_client::adapters::in_memory::in_memory_token_store::InMemoryTokenStore;
use timesheet_client::adapters::reqwest::reqwest_transport::ReqwestTransport;
use timesheet_client::application::config::ClientConfig;
use timesheet_client::application::errors::ApiError;
use timesheet_client::application::facades::api::TimesheetApi;
use timesheet_client::application::http_client::ApiClient;
use timesheet_client::application::query::Query;
use timesheet_client::core::entities::project::Project;
use timesheet_client::core::entities::receipt::UploadFile;
use timesheet_client::core::entities::user::User;

const TOKEN: &str = "tok-1";

#[derive(Default)]
struct Seen {
    authorization: Mutex<Vec<Option<String>>>,
    queries: Mutex<Vec<HashMap<String, String>>>,
    flaky_calls: AtomicUsize,
    me_calls: AtomicUsize,
}

type Shared = Arc<Seen>;

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn json_response(status: StatusCode, body: Json) -> Response {
    (status, axum::Json(body)).into_response()
}

async fn me(State(seen): State<Shared>, headers: HeaderMap) -> Response {
    seen.me_calls.fetch_add(1, Ordering::SeqCst);
    let authorization = bearer(&headers);
    seen.authorization.lock().unwrap().push(authorization.clone());
    if authorization.as_deref() != Some(&format!("Bearer {TOKEN}")) {
        return json_response(StatusCode::UNAUTHORIZED, json!({ "detail": "Not authenticated" }));
    }
    json_response(
        StatusCode::OK,
        json!({ "id": 1, "email": "ann@example.com", "full_name": "Ann", "wage": "12.50", "role": "user" }),
    )
}

async fn projects(State(seen): State<Shared>, AxumQuery(query): AxumQuery<HashMap<String, String>>) -> Response {
    seen.queries.lock().unwrap().push(query);
    json_response(
        StatusCode::OK,
        json!([
            { "id": 2, "name": "Depot", "default_hours_worked": "7.5", "created_by": "ann@example.com" },
            { "id": 1, "name": "Bridge", "default_hours_worked": 8, "created_by": "ann@example.com" }
        ]),
    )
}

async fn admin_only() -> Response {
    json_response(StatusCode::FORBIDDEN, json!({ "detail": "Admins only" }))
}

async fn broken() -> Response {
    (StatusCode::BAD_GATEWAY, "upstream went away").into_response()
}

async fn flaky(State(seen): State<Shared>) -> Response {
    if seen.flaky_calls.fetch_add(1, Ordering::SeqCst) == 0 {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    json_response(StatusCode::OK, json!({ "ok": true }))
}

async fn receipt_file() -> Response {
    ([(header::CONTENT_TYPE, "image/jpeg")], vec![0xFF_u8, 0xD8, 0xFF, 0xE0]).into_response()
}

async fn upload(mut multipart: Multipart) -> Response {
    let mut entry_date = None;
    let mut files = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let Ok(bytes) = field.bytes().await else {
            return StatusCode::BAD_REQUEST.into_response();
        };
        match name.as_str() {
            "entry_date" => entry_date = Some(String::from_utf8_lossy(&bytes).into_owned()),
            "files" => files.push(json!({
                "file_name": file_name,
                "content_type": content_type,
                "size": bytes.len(),
            })),
            _ => {}
        }
    }
    json_response(StatusCode::OK, json!({ "entry_date": entry_date, "files": files }))
}

async fn start_session() -> Response {
    (
        [(header::SET_COOKIE, "session=abc123; HttpOnly; Path=/")],
        axum::Json(json!({ "ok": true })),
    )
        .into_response()
}

async fn echo_cookie(headers: HeaderMap) -> Response {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    json_response(StatusCode::OK, json!({ "cookie": cookie }))
}

async fn start_backend() -> (String, Shared) {
    let seen: Shared = Arc::new(Seen::default());
    let api = Router::new()
        .route("/me", get(me))
        .route("/projects", get(projects))
        .route("/admin/users", get(admin_only))
        .route("/broken", get(broken))
        .route("/flaky", get(flaky))
        .route("/receipts/{id}/file", get(receipt_file))
        .route("/receipts/upload", post(upload))
        .route("/session", get(start_session))
        .route("/cookie", get(echo_cookie))
        .with_state(seen.clone());
    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), seen)
}

fn client(base: &str, token: Option<&str>) -> ApiClient {
    let tokens = match token {
        Some(token) => InMemoryTokenStore::with_token(token),
        None => InMemoryTokenStore::new(),
    };
    ApiClient::new(
        ClientConfig::new(base).unwrap(),
        Arc::new(ReqwestTransport::new().unwrap()),
        Arc::new(tokens),
    )
}

#[tokio::test]
async fn it_should_send_the_bearer_token_and_decode_the_user() {
    let (base, seen) = start_backend().await;
    let api = TimesheetApi::new(client(&base, Some(TOKEN)));

    let user: User = api.auth.me().await.unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.display_name(), "Ann");
    assert_eq!(user.wage, Some(12.5));
    assert_eq!(
        seen.authorization.lock().unwrap().as_slice(),
        &[Some("Bearer tok-1".to_string())]
    );
}

#[tokio::test]
async fn it_should_flatten_the_sort_into_the_query_string() {
    let (base, seen) = start_backend().await;
    let api = TimesheetApi::new(client(&base, Some(TOKEN)));

    let projects: Vec<Project> = api.projects.list(Some("-created_date")).await.unwrap();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].default_hours_worked, 7.5);
    let queries = seen.queries.lock().unwrap();
    assert_eq!(queries[0].get("sort").map(String::as_str), Some("-created_date"));
}

#[tokio::test]
async fn it_should_surface_the_detail_of_a_client_error() {
    let (base, _) = start_backend().await;
    let client = client(&base, Some(TOKEN));

    let error = client
        .get_json::<Json>("admin/users", &Query::new())
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(403));
    assert_eq!(error.to_string(), "HTTP 403: Admins only");
}

#[tokio::test]
async fn it_should_keep_plain_text_error_bodies() {
    let (base, _) = start_backend().await;
    let client = client(&base, None);

    let error = client.get_json::<Json>("broken", &Query::new()).await.unwrap_err();

    assert!(matches!(error, ApiError::Http { status: 502, ref message, .. } if message == "upstream went away"));
}

#[tokio::test]
async fn it_should_retry_once_after_warming_up_the_session() {
    let (base, seen) = start_backend().await;
    let client = client(&base, Some(TOKEN));

    let body: Json = client.get_json("flaky", &Query::new()).await.unwrap();

    assert_eq!(body, json!({ "ok": true }));
    assert_eq!(seen.flaky_calls.load(Ordering::SeqCst), 2);
    assert_eq!(seen.me_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn it_should_report_a_second_unauthorized_as_an_error() {
    let (base, seen) = start_backend().await;
    let client = client(&base, None);

    let error = client.get_json::<Json>("me", &Query::new()).await.unwrap_err();

    assert!(error.is_unauthorized());
    // original call, warm-up, retry
    assert_eq!(seen.me_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn it_should_upload_receipts_as_multipart() {
    let (base, _) = start_backend().await;
    let api = TimesheetApi::new(client(&base, Some(TOKEN)));
    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

    let response = api
        .receipts
        .upload(
            date,
            None,
            vec![
                UploadFile::new("a.jpg", vec![1, 2, 3]),
                UploadFile::new("b.png", vec![4, 5]),
            ],
        )
        .await
        .unwrap();

    assert_eq!(response["entry_date"], json!("2024-03-04"));
    assert_eq!(
        response["files"],
        json!([
            { "file_name": "a.jpg", "content_type": "image/jpeg", "size": 3 },
            { "file_name": "b.png", "content_type": "image/png", "size": 2 }
        ])
    );
}

#[tokio::test]
async fn it_should_return_binary_bodies_untouched() {
    let (base, _) = start_backend().await;
    let api = TimesheetApi::new(client(&base, Some(TOKEN)));

    let bytes = api.receipts.file(9).await.unwrap();

    assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);
}

#[tokio::test]
async fn it_should_send_back_cookies_set_by_the_backend() {
    let (base, _) = start_backend().await;
    let client = client(&base, None);

    client.get_json::<Json>("session", &Query::new()).await.unwrap();
    let echoed: Json = client.get_json("cookie", &Query::new()).await.unwrap();

    assert_eq!(echoed["cookie"], json!("session=abc123"));
}
