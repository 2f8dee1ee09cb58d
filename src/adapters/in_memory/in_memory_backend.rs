// In memory stand-in for the REST backend.
//
// Purpose
// - Exercise the client, pages and import/export without a server.
//
// Responsibilities
// - Serve `/me` and CRUD for projects, hotels and time entries, with the same
//   filtering the backend applies (`created_by`, `from`/`to`, `sort`).
// - Return canned responses for everything else.
// - Record every request, inject failures, and go offline on demand.

use crate::core::entities::id::Id;
use crate::core::ports::{ApiRequest, ApiResponse, HttpTransport, Method, RequestBody, TransportError};
use chrono::Utc;
use reqwest::Url;
use serde_json::{Map, Value as Json, json};
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Duration;
use tokio::sync::RwLock;

pub const COLLECTIONS: [&str; 3] = ["projects", "hotels", "time-entries"];

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path without the leading slash, e.g. `time-entries/3`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: RequestBody,
}

impl RecordedRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
}

#[derive(Default)]
struct BackendState {
    me: Option<Json>,
    next_id: Id,
    collections: HashMap<String, Vec<Json>>,
    canned: HashMap<(Method, String), CannedResponse>,
    pending_failures: VecDeque<u16>,
    requests: Vec<RecordedRequest>,
}

#[derive(Default)]
pub struct InMemoryBackend {
    state: RwLock<BackendState>,
    is_offline: bool,
    delay_ms: AtomicU64,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Every response is held back this long, to make overlapping calls observable.
    pub fn set_delay_ms(&self, ms: u64) {
        self.delay_ms.store(ms, AtomicOrdering::Relaxed);
    }

    /// Sets the signed-in user returned by `GET /me`.
    pub fn with_user(mut self, user: Json) -> Self {
        self.state.get_mut().me = Some(user);
        self
    }

    pub fn with_record(mut self, collection: &str, record: Json) -> Self {
        self.state.get_mut().insert(collection, record);
        self
    }

    pub async fn seed(&self, collection: &str, record: Json) -> Json {
        self.state.write().await.insert(collection, record)
    }

    pub async fn records(&self, collection: &str) -> Vec<Json> {
        self.state
            .read()
            .await
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Answers `method path` with a JSON body and status 200.
    pub async fn stub(&self, method: Method, path: &str, body: Json) {
        let body = serde_json::to_vec(&body).unwrap_or_default();
        self.stub_raw(method, path, 200, Some("application/json"), body)
            .await;
    }

    pub async fn stub_raw(
        &self,
        method: Method,
        path: &str,
        status: u16,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) {
        self.state.write().await.canned.insert(
            (method, path.trim_matches('/').to_string()),
            CannedResponse {
                status,
                content_type: content_type.map(str::to_string),
                body,
            },
        );
    }

    /// The next `times` requests fail with `status`, whatever they are.
    pub async fn fail_next(&self, status: u16, times: usize) {
        let mut state = self.state.write().await;
        state
            .pending_failures
            .extend(std::iter::repeat_n(status, times));
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.read().await.requests.clone()
    }

    pub async fn count_requests(&self, method: Method, path: &str) -> usize {
        self.state
            .read()
            .await
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub async fn clear_requests(&self) {
        self.state.write().await.requests.clear();
    }
}

#[async_trait::async_trait]
impl HttpTransport for InMemoryBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        if self.is_offline {
            return Err(TransportError::Unavailable("Backend offline".into()));
        }

        let delay = self.delay_ms.load(AtomicOrdering::Relaxed);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let url = Url::parse(&request.url).map_err(|e| TransportError::Connection {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;
        let path = url.path().trim_matches('/').to_string();
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut state = self.state.write().await;
        state.requests.push(RecordedRequest {
            method: request.method,
            path: path.clone(),
            query: query.clone(),
            authorization: request.header("Authorization").map(str::to_string),
            content_type: request.header("Content-Type").map(str::to_string),
            body: request.body.clone(),
        });

        if let Some(status) = state.pending_failures.pop_front() {
            return Ok(json_response(status, &json!({ "detail": "Injected failure" })));
        }

        if let Some(canned) = state.canned.get(&(request.method, path.clone())) {
            return Ok(ApiResponse {
                status: canned.status,
                content_type: canned.content_type.clone(),
                body: canned.body.clone(),
            });
        }

        Ok(state.route(request.method, &path, &query, &request.body))
    }
}

impl BackendState {
    fn insert(&mut self, collection: &str, mut record: Json) -> Json {
        if let Json::Object(fields) = &mut record {
            let id = match fields.get("id").and_then(Json::as_i64) {
                Some(id) => {
                    self.next_id = self.next_id.max(id);
                    id
                }
                None => {
                    self.next_id += 1;
                    self.next_id
                }
            };
            fields.insert("id".into(), json!(id));
        }
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        record
    }

    fn route(
        &mut self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: &RequestBody,
    ) -> ApiResponse {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match (method, segments.as_slice()) {
            (Method::Get, ["me"]) => match &self.me {
                Some(me) => json_response(200, me),
                None => detail(401, "Not authenticated"),
            },
            (Method::Put, ["me"]) => self.update_me(body),
            (Method::Get, [collection]) if is_collection(collection) => {
                json_response(200, &Json::Array(self.list(collection, query)))
            }
            (Method::Post, [collection]) if is_collection(collection) => {
                self.create(collection, body)
            }
            (method, [collection, id]) if is_collection(collection) => match id.parse::<Id>() {
                Ok(id) => match method {
                    Method::Get => self.find(collection, id),
                    Method::Put | Method::Patch => self.update(collection, id, body),
                    Method::Delete => self.remove(collection, id),
                    Method::Post => detail(405, "Method Not Allowed"),
                },
                Err(_) => detail(422, "Invalid id"),
            },
            _ => detail(404, "Not Found"),
        }
    }

    fn list(&self, collection: &str, query: &[(String, String)]) -> Vec<Json> {
        let mut rows: Vec<Json> = self
            .collections
            .get(collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_filters(row, query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((_, sort)) = query.iter().find(|(k, _)| k == "sort") {
            let (field, descending) = match sort.strip_prefix('-') {
                Some(field) => (field, true),
                None => (sort.as_str(), false),
            };
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(field), b.get(field));
                if descending { ordering.reverse() } else { ordering }
            });
        }
        rows
    }

    fn find(&self, collection: &str, id: Id) -> ApiResponse {
        match self.position(collection, id) {
            Some(index) => json_response(200, &self.collections[collection][index]),
            None => detail(404, "Not found"),
        }
    }

    fn create(&mut self, collection: &str, body: &RequestBody) -> ApiResponse {
        let Some(mut fields) = json_object(body) else {
            return detail(422, "Expected a JSON object");
        };
        fields.remove("id");
        let now = Utc::now().to_rfc3339();
        if let Some(email) = self.me.as_ref().and_then(|me| me.get("email")).cloned() {
            fields.entry("created_by").or_insert(email);
        }
        fields.insert("created_date".into(), json!(now));
        fields.insert("updated_date".into(), json!(now));
        let record = self.insert(collection, Json::Object(fields));
        json_response(201, &record)
    }

    fn update(&mut self, collection: &str, id: Id, body: &RequestBody) -> ApiResponse {
        let Some(changes) = json_object(body) else {
            return detail(422, "Expected a JSON object");
        };
        let Some(index) = self.position(collection, id) else {
            return detail(404, "Not found");
        };
        let Some(rows) = self.collections.get_mut(collection) else {
            return detail(404, "Not found");
        };
        if let Json::Object(fields) = &mut rows[index] {
            for (key, value) in changes {
                if key != "id" && key != "created_by" {
                    fields.insert(key, value);
                }
            }
            fields.insert("updated_date".into(), json!(Utc::now().to_rfc3339()));
        }
        json_response(200, &rows[index])
    }

    fn remove(&mut self, collection: &str, id: Id) -> ApiResponse {
        match self.position(collection, id) {
            Some(index) => {
                if let Some(rows) = self.collections.get_mut(collection) {
                    rows.remove(index);
                }
                ApiResponse {
                    status: 204,
                    content_type: None,
                    body: Vec::new(),
                }
            }
            None => detail(404, "Not found"),
        }
    }

    fn update_me(&mut self, body: &RequestBody) -> ApiResponse {
        let Some(changes) = json_object(body) else {
            return detail(422, "Expected a JSON object");
        };
        match &mut self.me {
            Some(Json::Object(me)) => {
                for (key, value) in changes {
                    if key != "id" && key != "email" && key != "role" {
                        me.insert(key, value);
                    }
                }
                json_response(200, &Json::Object(me.clone()))
            }
            _ => detail(401, "Not authenticated"),
        }
    }

    fn position(&self, collection: &str, id: Id) -> Option<usize> {
        self.collections
            .get(collection)?
            .iter()
            .position(|row| row.get("id").and_then(Json::as_i64) == Some(id))
    }
}

fn is_collection(name: &str) -> bool {
    COLLECTIONS.contains(&name)
}

fn json_object(body: &RequestBody) -> Option<Map<String, Json>> {
    match body {
        RequestBody::Json(Json::Object(fields)) => Some(fields.clone()),
        _ => None,
    }
}

fn matches_filters(row: &Json, query: &[(String, String)]) -> bool {
    query.iter().all(|(key, expected)| match key.as_str() {
        "sort" => true,
        "from" => date_of(row).is_some_and(|date| date >= expected.as_str()),
        "to" => date_of(row).is_some_and(|date| date <= expected.as_str()),
        field => row.get(field).and_then(as_text).as_deref() == Some(expected.as_str()),
    })
}

fn date_of(row: &Json) -> Option<&str> {
    row.get("date")
        .or_else(|| row.get("entry_date"))
        .and_then(Json::as_str)
        .map(|date| date.get(..10).unwrap_or(date))
}

fn as_text(value: &Json) -> Option<String> {
    match value {
        Json::Null => None,
        Json::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn compare_values(a: Option<&Json>, b: Option<&Json>) -> Ordering {
    match (a, b) {
        (Some(Json::Number(a)), Some(Json::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Json::String(a)), Some(Json::String(b))) => a.cmp(b),
        (None | Some(Json::Null), None | Some(Json::Null)) => Ordering::Equal,
        (None | Some(Json::Null), _) => Ordering::Less,
        (_, None | Some(Json::Null)) => Ordering::Greater,
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

fn json_response(status: u16, body: &Json) -> ApiResponse {
    ApiResponse {
        status,
        content_type: Some("application/json".into()),
        body: serde_json::to_vec(body).unwrap_or_default(),
    }
}

fn detail(status: u16, message: &str) -> ApiResponse {
    json_response(status, &json!({ "detail": message }))
}

#[cfg(test)]
mod in_memory_backend_tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn get(path: &str) -> ApiRequest {
        ApiRequest {
            method: Method::Get,
            url: format!("http://backend.test/{path}"),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    fn body_of(response: &ApiResponse) -> Json {
        serde_json::from_slice(&response.body).unwrap()
    }

    #[fixture]
    fn before_each() -> InMemoryBackend {
        InMemoryBackend::new()
            .with_user(json!({"id": 1, "email": "ana@example.com"}))
            .with_record("time-entries", json!({"date": "2024-03-04", "hours_worked": 3, "created_by": "ana@example.com"}))
            .with_record("time-entries", json!({"date": "2024-03-12", "hours_worked": 8, "created_by": "ana@example.com"}))
            .with_record("time-entries", json!({"date": "2024-03-05", "hours_worked": 5, "created_by": "bo@example.com"}))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_filter_by_owner_and_date_range(before_each: InMemoryBackend) {
        let backend = before_each;
        let response = backend
            .send(get("time-entries?created_by=ana%40example.com&from=2024-03-04&to=2024-03-10"))
            .await
            .unwrap();
        let rows = body_of(&response);
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["date"], "2024-03-04");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_sort_descending_with_a_leading_dash(before_each: InMemoryBackend) {
        let backend = before_each;
        let response = backend.send(get("time-entries?sort=-hours_worked")).await.unwrap();
        let hours: Vec<i64> = body_of(&response)
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["hours_worked"].as_i64().unwrap())
            .collect();
        assert_eq!(hours, vec![8, 5, 3]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_stamp_the_owner_on_created_records(before_each: InMemoryBackend) {
        let backend = before_each;
        let response = backend
            .send(ApiRequest {
                method: Method::Post,
                url: "http://backend.test/projects".into(),
                headers: Vec::new(),
                body: RequestBody::Json(json!({"name": "Bridge"})),
            })
            .await
            .unwrap();
        assert_eq!(response.status, 201);
        let created = body_of(&response);
        assert_eq!(created["created_by"], "ana@example.com");
        assert_eq!(created["id"], 4);
        assert_eq!(backend.records("projects").await.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_answer_404_for_unknown_records(before_each: InMemoryBackend) {
        let backend = before_each;
        let response = backend.send(get("hotels/77")).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_record_requests_and_consume_injected_failures(before_each: InMemoryBackend) {
        let backend = before_each;
        backend.fail_next(500, 1).await;
        assert_eq!(backend.send(get("me")).await.unwrap().status, 500);
        assert_eq!(backend.send(get("me")).await.unwrap().status, 200);
        assert_eq!(backend.count_requests(Method::Get, "me").await, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_if_the_backend_is_offline(before_each: InMemoryBackend) {
        let mut backend = before_each;
        backend.toggle_offline();
        let result = backend.send(get("me")).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Backend offline"));
    }
}
