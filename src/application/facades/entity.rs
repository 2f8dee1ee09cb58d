// One generic facade for the plain CRUD resources (projects, time entries, hotels).
//
// Responsibilities
// - Map list/filter/get/create/update/remove onto `GET|POST|PUT|DELETE /<resource>[/:id]`.
// - Send the full payload on update; the backend never receives a diff.

use crate::application::errors::ApiError;
use crate::application::http_client::ApiClient;
use crate::application::query::Query;
use crate::core::entities::hotel::Hotel;
use crate::core::entities::id::Id;
use crate::core::entities::project::Project;
use crate::core::entities::time_entry::TimeEntry;
use crate::core::ports::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::debug;

pub struct EntityFacade<T> {
    client: ApiClient,
    resource: &'static str,
    _record: PhantomData<fn() -> T>,
}

pub type ProjectsFacade = EntityFacade<Project>;
pub type TimeEntriesFacade = EntityFacade<TimeEntry>;
pub type HotelsFacade = EntityFacade<Hotel>;

impl<T> Clone for EntityFacade<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            resource: self.resource,
            _record: PhantomData,
        }
    }
}

impl EntityFacade<Project> {
    pub fn projects(client: ApiClient) -> Self {
        Self::new(client, "projects")
    }
}

impl EntityFacade<TimeEntry> {
    pub fn time_entries(client: ApiClient) -> Self {
        Self::new(client, "time-entries")
    }
}

impl EntityFacade<Hotel> {
    pub fn hotels(client: ApiClient) -> Self {
        Self::new(client, "hotels")
    }
}

impl<T: DeserializeOwned> EntityFacade<T> {
    pub fn new(client: ApiClient, resource: &'static str) -> Self {
        Self {
            client,
            resource,
            _record: PhantomData,
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub async fn list(&self, sort: Option<&str>) -> Result<Vec<T>, ApiError> {
        self.filter(Query::new(), sort).await
    }

    pub async fn filter(&self, query: Query, sort: Option<&str>) -> Result<Vec<T>, ApiError> {
        self.client
            .get_json(self.resource, &query.sorted(sort))
            .await
    }

    pub async fn get(&self, id: Id) -> Result<T, ApiError> {
        self.client
            .get_json(&self.item_path(id), &Query::new())
            .await
    }

    pub async fn create<P: Serialize + ?Sized>(&self, data: &P) -> Result<T, ApiError> {
        debug!(resource = self.resource, "creating record");
        self.client
            .send_json(Method::Post, self.resource, data)
            .await
    }

    pub async fn update<P: Serialize + ?Sized>(&self, id: Id, data: &P) -> Result<T, ApiError> {
        debug!(resource = self.resource, id, "updating record");
        self.client
            .send_json(Method::Put, &self.item_path(id), data)
            .await
    }

    pub async fn remove(&self, id: Id) -> Result<(), ApiError> {
        debug!(resource = self.resource, id, "deleting record");
        self.client.delete(&self.item_path(id)).await
    }

    fn item_path(&self, id: Id) -> String {
        format!("{}/{id}", self.resource)
    }
}

#[cfg(test)]
mod entity_facade_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_backend::InMemoryBackend;
    use crate::adapters::in_memory::in_memory_token_store::InMemoryTokenStore;
    use crate::application::config::ClientConfig;
    use crate::core::entities::project::ProjectPayload;
    use crate::test_support::fixtures::entities::{ProjectBuilder, to_json};
    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::sync::Arc;

    #[fixture]
    fn before_each() -> (Arc<InMemoryBackend>, ProjectsFacade) {
        let backend = Arc::new(
            InMemoryBackend::new()
                .with_user(json!({"id": 1, "email": "ana@example.com"}))
                .with_record("projects", to_json(&ProjectBuilder::new(1, "Bridge").build()))
                .with_record("projects", to_json(&ProjectBuilder::new(2, "Airport").client("Acme").build())),
        );
        let client = ApiClient::new(
            ClientConfig::new("http://backend.test").unwrap(),
            backend.clone(),
            Arc::new(InMemoryTokenStore::new()),
        );
        (backend, EntityFacade::projects(client))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_list_with_a_sort(before_each: (Arc<InMemoryBackend>, ProjectsFacade)) {
        let (backend, projects) = before_each;
        let listed = projects.list(Some("name")).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Airport", "Bridge"]);
        assert_eq!(backend.requests().await[0].query_value("sort"), Some("name"));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_filter_on_every_non_empty_key(
        before_each: (Arc<InMemoryBackend>, ProjectsFacade),
    ) {
        let (backend, projects) = before_each;
        let query = Query::from_value(json!({"client": "Acme", "contract": null, "name": ""}));
        let listed = projects.filter(query, Some("-created_date")).await.unwrap();
        assert_eq!(listed.len(), 1);

        let request = &backend.requests().await[0];
        assert_eq!(
            request.query,
            vec![
                ("client".to_string(), "Acme".to_string()),
                ("sort".to_string(), "-created_date".to_string()),
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_let_the_sort_argument_replace_a_sort_in_the_filter(
        before_each: (Arc<InMemoryBackend>, ProjectsFacade),
    ) {
        let (backend, projects) = before_each;
        let query = Query::from_value(json!({"sort": "name"}));
        let listed = projects.filter(query, Some("-name")).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bridge", "Airport"]);

        let request = &backend.requests().await[0];
        assert_eq!(request.query, vec![("sort".to_string(), "-name".to_string())]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_put_the_full_payload_on_update(
        before_each: (Arc<InMemoryBackend>, ProjectsFacade),
    ) {
        let (backend, projects) = before_each;
        let mut payload = ProjectPayload::from(&projects.get(1).await.unwrap());
        payload.default_hours_worked = 6.0;
        let updated = projects.update(1, &payload).await.unwrap();
        assert_eq!(updated.default_hours_worked, 6.0);

        let put = backend
            .requests()
            .await
            .into_iter()
            .find(|r| r.method == Method::Put)
            .unwrap();
        assert_eq!(put.path, "projects/1");
        match put.body {
            crate::core::ports::RequestBody::Json(body) => {
                assert_eq!(body.as_object().unwrap().len(), 5);
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_create_and_remove(before_each: (Arc<InMemoryBackend>, ProjectsFacade)) {
        let (backend, projects) = before_each;
        let created = projects
            .create(&json!({"name": "Harbour", "default_hours_worked": "7.5"}))
            .await
            .unwrap();
        assert_eq!(created.default_hours_worked, 7.5);
        projects.remove(created.id).await.unwrap();
        assert_eq!(backend.records("projects").await.len(), 2);

        let error = projects.remove(created.id).await.unwrap_err();
        assert!(error.is_not_found());
    }
}
