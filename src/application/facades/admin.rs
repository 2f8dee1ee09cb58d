use crate::application::errors::ApiError;
use crate::application::http_client::ApiClient;
use crate::application::query::Query;
use crate::core::entities::id::Id;
use crate::core::entities::user::{AdminUserUpdate, User};
use crate::core::ports::Method;

/// User management under `/admin/users`; the backend rejects non-admins.
#[derive(Clone)]
pub struct AdminFacade {
    client: ApiClient,
}

impl AdminFacade {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.client.get_json("/admin/users", &Query::new()).await
    }

    pub async fn get_user(&self, id: Id) -> Result<User, ApiError> {
        self.client
            .get_json(&format!("/admin/users/{id}"), &Query::new())
            .await
    }

    pub async fn update_user(&self, id: Id, update: &AdminUserUpdate) -> Result<User, ApiError> {
        self.client
            .send_json(Method::Put, &format!("/admin/users/{id}"), update)
            .await
    }

    pub async fn delete_user(&self, id: Id) -> Result<(), ApiError> {
        self.client.delete(&format!("/admin/users/{id}")).await
    }
}

#[cfg(test)]
mod admin_facade_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_backend::InMemoryBackend;
    use crate::adapters::in_memory::in_memory_token_store::InMemoryTokenStore;
    use crate::application::config::ClientConfig;
    use crate::core::entities::user::Role;
    use crate::core::ports::RequestBody;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::sync::Arc;

    #[fixture]
    fn before_each() -> (Arc<InMemoryBackend>, AdminFacade) {
        let backend = Arc::new(InMemoryBackend::new());
        let client = ApiClient::new(
            ClientConfig::new("http://backend.test").unwrap(),
            backend.clone(),
            Arc::new(InMemoryTokenStore::with_token("admin-token")),
        );
        (backend, AdminFacade::new(client))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_list_users(before_each: (Arc<InMemoryBackend>, AdminFacade)) {
        let (backend, admin) = before_each;
        backend
            .stub(
                Method::Get,
                "admin/users",
                json!([
                    {"id": 1, "email": "ana@example.com", "role": "admin"},
                    {"id": 2, "email": "bo@example.com", "wage": null}
                ]),
            )
            .await;
        let users = admin.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].role, Role::User);
        assert_eq!(users[1].wage, None);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_send_a_null_wage_when_cleared(before_each: (Arc<InMemoryBackend>, AdminFacade)) {
        let (backend, admin) = before_each;
        backend
            .stub(Method::Put, "admin/users/2", json!({"id": 2, "email": "bo@example.com", "role": "admin"}))
            .await;
        let update = AdminUserUpdate {
            full_name: "Bo".into(),
            company: String::new(),
            wage: None,
            role: Role::Admin,
        };
        let user = admin.update_user(2, &update).await.unwrap();
        assert!(user.is_admin());

        let body = backend.requests().await.remove(0).body;
        assert_eq!(
            body,
            RequestBody::Json(json!({"full_name": "Bo", "company": "", "wage": null, "role": "admin"}))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_surface_forbidden_responses(before_each: (Arc<InMemoryBackend>, AdminFacade)) {
        let (backend, admin) = before_each;
        backend
            .stub_raw(Method::Delete, "admin/users/1", 403, Some("application/json"), br#"{"detail":"Admins only"}"#.to_vec())
            .await;
        let error = admin.delete_user(1).await.unwrap_err();
        assert_eq!(error.status(), Some(403));
        assert_eq!(error.to_string(), "HTTP 403: Admins only");
    }
}
