use crate::application::errors::PageError;
use crate::application::facades::api::TimesheetApi;
use crate::application::forms::project_form::ProjectForm;
use crate::application::pages::owned_records::OwnedRecords;
use crate::core::entities::id::Id;
use crate::core::entities::project::Project;
use tracing::info;

/// The user's projects, newest first.
pub struct ProjectsPage {
    records: OwnedRecords<Project>,
}

impl ProjectsPage {
    pub fn new(api: &TimesheetApi) -> Self {
        Self {
            records: OwnedRecords::new(api.auth.clone(), api.projects.clone()),
        }
    }

    pub fn projects(&self) -> &[Project] {
        self.records.items()
    }

    pub async fn load(&mut self) -> Result<&[Project], PageError> {
        Ok(self.records.load().await?)
    }

    pub fn edit_form(&self, id: Id) -> Option<ProjectForm> {
        self.projects()
            .iter()
            .find(|p| p.id == id)
            .map(ProjectForm::edit)
    }

    pub async fn save(&mut self, form: &mut ProjectForm) -> Result<Project, PageError> {
        let saved = form.submit(self.records.facade()).await?;
        info!(id = saved.id, name = %saved.name, "project saved");
        self.records.load().await?;
        Ok(saved)
    }

    pub async fn delete(&mut self, id: Id) -> Result<(), PageError> {
        self.records.delete(id).await
    }
}

#[cfg(test)]
mod projects_page_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_backend::InMemoryBackend;
    use crate::adapters::in_memory::in_memory_token_store::InMemoryTokenStore;
    use crate::application::config::ClientConfig;
    use crate::core::ports::Method;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::sync::Arc;

    #[fixture]
    fn before_each() -> (Arc<InMemoryBackend>, ProjectsPage) {
        let backend = Arc::new(
            InMemoryBackend::new()
                .with_user(json!({"id": 1, "email": "ana@example.com"}))
                .with_record("projects", json!({"id": 1, "name": "Old", "created_by": "ana@example.com", "created_date": "2024-01-01T00:00:00Z"}))
                .with_record("projects", json!({"id": 2, "name": "New", "created_by": "ana@example.com", "created_date": "2024-02-01T00:00:00Z"}))
                .with_record("projects", json!({"id": 3, "name": "Theirs", "created_by": "bo@example.com", "created_date": "2024-03-01T00:00:00Z"})),
        );
        let api = TimesheetApi::connect(
            ClientConfig::new("http://backend.test").unwrap(),
            backend.clone(),
            Arc::new(InMemoryTokenStore::with_token("tok")),
        );
        (backend, ProjectsPage::new(&api))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_list_own_projects_newest_first(before_each: (Arc<InMemoryBackend>, ProjectsPage)) {
        let (backend, mut page) = before_each;
        let names: Vec<String> = page.load().await.unwrap().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["New", "Old"]);

        let request = backend.requests().await.into_iter().find(|r| r.path == "projects").unwrap();
        assert_eq!(request.query_value("sort"), Some("-created_date"));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_refetch_after_saving(before_each: (Arc<InMemoryBackend>, ProjectsPage)) {
        let (backend, mut page) = before_each;
        page.load().await.unwrap();

        let mut form = ProjectForm {
            name: "Bridge".into(),
            ..ProjectForm::create()
        };
        let saved = page.save(&mut form).await.unwrap();
        assert_eq!(saved.default_hours_worked, 8.0);
        assert_eq!(page.projects().len(), 3);
        assert_eq!(backend.count_requests(Method::Get, "projects").await, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_rename_through_the_edit_form(before_each: (Arc<InMemoryBackend>, ProjectsPage)) {
        let (_, mut page) = before_each;
        page.load().await.unwrap();
        let mut form = page.edit_form(1).unwrap();
        form.name = "Renamed".into();
        page.save(&mut form).await.unwrap();
        assert!(page.projects().iter().any(|p| p.name == "Renamed"));
        assert_eq!(page.projects().len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_drop_a_deleted_project(before_each: (Arc<InMemoryBackend>, ProjectsPage)) {
        let (_, mut page) = before_each;
        page.load().await.unwrap();
        page.delete(2).await.unwrap();
        assert_eq!(page.projects().len(), 1);
        assert!(page.delete(2).await.is_err());
    }
}
