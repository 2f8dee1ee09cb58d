use crate::application::errors::{FormError, PageError};
use crate::application::facades::entity::ProjectsFacade;
use crate::application::forms::status::{FormMode, FormStatus, format_number, non_negative, required};
use crate::core::entities::project::{Project, ProjectPayload};

pub const DEFAULT_HOURS_WORKED: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    pub mode: FormMode,
    pub name: String,
    pub client: String,
    pub contract: String,
    pub default_hours_worked: String,
    pub default_travel_time: String,
    pub status: FormStatus,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self::create()
    }
}

impl ProjectForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            name: String::new(),
            client: String::new(),
            contract: String::new(),
            default_hours_worked: format_number(DEFAULT_HOURS_WORKED),
            default_travel_time: "0".into(),
            status: FormStatus::Idle,
        }
    }

    pub fn edit(project: &Project) -> Self {
        let payload = ProjectPayload::from(project);
        Self {
            mode: FormMode::Edit(project.id),
            name: payload.name,
            client: payload.client,
            contract: payload.contract,
            default_hours_worked: format_number(payload.default_hours_worked),
            default_travel_time: format_number(payload.default_travel_time),
            status: FormStatus::Idle,
        }
    }

    pub fn to_payload(&self) -> Result<ProjectPayload, FormError> {
        Ok(ProjectPayload {
            name: required("name", &self.name)?,
            client: self.client.trim().to_string(),
            contract: self.contract.trim().to_string(),
            default_hours_worked: non_negative("default hours worked", &self.default_hours_worked)?,
            default_travel_time: non_negative("default travel time", &self.default_travel_time)?,
        })
    }

    pub async fn submit(&mut self, projects: &ProjectsFacade) -> Result<Project, PageError> {
        let payload = self.to_payload()?;
        self.status = FormStatus::Saving;
        let saved = match self.mode {
            FormMode::Create => projects.create(&payload).await,
            FormMode::Edit(id) => projects.update(id, &payload).await,
        };
        self.status = FormStatus::Idle;
        Ok(saved?)
    }
}
