use crate::core::entities::amount::amount;
use crate::core::entities::id::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub contract: Option<String>,
    #[serde(default, deserialize_with = "amount")]
    pub default_hours_worked: f64,
    #[serde(default, deserialize_with = "amount")]
    pub default_travel_time: f64,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
}

/// Full body sent on create and update; the backend never receives partial patches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPayload {
    pub name: String,
    pub client: String,
    pub contract: String,
    pub default_hours_worked: f64,
    pub default_travel_time: f64,
}

impl From<&Project> for ProjectPayload {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            client: project.client.clone().unwrap_or_default(),
            contract: project.contract.clone().unwrap_or_default(),
            default_hours_worked: project.default_hours_worked,
            default_travel_time: project.default_travel_time,
        }
    }
}

#[cfg(test)]
mod project_tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn it_should_read_a_project_with_string_defaults() {
        let project: Project = serde_json::from_value(json!({
            "id": 7,
            "name": "Depot",
            "client": "ACME",
            "default_hours_worked": "7.5",
            "default_travel_time": 1
        }))
        .unwrap();
        assert_eq!(project.default_hours_worked, 7.5);
        assert_eq!(project.default_travel_time, 1.0);
        assert!(!project.archived);
        assert_eq!(project.contract, None);
    }

    #[rstest]
    fn it_should_build_a_full_payload_from_a_project() {
        let project: Project =
            serde_json::from_value(json!({"id": 1, "name": "Depot"})).unwrap();
        let payload = ProjectPayload::from(&project);
        assert_eq!(payload.client, "");
        assert_eq!(payload.contract, "");
        assert_eq!(payload.default_hours_worked, 0.0);
    }
}
