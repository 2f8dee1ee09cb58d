use crate::core::entities::amount::optional_amount;
use crate::core::entities::id::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    /// Hourly wage; older backends call it `hourly_rate`.
    #[serde(default, alias = "hourly_rate", deserialize_with = "optional_amount")]
    pub wage: Option<f64>,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }

    pub fn hourly_wage(&self) -> f64 {
        self.wage.unwrap_or(0.0)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Body of `PUT /me` sent by the profile form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub company: String,
    pub wage: f64,
}

/// Body of `PUT /admin/users/:id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminUserUpdate {
    pub full_name: String,
    pub company: String,
    pub wage: Option<f64>,
    pub role: Role,
}
