use crate::application::errors::PageError;
use crate::application::facades::auth::AuthFacade;
use crate::application::forms::status::{FormStatus, format_number};
use crate::core::entities::user::{ProfileUpdate, User};

/// The signed-in user's own profile. Name and email are read-only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileForm {
    pub company: String,
    pub wage: String,
    pub status: FormStatus,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            company: user.company.clone().unwrap_or_default(),
            wage: user.wage.map(format_number).unwrap_or_default(),
            status: FormStatus::Idle,
        }
    }

    /// An empty form waiting for `load`; busy until the profile arrives.
    pub fn loading() -> Self {
        Self {
            status: FormStatus::Loading,
            ..Self::default()
        }
    }

    /// Fetches `/me` and fills the form from it.
    pub async fn load(&mut self, auth: &AuthFacade) -> Result<User, PageError> {
        self.status = FormStatus::Loading;
        let loaded = auth.me().await;
        self.status = FormStatus::Idle;
        let user = loaded?;
        self.company = user.company.clone().unwrap_or_default();
        self.wage = user.wage.map(format_number).unwrap_or_default();
        Ok(user)
    }

    /// A blank or unreadable wage is sent as 0.
    pub fn to_update(&self) -> ProfileUpdate {
        let wage = self
            .wage
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite())
            .unwrap_or(0.0);
        ProfileUpdate {
            company: self.company.trim().to_string(),
            wage,
        }
    }

    pub async fn submit(&mut self, auth: &AuthFacade) -> Result<User, PageError> {
        let update = self.to_update();
        self.status = FormStatus::Saving;
        let saved = auth.update_me(&update).await;
        self.status = FormStatus::Idle;
        Ok(saved?)
    }
}
