use crate::application::errors::{FormError, PageError};
use crate::application::facades::admin::AdminFacade;
use crate::application::forms::status::{FormStatus, format_number, non_negative};
use crate::core::entities::id::Id;
use crate::core::entities::user::{AdminUserUpdate, Role, User};

/// Admin edit form for another user's profile and role.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminUserForm {
    pub user_id: Id,
    pub full_name: String,
    pub company: String,
    pub wage: String,
    pub role: Role,
    pub status: FormStatus,
}

impl AdminUserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            full_name: user.full_name.clone().unwrap_or_default(),
            company: user.company.clone().unwrap_or_default(),
            wage: user.wage.map(format_number).unwrap_or_default(),
            role: user.role,
            status: FormStatus::Idle,
        }
    }

    /// Fetches the latest copy of the user before editing.
    pub async fn load(admin: &AdminFacade, user_id: Id) -> Result<Self, PageError> {
        let user = admin.get_user(user_id).await?;
        Ok(Self::from_user(&user))
    }

    /// A blank wage clears it on the backend.
    pub fn to_update(&self) -> Result<AdminUserUpdate, FormError> {
        let wage = match self.wage.trim() {
            "" => None,
            raw => Some(non_negative("wage", raw)?),
        };
        Ok(AdminUserUpdate {
            full_name: self.full_name.trim().to_string(),
            company: self.company.trim().to_string(),
            wage,
            role: self.role,
        })
    }

    pub async fn submit(&mut self, admin: &AdminFacade) -> Result<User, PageError> {
        let update = self.to_update()?;
        self.status = FormStatus::Saving;
        let saved = admin.update_user(self.user_id, &update).await;
        self.status = FormStatus::Idle;
        Ok(saved?)
    }
}

#[cfg(test)]
mod admin_user_form_tests {
    use super::*;
    use crate::test_support::fixtures::entities::UserBuilder;
    use rstest::rstest;

    #[rstest]
    fn it_should_send_a_null_wage_when_blank() {
        let form = AdminUserForm::from_user(&UserBuilder::new(2, "bo@example.com").build());
        assert_eq!(form.to_update().unwrap().wage, None);
    }

    #[rstest]
    fn it_should_parse_a_typed_wage_and_keep_the_role() {
        let mut form = AdminUserForm::from_user(&UserBuilder::new(2, "bo@example.com").admin().build());
        form.wage = "18".into();
        let update = form.to_update().unwrap();
        assert_eq!(update.wage, Some(18.0));
        assert_eq!(update.role, Role::Admin);
    }

    #[rstest]
    fn it_should_reject_an_unreadable_wage() {
        let mut form = AdminUserForm::from_user(&UserBuilder::new(2, "bo@example.com").build());
        form.wage = "lots".into();
        assert!(matches!(form.to_update(), Err(FormError::NotANumber { field: "wage", .. })));
    }
}
