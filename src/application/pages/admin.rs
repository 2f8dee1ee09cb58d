use crate::application::errors::PageError;
use crate::application::facades::admin::AdminFacade;
use crate::application::facades::api::TimesheetApi;
use crate::application::forms::user_form::AdminUserForm;
use crate::core::entities::id::Id;
use crate::core::entities::user::{Role, User};
use tracing::info;

/// User management. Only admins get a successful `load`.
pub struct AdminPage {
    admin: AdminFacade,
    users: Vec<User>,
}

impl AdminPage {
    pub fn new(api: &TimesheetApi) -> Self {
        Self {
            admin: api.admin.clone(),
            users: Vec::new(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub async fn load(&mut self) -> Result<&[User], PageError> {
        self.users = self.admin.list_users().await?;
        Ok(&self.users)
    }

    pub async fn edit_form(&self, id: Id) -> Result<AdminUserForm, PageError> {
        AdminUserForm::load(&self.admin, id).await
    }

    pub async fn save(&mut self, form: &mut AdminUserForm) -> Result<User, PageError> {
        let saved = form.submit(&self.admin).await?;
        info!(id = saved.id, "user updated");
        self.load().await?;
        Ok(saved)
    }

    /// Role changes go through the full update so the other profile fields survive.
    pub async fn change_role(&mut self, id: Id, role: Role) -> Result<User, PageError> {
        let mut form = self.edit_form(id).await?;
        form.role = role;
        let saved = self.save(&mut form).await?;
        info!(id, role = role.as_str(), "role changed");
        Ok(saved)
    }

    pub async fn delete(&mut self, id: Id) -> Result<(), PageError> {
        self.admin.delete_user(id).await?;
        info!(id, "user deleted");
        self.load().await?;
        Ok(())
    }
}
