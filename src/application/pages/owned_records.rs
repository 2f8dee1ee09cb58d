// List pages over one of the user's own CRUD collections (projects, hotels).
//
// Purpose
// - Fetch the signed-in user, then every record they created, newest first.
//
// Responsibilities
// - Keep the last fetched copy and hand it out read-only.
// - Re-fetch after every mutation.
//
// Testing guidance
// - Drive it through `InMemoryBackend`; the owner filter is applied server side.

use crate::application::errors::{ApiError, PageError};
use crate::application::facades::auth::AuthFacade;
use crate::application::facades::entity::EntityFacade;
use crate::application::query::Query;
use crate::core::entities::id::Id;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

pub const NEWEST_FIRST: &str = "-created_date";

pub struct OwnedRecords<T> {
    auth: AuthFacade,
    facade: EntityFacade<T>,
    items: Vec<T>,
    loaded: bool,
}

impl<T: DeserializeOwned> OwnedRecords<T> {
    pub fn new(auth: AuthFacade, facade: EntityFacade<T>) -> Self {
        Self {
            auth,
            facade,
            items: Vec::new(),
            loaded: false,
        }
    }

    pub fn facade(&self) -> &EntityFacade<T> {
        &self.facade
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub async fn load(&mut self) -> Result<&[T], ApiError> {
        let me = self.auth.me().await?;
        let items = self
            .facade
            .filter(
                Query::new().with("created_by", me.email.as_str()),
                Some(NEWEST_FIRST),
            )
            .await?;
        debug!(resource = self.facade.resource(), count = items.len(), "records loaded");
        self.items = items;
        self.loaded = true;
        Ok(&self.items)
    }

    pub async fn delete(&mut self, id: Id) -> Result<(), PageError> {
        self.facade.remove(id).await?;
        info!(resource = self.facade.resource(), id, "record deleted");
        self.load().await?;
        Ok(())
    }
}
