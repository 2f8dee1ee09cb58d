use crate::application::errors::PageError;
use crate::application::facades::api::TimesheetApi;
use crate::application::forms::hotel_form::HotelForm;
use crate::application::pages::owned_records::OwnedRecords;
use crate::core::entities::hotel::Hotel;
use crate::core::entities::id::Id;
use tracing::info;

/// Hotels the user has stayed at, newest first.
pub struct HotelsPage {
    records: OwnedRecords<Hotel>,
}

impl HotelsPage {
    pub fn new(api: &TimesheetApi) -> Self {
        Self {
            records: OwnedRecords::new(api.auth.clone(), api.hotels.clone()),
        }
    }

    pub fn hotels(&self) -> &[Hotel] {
        self.records.items()
    }

    pub async fn load(&mut self) -> Result<&[Hotel], PageError> {
        Ok(self.records.load().await?)
    }

    pub fn edit_form(&self, id: Id) -> Option<HotelForm> {
        self.hotels().iter().find(|h| h.id == id).map(HotelForm::edit)
    }

    pub async fn save(&mut self, form: &mut HotelForm) -> Result<Hotel, PageError> {
        let saved = form.submit(self.records.facade()).await?;
        info!(id = saved.id, name = %saved.name, "hotel saved");
        self.records.load().await?;
        Ok(saved)
    }

    pub async fn delete(&mut self, id: Id) -> Result<(), PageError> {
        self.records.delete(id).await
    }
}

#[cfg(test)]
mod hotels_page_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_backend::InMemoryBackend;
    use crate::adapters::in_memory::in_memory_token_store::InMemoryTokenStore;
    use crate::application::config::ClientConfig;
    use crate::application::errors::FormError;
    use crate::core::ports::Method;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::sync::Arc;

    #[fixture]
    fn before_each() -> (Arc<InMemoryBackend>, HotelsPage) {
        let backend = Arc::new(
            InMemoryBackend::new()
                .with_user(json!({"id": 1, "email": "ana@example.com"}))
                .with_record("hotels", json!({"id": 4, "name": "Seaside Inn", "created_by": "ana@example.com", "created_date": "2024-01-05T00:00:00Z"})),
        );
        let api = TimesheetApi::connect(
            ClientConfig::new("http://backend.test").unwrap(),
            backend.clone(),
            Arc::new(InMemoryTokenStore::with_token("tok")),
        );
        (backend, HotelsPage::new(&api))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_add_a_hotel_and_reload(before_each: (Arc<InMemoryBackend>, HotelsPage)) {
        let (_, mut page) = before_each;
        page.load().await.unwrap();
        let mut form = HotelForm {
            name: "Harbour Lodge".into(),
            address: "1 Quay St".into(),
            ..HotelForm::create()
        };
        page.save(&mut form).await.unwrap();
        assert_eq!(page.hotels()[0].name, "Harbour Lodge");
        assert_eq!(page.hotels().len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_send_a_nameless_hotel(before_each: (Arc<InMemoryBackend>, HotelsPage)) {
        let (backend, mut page) = before_each;
        let mut form = HotelForm::create();
        let error = page.save(&mut form).await.unwrap_err();
        assert!(matches!(error, PageError::Form(FormError::Required("name"))));
        assert_eq!(backend.count_requests(Method::Post, "hotels").await, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_delete_and_reload(before_each: (Arc<InMemoryBackend>, HotelsPage)) {
        let (_, mut page) = before_each;
        page.load().await.unwrap();
        page.delete(4).await.unwrap();
        assert!(page.hotels().is_empty());
    }
}
