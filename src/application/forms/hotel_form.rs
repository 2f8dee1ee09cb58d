use crate::application::errors::{FormError, PageError};
use crate::application::facades::entity::HotelsFacade;
use crate::application::forms::status::{FormMode, FormStatus, required};
use crate::core::entities::hotel::{Hotel, HotelPayload};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HotelForm {
    pub mode: FormMode,
    pub name: String,
    pub address: String,
    pub status: FormStatus,
}

impl HotelForm {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(hotel: &Hotel) -> Self {
        Self {
            mode: FormMode::Edit(hotel.id),
            name: hotel.name.clone(),
            address: hotel.address.clone().unwrap_or_default(),
            status: FormStatus::Idle,
        }
    }

    pub fn to_payload(&self) -> Result<HotelPayload, FormError> {
        Ok(HotelPayload {
            name: required("name", &self.name)?,
            address: self.address.trim().to_string(),
        })
    }

    pub async fn submit(&mut self, hotels: &HotelsFacade) -> Result<Hotel, PageError> {
        let payload = self.to_payload()?;
        self.status = FormStatus::Saving;
        let saved = match self.mode {
            FormMode::Create => hotels.create(&payload).await,
            FormMode::Edit(id) => hotels.update(id, &payload).await,
        };
        self.status = FormStatus::Idle;
        Ok(saved?)
    }
}
