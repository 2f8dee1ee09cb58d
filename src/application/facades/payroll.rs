use crate::application::errors::ApiError;
use crate::application::http_client::ApiClient;
use crate::core::entities::earnings::{PayrollCalculation, PayrollRequest};
use crate::core::ports::Method;

/// What-if payroll figures for a gross amount. The tax rules live in the backend.
#[derive(Clone)]
pub struct PayrollFacade {
    client: ApiClient,
}

impl PayrollFacade {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn calc(&self, request: &PayrollRequest) -> Result<PayrollCalculation, ApiError> {
        self.client
            .send_json(Method::Post, "/payroll/calc", request)
            .await
    }
}
