use crate::application::errors::ApiError;
use crate::application::http_client::ApiClient;
use crate::application::query::Query;
use crate::core::entities::earnings::Payslip;
use crate::core::entities::receipt::UploadFile;
use crate::core::ports::FormPart;
use chrono::NaiveDate;

#[derive(Clone)]
pub struct PayslipsFacade {
    client: ApiClient,
}

impl PayslipsFacade {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Uploads the payslip document for the week starting on `week_start`.
    /// The backend extracts the figures and answers with the stored payslip.
    pub async fn upload(&self, week_start: NaiveDate, file: UploadFile) -> Result<Payslip, ApiError> {
        let parts = vec![
            FormPart::Text {
                name: "week_start".into(),
                value: week_start.to_string(),
            },
            FormPart::File {
                name: "file".into(),
                file_name: file.file_name,
                content_type: file.content_type,
                bytes: file.bytes,
            },
        ];
        self.client.post_multipart("/payslips/upload", parts).await
    }

    /// `None` when no payslip was uploaded for that week.
    pub async fn for_week(&self, week_start: NaiveDate) -> Result<Option<Payslip>, ApiError> {
        self.client
            .get_json(
                "/payslips/for-week",
                &Query::new().with("week_start", week_start.to_string()),
            )
            .await
    }
}

#[cfg(test)]
mod payslips_facade_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_backend::InMemoryBackend;
    use crate::adapters::in_memory::in_memory_token_store::InMemoryTokenStore;
    use crate::application::config::ClientConfig;
    use crate::core::ports::{Method, RequestBody};
    use rstest::{fixture, rstest};
    use serde_json::{Value as Json, json};
    use std::sync::Arc;

    #[fixture]
    fn before_each() -> (Arc<InMemoryBackend>, PayslipsFacade) {
        let backend = Arc::new(InMemoryBackend::new());
        let client = ApiClient::new(
            ClientConfig::new("http://backend.test").unwrap(),
            backend.clone(),
            Arc::new(InMemoryTokenStore::new()),
        );
        (backend, PayslipsFacade::new(client))
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_none_for_weeks_without_a_payslip(
        before_each: (Arc<InMemoryBackend>, PayslipsFacade),
    ) {
        let (backend, payslips) = before_each;
        backend.stub(Method::Get, "payslips/for-week", Json::Null).await;
        assert_eq!(payslips.for_week(monday()).await.unwrap(), None);
        assert_eq!(
            backend.requests().await[0].query_value("week_start"),
            Some("2024-04-01")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_retry_an_upload_once_after_a_401(
        before_each: (Arc<InMemoryBackend>, PayslipsFacade),
    ) {
        let (backend, payslips) = before_each;
        backend
            .stub(Method::Post, "payslips/upload", json!({"id": 3, "week_start": "2024-04-01", "gross_pay": 500}))
            .await;
        backend.fail_next(401, 1).await;

        let payslip = payslips
            .upload(monday(), UploadFile::new("slip.pdf", b"%PDF".to_vec()))
            .await
            .unwrap();
        assert_eq!(payslip.figures.gross_pay, 500.0);

        let uploads: Vec<_> = backend
            .requests()
            .await
            .into_iter()
            .filter(|r| r.path == "payslips/upload")
            .collect();
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].body, uploads[1].body);
        assert!(matches!(uploads[1].body, RequestBody::Multipart(ref parts) if parts.len() == 2));
    }
}
