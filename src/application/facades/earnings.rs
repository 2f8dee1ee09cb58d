use crate::application::errors::ApiError;
use crate::application::http_client::ApiClient;
use crate::application::query::Query;
use crate::core::entities::earnings::{WeeklyEarnings, YtdEarnings};
use crate::core::ports::{Method, RequestBody};
use chrono::NaiveDate;
use serde_json::Value as Json;

#[derive(Clone)]
pub struct EarningsFacade {
    client: ApiClient,
}

impl EarningsFacade {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn for_week(&self, week_start: NaiveDate) -> Result<Option<WeeklyEarnings>, ApiError> {
        self.client
            .get_json(
                "/earnings/for-week",
                &Query::new().with("week_start", week_start.to_string()),
            )
            .await
    }

    /// Asks the backend to rebuild weekly earnings from the logged hours.
    pub async fn recalculate(&self) -> Result<Json, ApiError> {
        self.client
            .request(Method::Post, "/earnings/recalculate", &Query::new(), RequestBody::Empty)
            .await
    }

    /// Year-to-date totals; `None` when the backend has nothing yet.
    pub async fn ytd(&self) -> Result<Option<YtdEarnings>, ApiError> {
        self.client.get_json("/earnings/ytd", &Query::new()).await
    }
}

#[cfg(test)]
mod earnings_facade_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_backend::InMemoryBackend;
    use crate::adapters::in_memory::in_memory_token_store::InMemoryTokenStore;
    use crate::application::config::ClientConfig;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::sync::Arc;

    #[fixture]
    fn before_each() -> (Arc<InMemoryBackend>, EarningsFacade) {
        let backend = Arc::new(InMemoryBackend::new());
        let client = ApiClient::new(
            ClientConfig::new("http://backend.test").unwrap(),
            backend.clone(),
            Arc::new(InMemoryTokenStore::new()),
        );
        (backend, EarningsFacade::new(client))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_read_weekly_earnings(before_each: (Arc<InMemoryBackend>, EarningsFacade)) {
        let (backend, earnings) = before_each;
        backend
            .stub(
                Method::Get,
                "earnings/for-week",
                json!({"week_start": "2024-04-01", "hours": "37.5", "gross_pay": 450, "net_pay": "380.20"}),
            )
            .await;
        let week = earnings
            .for_week(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(week.hours, 37.5);
        assert_eq!(week.figures.net_pay, 380.2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_post_recalculations(before_each: (Arc<InMemoryBackend>, EarningsFacade)) {
        let (backend, earnings) = before_each;
        backend
            .stub(Method::Post, "earnings/recalculate", json!({"updated": 4}))
            .await;
        assert_eq!(earnings.recalculate().await.unwrap()["updated"], 4);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_accept_a_missing_ytd(before_each: (Arc<InMemoryBackend>, EarningsFacade)) {
        let (backend, earnings) = before_each;
        backend.stub(Method::Get, "earnings/ytd", Json::Null).await;
        assert_eq!(earnings.ytd().await.unwrap(), None);
    }
}
