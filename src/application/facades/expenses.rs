use crate::application::errors::ApiError;
use crate::application::http_client::ApiClient;
use crate::application::query::Query;
use crate::core::entities::expense::{
    DailyExpenseTotal, Expense, ExpensePayload, ExpenseSummaryRow, SummaryGrouping,
};
use crate::core::entities::id::Id;
use crate::core::ports::Method;
use chrono::NaiveDate;

#[derive(Clone)]
pub struct ExpensesFacade {
    client: ApiClient,
}

fn range_query(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Query {
    Query::new()
        .with_opt("start", start.map(|d| d.to_string()))
        .with_opt("end", end.map(|d| d.to_string()))
}

impl ExpensesFacade {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Expense>, ApiError> {
        self.client
            .get_json("/expenses", &range_query(start, end))
            .await
    }

    pub async fn daily(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyExpenseTotal>, ApiError> {
        self.client
            .get_json("/expenses/daily", &range_query(Some(start), Some(end)))
            .await
    }

    pub async fn summary(
        &self,
        group_by: SummaryGrouping,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<ExpenseSummaryRow>, ApiError> {
        let query = Query::new()
            .with("group_by", group_by.as_str())
            .with_opt("start", start.map(|d| d.to_string()))
            .with_opt("end", end.map(|d| d.to_string()));
        self.client.get_json("/expenses/summary", &query).await
    }

    pub async fn create(&self, payload: &ExpensePayload) -> Result<Expense, ApiError> {
        self.client
            .send_json(Method::Post, "/expenses", payload)
            .await
    }

    pub async fn update(&self, id: Id, payload: &ExpensePayload) -> Result<Expense, ApiError> {
        self.client
            .send_json(Method::Put, &format!("/expenses/{id}"), payload)
            .await
    }
}
