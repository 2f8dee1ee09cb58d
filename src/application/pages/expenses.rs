use crate::application::errors::PageError;
use crate::application::facades::api::TimesheetApi;
use crate::application::facades::expenses::ExpensesFacade;
use crate::application::forms::expense_form::ExpenseForm;
use crate::core::entities::expense::{Expense, ExpenseSummaryRow, SummaryGrouping};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Bucket key the backend uses for a month, e.g. `2024-03`.
pub fn month_bucket(day: NaiveDate) -> String {
    day.format("%Y-%m").to_string()
}

/// Bucket key the backend uses for an ISO week, e.g. `2024-10`.
pub fn week_bucket(day: NaiveDate) -> String {
    day.format("%G-%V").to_string()
}

fn bucket_total(rows: &[ExpenseSummaryRow], key: &str) -> Option<f64> {
    rows.iter().find(|r| r.bucket == key).and_then(|r| r.total)
}

/// Expense list with "this week" and "this month" totals.
pub struct ExpensesPage {
    expenses: ExpensesFacade,
    items: Vec<Expense>,
    this_week: Option<f64>,
    this_month: Option<f64>,
}

impl ExpensesPage {
    pub fn new(api: &TimesheetApi) -> Self {
        Self {
            expenses: api.expenses.clone(),
            items: Vec::new(),
            this_week: None,
            this_month: None,
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.items
    }

    /// `None` when the backend has no bucket for the current week.
    pub fn this_week(&self) -> Option<f64> {
        self.this_week
    }

    pub fn this_month(&self) -> Option<f64> {
        self.this_month
    }

    pub async fn load(&mut self, today: NaiveDate) -> Result<&[Expense], PageError> {
        let items = self.expenses.list(None, None).await?;
        let monthly = self
            .expenses
            .summary(SummaryGrouping::Month, None, None)
            .await?;
        let weekly = self
            .expenses
            .summary(SummaryGrouping::Week, None, None)
            .await?;

        self.this_month = bucket_total(&monthly, &month_bucket(today));
        self.this_week = bucket_total(&weekly, &week_bucket(today));
        debug!(
            count = items.len(),
            this_week = ?self.this_week,
            this_month = ?self.this_month,
            "expenses loaded"
        );
        self.items = items;
        Ok(&self.items)
    }

    pub async fn save(&mut self, form: &mut ExpenseForm, today: NaiveDate) -> Result<Expense, PageError> {
        let saved = form.submit(&self.expenses).await?;
        info!(id = saved.id, "expense saved");
        self.load(today).await?;
        Ok(saved)
    }
}
