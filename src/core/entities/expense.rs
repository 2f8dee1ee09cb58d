use crate::core::entities::amount::{amount, optional_amount};
use crate::core::entities::date::calendar_date;
use crate::core::entities::id::Id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseType {
    Food,
    Hygiene,
    Others,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 3] = [ExpenseType::Food, ExpenseType::Hygiene, ExpenseType::Others];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Food => "Food",
            ExpenseType::Hygiene => "Hygiene",
            ExpenseType::Others => "Others",
        }
    }
}

impl std::str::FromStr for ExpenseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown expense type: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Id,
    #[serde(deserialize_with = "calendar_date")]
    pub entry_date: NaiveDate,
    #[serde(default, alias = "vendor_name")]
    pub vendor: Option<String>,
    /// Free text on the wire; older rows predate the fixed set of types.
    #[serde(default)]
    pub expense_type: Option<String>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub receipt_id: Option<Id>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Expense {
    pub fn currency_or_default(&self) -> &str {
        self.currency.as_deref().unwrap_or("GBP")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpensePayload {
    pub entry_date: NaiveDate,
    pub vendor: String,
    pub expense_type: ExpenseType,
    pub total_amount: f64,
    pub receipt_id: Option<Id>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyExpenseTotal {
    #[serde(deserialize_with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "amount")]
    pub total: f64,
}

/// One bucket of `/expenses/summary`; `bucket` is `yyyy-mm` or `yyyy-ww`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpenseSummaryRow {
    pub bucket: String,
    #[serde(default, deserialize_with = "optional_amount")]
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryGrouping {
    Week,
    Month,
}

impl SummaryGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryGrouping::Week => "week",
            SummaryGrouping::Month => "month",
        }
    }
}
