use crate::application::errors::{FormError, PageError};
use crate::application::facades::expenses::ExpensesFacade;
use crate::application::forms::status::{FormMode, FormStatus, format_number, non_negative, required};
use crate::core::entities::expense::{Expense, ExpensePayload, ExpenseType};
use crate::core::entities::id::Id;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub mode: FormMode,
    pub entry_date: NaiveDate,
    pub vendor: String,
    pub expense_type: Option<ExpenseType>,
    pub total_amount: String,
    pub receipt_id: Option<Id>,
    pub status: FormStatus,
}

impl ExpenseForm {
    pub fn create(entry_date: NaiveDate) -> Self {
        Self {
            mode: FormMode::Create,
            entry_date,
            vendor: String::new(),
            expense_type: None,
            total_amount: String::new(),
            receipt_id: None,
            status: FormStatus::Idle,
        }
    }

    /// Unknown legacy types are left unselected so the user has to pick one.
    pub fn edit(expense: &Expense) -> Self {
        Self {
            mode: FormMode::Edit(expense.id),
            entry_date: expense.entry_date,
            vendor: expense.vendor.clone().unwrap_or_default(),
            expense_type: expense
                .expense_type
                .as_deref()
                .and_then(|t| t.parse().ok()),
            total_amount: expense.total_amount.map(format_number).unwrap_or_default(),
            receipt_id: expense.receipt_id,
            status: FormStatus::Idle,
        }
    }

    pub fn to_payload(&self) -> Result<ExpensePayload, FormError> {
        let vendor = required("vendor", &self.vendor)?;
        let expense_type = self.expense_type.ok_or(FormError::Required("expense type"))?;
        required("total amount", &self.total_amount)?;
        let total_amount = non_negative("total amount", &self.total_amount)?;
        Ok(ExpensePayload {
            entry_date: self.entry_date,
            vendor,
            expense_type,
            total_amount,
            receipt_id: self.receipt_id,
        })
    }

    pub async fn submit(&mut self, expenses: &ExpensesFacade) -> Result<Expense, PageError> {
        let payload = self.to_payload()?;
        self.status = FormStatus::Saving;
        let saved = match self.mode {
            FormMode::Create => expenses.create(&payload).await,
            FormMode::Edit(id) => expenses.update(id, &payload).await,
        };
        self.status = FormStatus::Idle;
        Ok(saved?)
    }
}
