// Receipt gallery filtered by period.
//
// Purpose
// - Turn a period choice into a start/end pair and list the receipts in it.
//
// Responsibilities
// - Prefetch the image bytes of the first few receipts one after another.
//   A failed prefetch is logged and skipped.
// - Upload and delete, re-fetching afterwards.
//
// Boundaries
// - The week filter runs Sunday to Saturday. The week view starts on Monday instead.

use crate::application::errors::{FormError, PageError};
use crate::application::facades::api::TimesheetApi;
use crate::application::facades::receipts::{DateRange, ReceiptsFacade};
use crate::core::entities::id::Id;
use crate::core::entities::receipt::{Receipt, UploadFile};
use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub const PREFETCH_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFilter {
    Specific(NaiveDate),
    Week(NaiveDate),
    Month(NaiveDate),
    Year(NaiveDate),
}

impl PeriodFilter {
    /// Inclusive start and end dates sent to `/receipts`.
    pub fn range(&self) -> DateRange {
        match *self {
            PeriodFilter::Specific(day) => DateRange::between(day, day),
            PeriodFilter::Week(day) => {
                let back = u64::from(day.weekday().num_days_from_sunday());
                let sunday = day.checked_sub_days(Days::new(back)).unwrap_or(day);
                let saturday = sunday.checked_add_days(Days::new(6)).unwrap_or(sunday);
                DateRange::between(sunday, saturday)
            }
            PeriodFilter::Month(day) => {
                let first = day.with_day(1).unwrap_or(day);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(first);
                DateRange::between(first, last)
            }
            PeriodFilter::Year(day) => {
                let first = NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day);
                let last = NaiveDate::from_ymd_opt(day.year(), 12, 31).unwrap_or(day);
                DateRange::between(first, last)
            }
        }
    }

    pub fn date(&self) -> NaiveDate {
        match *self {
            PeriodFilter::Specific(d)
            | PeriodFilter::Week(d)
            | PeriodFilter::Month(d)
            | PeriodFilter::Year(d) => d,
        }
    }
}

pub struct ReceiptsPage {
    receipts: ReceiptsFacade,
    filter: PeriodFilter,
    items: Vec<Receipt>,
    files: HashMap<Id, Vec<u8>>,
}

impl ReceiptsPage {
    pub fn new(api: &TimesheetApi, today: NaiveDate) -> Self {
        Self {
            receipts: api.receipts.clone(),
            filter: PeriodFilter::Specific(today),
            items: Vec::new(),
            files: HashMap::new(),
        }
    }

    pub fn filter(&self) -> PeriodFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: PeriodFilter) {
        self.filter = filter;
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.items
    }

    /// Prefetched image bytes, if this receipt was among the first few.
    pub fn file(&self, id: Id) -> Option<&[u8]> {
        self.files.get(&id).map(Vec::as_slice)
    }

    pub async fn load(&mut self) -> Result<&[Receipt], PageError> {
        let range = self.filter.range();
        let items = self.receipts.list(range).await?;
        debug!(count = items.len(), ?range, "receipts loaded");

        let mut files = HashMap::new();
        for receipt in items.iter().take(PREFETCH_LIMIT) {
            match self.receipts.file(receipt.id).await {
                Ok(bytes) => {
                    files.insert(receipt.id, bytes);
                }
                Err(e) => warn!(id = receipt.id, error = %e, "receipt prefetch failed"),
            }
        }

        self.items = items;
        self.files = files;
        Ok(&self.items)
    }

    pub async fn upload(
        &mut self,
        entry_date: NaiveDate,
        files: Vec<UploadFile>,
    ) -> Result<(), PageError> {
        if files.is_empty() {
            return Err(FormError::Required("files").into());
        }
        let count = files.len();
        self.receipts.upload(entry_date, None, files).await?;
        info!(%entry_date, count, "receipts uploaded");
        self.load().await?;
        Ok(())
    }

    pub async fn delete(&mut self, id: Id) -> Result<(), PageError> {
        self.receipts.remove(id).await?;
        info!(id, "receipt deleted");
        self.load().await?;
        Ok(())
    }
}
