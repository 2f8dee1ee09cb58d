use crate::application::errors::PageError;
use crate::application::facades::api::TimesheetApi;
use crate::application::facades::earnings::EarningsFacade;
use crate::core::entities::earnings::{PayFigures, YtdEarnings};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum EarningsView {
    /// Nothing uploaded yet, or every figure is still zero.
    NoData,
    YearToDate(PayFigures),
}

/// Year-to-date earnings built from uploaded payslips.
pub struct EarningsPage {
    earnings: EarningsFacade,
    view: Option<EarningsView>,
}

impl EarningsPage {
    pub fn new(api: &TimesheetApi) -> Self {
        Self {
            earnings: api.earnings.clone(),
            view: None,
        }
    }

    /// `None` until `load` has succeeded once.
    pub fn view(&self) -> Option<&EarningsView> {
        self.view.as_ref()
    }

    pub async fn load(&mut self) -> Result<&EarningsView, PageError> {
        let ytd = self.earnings.ytd().await?;
        let view = match ytd {
            Some(YtdEarnings { figures }) if figures.gross_pay != 0.0 => {
                EarningsView::YearToDate(figures)
            }
            _ => EarningsView::NoData,
        };
        debug!(?view, "earnings loaded");
        Ok(self.view.insert(view))
    }
}
