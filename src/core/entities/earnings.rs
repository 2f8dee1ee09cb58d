// Payroll figures are computed by the backend (from uploaded payslips or from
// logged hours). The client only mirrors them for display.

use crate::core::entities::amount::amount;
use crate::core::entities::date::optional_calendar_date;
use crate::core::entities::id::Id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PayFigures {
    #[serde(default, deserialize_with = "amount")]
    pub gross_pay: f64,
    #[serde(default, deserialize_with = "amount")]
    pub paye_tax: f64,
    #[serde(default, deserialize_with = "amount")]
    pub national_insurance: f64,
    #[serde(default, deserialize_with = "amount")]
    pub pension: f64,
    #[serde(default, deserialize_with = "amount")]
    pub net_pay: f64,
}

impl PayFigures {
    pub fn deductions(&self) -> f64 {
        self.paye_tax + self.national_insurance + self.pension
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default, deserialize_with = "optional_calendar_date")]
    pub week_start: Option<NaiveDate>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(flatten)]
    pub figures: PayFigures,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyEarnings {
    #[serde(default, deserialize_with = "optional_calendar_date")]
    pub week_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "amount")]
    pub hours: f64,
    #[serde(flatten)]
    pub figures: PayFigures,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YtdEarnings {
    #[serde(flatten)]
    pub figures: PayFigures,
}

impl YtdEarnings {
    pub fn has_data(&self) -> bool {
        self.figures.gross_pay != 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriod {
    #[default]
    Weekly,
    Monthly,
}

/// Body of `POST /payroll/calc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollRequest {
    pub gross: f64,
    pub period: PayPeriod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pension_employee_percent: Option<f64>,
    pub use_profile: bool,
}

impl PayrollRequest {
    pub fn weekly(gross: f64) -> Self {
        Self {
            gross,
            period: PayPeriod::Weekly,
            region: None,
            pension_employee_percent: None,
            use_profile: true,
        }
    }
}

/// Answer of `POST /payroll/calc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollCalculation {
    #[serde(default)]
    pub period: Option<String>,
    #[serde(flatten)]
    pub figures: PayFigures,
}

#[cfg(test)]
mod earnings_tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn it_should_read_flattened_payslip_figures() {
        let payslip: Payslip = serde_json::from_value(json!({
            "id": 2,
            "week_start": "2024-04-01",
            "gross_pay": "500.00",
            "paye_tax": 60,
            "national_insurance": "20.5",
            "pension": 15,
            "net_pay": 404.5
        }))
        .unwrap();
        assert_eq!(payslip.figures.gross_pay, 500.0);
        assert_eq!(payslip.figures.deductions(), 95.5);
        assert_eq!(payslip.week_start, NaiveDate::from_ymd_opt(2024, 4, 1));
    }

    #[rstest]
    #[case(json!({"gross_pay": 0}), false)]
    #[case(json!({}), false)]
    #[case(json!({"gross_pay": "1200.10"}), true)]
    fn it_should_tell_whether_ytd_has_data(#[case] raw: serde_json::Value, #[case] expected: bool) {
        let ytd: YtdEarnings = serde_json::from_value(raw).unwrap();
        assert_eq!(ytd.has_data(), expected);
    }

    #[rstest]
    fn it_should_omit_unset_payroll_options() {
        let body = serde_json::to_value(PayrollRequest::weekly(400.0)).unwrap();
        assert_eq!(
            body,
            json!({"gross": 400.0, "period": "weekly", "use_profile": true})
        );
    }
}
