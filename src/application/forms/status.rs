use crate::application::errors::FormError;
use crate::core::entities::id::Id;

/// Where a form is in its lifecycle; drives the disabled state of its buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Loading,
    Saving,
}

impl FormStatus {
    pub fn is_busy(&self) -> bool {
        !matches!(self, FormStatus::Idle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(Id),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

pub(crate) fn required(field: &'static str, raw: &str) -> Result<String, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FormError::Required(field));
    }
    Ok(value.to_string())
}

/// Hours and amounts typed as text. Blank counts as zero.
pub(crate) fn non_negative(field: &'static str, raw: &str) -> Result<f64, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    let number: f64 = value.parse().map_err(|_| FormError::NotANumber {
        field,
        value: value.to_string(),
    })?;
    if !number.is_finite() {
        return Err(FormError::NotANumber {
            field,
            value: value.to_string(),
        });
    }
    if number < 0.0 {
        return Err(FormError::Negative { field });
    }
    Ok(number)
}

pub(crate) fn format_number(value: f64) -> String {
    format!("{value}")
}

pub(crate) fn optional_text(raw: &str) -> Option<String> {
    Some(raw.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod form_status_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", Ok(0.0))]
    #[case(" 7.5 ", Ok(7.5))]
    #[case("8", Ok(8.0))]
    #[case("-1", Err(FormError::Negative { field: "hours" }))]
    #[case("abc", Err(FormError::NotANumber { field: "hours", value: "abc".into() }))]
    #[case("NaN", Err(FormError::NotANumber { field: "hours", value: "NaN".into() }))]
    fn it_should_parse_hour_fields(#[case] raw: &str, #[case] expected: Result<f64, FormError>) {
        assert_eq!(non_negative("hours", raw), expected);
    }

    #[rstest]
    fn it_should_require_non_blank_text() {
        assert_eq!(required("name", "   "), Err(FormError::Required("name")));
        assert_eq!(required("name", " Bridge "), Ok("Bridge".to_string()));
    }

    #[rstest]
    #[case(8.0, "8")]
    #[case(7.5, "7.5")]
    #[case(0.25, "0.25")]
    fn it_should_format_numbers_without_trailing_zeros(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_number(value), expected);
    }

    #[rstest]
    fn it_should_only_report_busy_when_not_idle() {
        assert!(!FormStatus::Idle.is_busy());
        assert!(FormStatus::Loading.is_busy());
        assert!(FormStatus::Saving.is_busy());
    }
}
