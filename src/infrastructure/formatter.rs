use chrono::NaiveDate;
use std::fmt::Write;

/// Renders a date for display. `locale` is passed through untouched so a
/// locale-aware implementation can be swapped in by the host.
pub trait DateFormat {
    fn format(&self, date: NaiveDate, pattern: &str, locale: &str) -> String;
}

/// strftime rendering via chrono with English month and weekday names.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrftimeFormatter;

impl DateFormat for StrftimeFormatter {
    fn format(&self, date: NaiveDate, pattern: &str, _locale: &str) -> String {
        let mut out = String::new();
        // Unknown specifiers and time fields surface as fmt errors
        if write!(out, "{}", date.format(pattern)).is_err() {
            log::warn!("Invalid date pattern '{}', falling back to ISO format", pattern);
            return date.format("%Y-%m-%d").to_string();
        }
        out
    }
}
