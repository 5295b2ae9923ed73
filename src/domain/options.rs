use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which adjacent-month filler days are shown around the viewed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncludeDays {
    None,
    PreviousMonth,
    NextMonth,
    All,
}

impl IncludeDays {
    pub fn shows_previous(self) -> bool {
        matches!(self, IncludeDays::All | IncludeDays::PreviousMonth)
    }

    pub fn shows_next(self) -> bool {
        matches!(self, IncludeDays::All | IncludeDays::NextMonth)
    }
}

impl fmt::Display for IncludeDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IncludeDays::None => "none",
            IncludeDays::PreviousMonth => "previous-month",
            IncludeDays::NextMonth => "next-month",
            IncludeDays::All => "all",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for IncludeDays {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(IncludeDays::None),
            "previous-month" => Ok(IncludeDays::PreviousMonth),
            "next-month" => Ok(IncludeDays::NextMonth),
            "all" => Ok(IncludeDays::All),
            other => Err(format!(
                "unknown value '{}', expected none, previous-month, next-month or all",
                other
            )),
        }
    }
}

/// Caller-supplied configuration. Every field left as `None` keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickerOptions {
    pub close_on_click_outside: Option<bool>,
    pub close_on_selection: Option<bool>,
    pub include_days: Option<IncludeDays>,
    pub include_next_months_first_full_week: Option<bool>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub display_format: Option<String>,
    pub bar_title_format: Option<String>,
    pub day_names_format: Option<String>,
    pub bar_title_if_empty: Option<String>,
    pub select_range: Option<bool>,
    pub range_separator: Option<String>,
    pub first_calendar_day: Option<u8>,
    pub locale: Option<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub placeholder: Option<String>,
    pub field_id: Option<String>,
    pub use_empty_bar_title: Option<bool>,
}

impl PickerOptions {
    /// Layers `other` on top of `self`: keys set in `other` win.
    pub fn overlay(self, other: PickerOptions) -> PickerOptions {
        PickerOptions {
            close_on_click_outside: other.close_on_click_outside.or(self.close_on_click_outside),
            close_on_selection: other.close_on_selection.or(self.close_on_selection),
            include_days: other.include_days.or(self.include_days),
            include_next_months_first_full_week: other
                .include_next_months_first_full_week
                .or(self.include_next_months_first_full_week),
            min_year: other.min_year.or(self.min_year),
            max_year: other.max_year.or(self.max_year),
            display_format: other.display_format.or(self.display_format),
            bar_title_format: other.bar_title_format.or(self.bar_title_format),
            day_names_format: other.day_names_format.or(self.day_names_format),
            bar_title_if_empty: other.bar_title_if_empty.or(self.bar_title_if_empty),
            select_range: other.select_range.or(self.select_range),
            range_separator: other.range_separator.or(self.range_separator),
            first_calendar_day: other.first_calendar_day.or(self.first_calendar_day),
            locale: other.locale.or(self.locale),
            min_date: other.min_date.or(self.min_date),
            max_date: other.max_date.or(self.max_date),
            placeholder: other.placeholder.or(self.placeholder),
            field_id: other.field_id.or(self.field_id),
            use_empty_bar_title: other.use_empty_bar_title.or(self.use_empty_bar_title),
        }
    }
}

/// Fully resolved configuration consumed by the grid builder and the picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveOptions {
    pub close_on_click_outside: bool,
    pub close_on_selection: bool,
    pub include_days: IncludeDays,
    pub include_next_months_first_full_week: bool,
    pub min_year: i32,
    pub max_year: i32,
    pub display_format: String,
    pub bar_title_format: String,
    pub day_names_format: String,
    pub bar_title_if_empty: String,
    pub select_range: bool,
    pub range_separator: String,
    pub first_calendar_day: u8,
    pub locale: String,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub placeholder: String,
    pub field_id: String,
    pub use_empty_bar_title: bool,
}

impl EffectiveOptions {
    pub fn defaults(field_id: impl Into<String>) -> Self {
        Self {
            close_on_click_outside: true,
            close_on_selection: true,
            include_days: IncludeDays::PreviousMonth,
            include_next_months_first_full_week: false,
            min_year: 1970,
            max_year: 2030,
            display_format: "%b %d, %Y".to_string(),
            bar_title_format: "%B %Y".to_string(),
            day_names_format: "%a".to_string(),
            bar_title_if_empty: "Click to select a date".to_string(),
            select_range: false,
            range_separator: "-".to_string(),
            first_calendar_day: 0,
            locale: "en-US".to_string(),
            min_date: None,
            max_date: None,
            placeholder: String::new(),
            field_id: field_id.into(),
            use_empty_bar_title: true,
        }
    }

    /// Whether `date` lies within the configured `[min_date, max_date]` bounds.
    /// Both bounds must hold; an absent bound leaves that side open.
    pub fn in_bounds(&self, date: NaiveDate) -> bool {
        let above_min = self.min_date.is_none_or(|min| date >= min);
        let below_max = self.max_date.is_none_or(|max| date <= max);
        above_min && below_max
    }
}

/// Shallow merge of `overrides` onto `defaults`. Combinations such as
/// `min_year > max_year` are not rejected.
pub fn resolve(defaults: &EffectiveOptions, overrides: &PickerOptions) -> EffectiveOptions {
    let overrides = overrides.clone();
    let defaults = defaults.clone();
    EffectiveOptions {
        close_on_click_outside: overrides
            .close_on_click_outside
            .unwrap_or(defaults.close_on_click_outside),
        close_on_selection: overrides.close_on_selection.unwrap_or(defaults.close_on_selection),
        include_days: overrides.include_days.unwrap_or(defaults.include_days),
        include_next_months_first_full_week: overrides
            .include_next_months_first_full_week
            .unwrap_or(defaults.include_next_months_first_full_week),
        min_year: overrides.min_year.unwrap_or(defaults.min_year),
        max_year: overrides.max_year.unwrap_or(defaults.max_year),
        display_format: overrides.display_format.unwrap_or(defaults.display_format),
        bar_title_format: overrides.bar_title_format.unwrap_or(defaults.bar_title_format),
        day_names_format: overrides.day_names_format.unwrap_or(defaults.day_names_format),
        bar_title_if_empty: overrides.bar_title_if_empty.unwrap_or(defaults.bar_title_if_empty),
        select_range: overrides.select_range.unwrap_or(defaults.select_range),
        range_separator: overrides.range_separator.unwrap_or(defaults.range_separator),
        first_calendar_day: overrides
            .first_calendar_day
            .map(|day| day % 7)
            .unwrap_or(defaults.first_calendar_day),
        locale: overrides.locale.unwrap_or(defaults.locale),
        min_date: overrides.min_date.or(defaults.min_date),
        max_date: overrides.max_date.or(defaults.max_date),
        placeholder: overrides.placeholder.unwrap_or(defaults.placeholder),
        field_id: overrides.field_id.unwrap_or(defaults.field_id),
        use_empty_bar_title: overrides.use_empty_bar_title.unwrap_or(defaults.use_empty_bar_title),
    }
}

/// Hands out `datepicker-N` field IDs. Owned by whoever constructs pickers,
/// so independent compositions never share a counter.
#[derive(Debug, Default)]
pub struct FieldIds {
    next: u32,
}

impl FieldIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("datepicker-{}", self.next);
        self.next += 1;
        id
    }
}
