use crate::domain::calendar::same_month;
use crate::domain::options::EffectiveOptions;
use crate::domain::range::Selection;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One cell of the month grid. Rebuilt from scratch on every state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub date: NaiveDate,
    pub day: u32,
    /// 1-based
    pub month: u32,
    pub year: i32,
    pub in_this_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_in_range: bool,
    pub is_selectable: bool,
    pub is_start: bool,
    pub is_end: bool,
    pub is_visible: bool,
}

/// Everything a [`Day`] is measured against.
#[derive(Debug, Clone, Copy)]
pub struct DayContext<'a> {
    pub viewing: NaiveDate,
    pub today: NaiveDate,
    pub selection: &'a Selection,
    pub options: &'a EffectiveOptions,
}

impl Day {
    /// Builds the cell for `date`. Hidden cells carry no highlight flags.
    pub fn format(date: NaiveDate, ctx: &DayContext<'_>, is_visible: bool) -> Self {
        let start = ctx.selection.start();
        let end = ctx.selection.end();

        let is_selected = is_visible && (start == Some(date) || end == Some(date));
        let in_range = ctx.selection.to_range().is_some_and(|range| range.contains(date));

        Self {
            date,
            day: date.day(),
            month: date.month(),
            year: date.year(),
            in_this_month: same_month(date, ctx.viewing),
            is_today: is_visible && date == ctx.today,
            is_selected,
            is_in_range: is_visible && in_range,
            is_selectable: is_visible && ctx.options.in_bounds(date),
            is_start: is_visible && start.is_none_or(|s| s == date),
            is_end: is_visible && end.is_none_or(|e| e == date),
            is_visible,
        }
    }
}
