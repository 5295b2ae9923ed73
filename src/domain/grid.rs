use crate::domain::calendar::{each_day, month_end, month_start, shift_days, weekday_index};
use crate::domain::day::{Day, DayContext};
use crate::domain::options::EffectiveOptions;
use crate::infrastructure::DateFormat;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCell {
    pub year: i32,
    pub is_this_year: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCell {
    /// 1-based
    pub month: u32,
    pub name: String,
    pub is_selected: bool,
}

/// Lays out the viewed month as whole weeks.
///
/// Filler days from the adjacent months are always present so the grid starts
/// on `first_calendar_day`; `include_days` only decides whether they are
/// visible. With `include_next_months_first_full_week` and visible trailing
/// days, one extra week of the next month is appended.
pub fn build_grid(ctx: &DayContext<'_>) -> Vec<Day> {
    let options = ctx.options;
    let first = month_start(ctx.viewing);
    let last = month_end(ctx.viewing);

    let leading = weekday_index(first, options.first_calendar_day);
    let mut trailing = 6 - weekday_index(last, options.first_calendar_day);
    if options.include_days.shows_next() && options.include_next_months_first_full_week {
        trailing += 7;
    }

    let show_previous = options.include_days.shows_previous();
    let show_next = options.include_days.shows_next();

    // Fillers past the calendar edge are dropped rather than wrapped
    let previous = (1..=leading as i64)
        .rev()
        .filter_map(|offset| shift_days(first, -offset))
        .map(|date| Day::format(date, ctx, show_previous));
    let current = each_day(first, last).map(|date| Day::format(date, ctx, true));
    let next = (1..=trailing as i64)
        .filter_map(|offset| shift_days(last, offset))
        .map(|date| Day::format(date, ctx, show_next));

    previous.chain(current).chain(next).collect()
}

/// Years offered by the year drill-down, `min_year..=max_year`. Empty when the
/// bounds are inverted.
pub fn build_years(options: &EffectiveOptions, viewing: NaiveDate) -> Vec<YearCell> {
    (options.min_year..=options.max_year)
        .map(|year| YearCell {
            year,
            is_this_year: year == viewing.year(),
        })
        .collect()
}

pub fn build_months(
    options: &EffectiveOptions,
    viewing: NaiveDate,
    formatter: &dyn DateFormat,
) -> Vec<MonthCell> {
    (1..=12)
        .filter_map(|month| NaiveDate::from_ymd_opt(viewing.year(), month, 1))
        .map(|date| MonthCell {
            month: date.month(),
            name: formatter.format(date, "%b", &options.locale),
            is_selected: date.month() == viewing.month(),
        })
        .collect()
}

/// Weekday header labels, starting at `first_calendar_day`.
pub fn build_day_names(
    options: &EffectiveOptions,
    viewing: NaiveDate,
    formatter: &dyn DateFormat,
) -> Vec<String> {
    let from_sunday = viewing.weekday().num_days_from_sunday() as i64;
    let first_day = (options.first_calendar_day % 7) as i64;
    (0..7)
        .map(|column| {
            let offset = first_day + column - from_sunday;
            // Near the calendar edge the same weekday is taken from an adjacent week
            let date = shift_days(viewing, offset)
                .or_else(|| shift_days(viewing, offset.rem_euclid(7)))
                .or_else(|| shift_days(viewing, offset.rem_euclid(7) - 7))
                .unwrap_or(viewing);
            formatter.format(date, &options.day_names_format, &options.locale)
        })
        .collect()
}
