use chrono::{Datelike, Days, Months, NaiveDate};

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`. Safe up to `NaiveDate::MAX`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let last = match date.month() {
        12 => NaiveDate::from_ymd_opt(date.year(), 12, 31),
        month => NaiveDate::from_ymd_opt(date.year(), month + 1, 1)
            .and_then(|next| next.pred_opt()),
    };
    last.unwrap_or(date)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    month_end(date).day()
}

/// Every calendar day from `start` to `end`, inclusive. Empty when `end < start`.
pub fn each_day(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let count = (end - start).num_days() + 1;
    (0..count.max(0)).map_while(move |i| start.checked_add_days(Days::new(i as u64)))
}

/// `date` moved by `days` in either direction, `None` past the calendar edge.
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Shifts `date` by whole months, clamping the day to the target month's length.
pub fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let shifted = if delta >= 0 {
        date.checked_add_months(Months::new(delta as u32))
    } else {
        date.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Column of `date` in a week that starts on `first_day` (0 = Sunday).
pub fn weekday_index(date: NaiveDate, first_day: u8) -> u32 {
    let index = date.weekday().num_days_from_sunday() as i32 - (first_day % 7) as i32;
    if index < 0 { (index + 7) as u32 } else { index as u32 }
}

/// Same month and day in `year`; Feb 29 becomes Feb 28 outside leap years.
pub fn with_year_clamped(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(year, date.month(), 1)?;
    start.with_day(date.day().min(days_in_month(start)))
}

/// Same year and day in `month` (1-based), clamped to the month's length.
pub fn with_month_clamped(date: NaiveDate, month: u32) -> Option<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(date.year(), month, 1)?;
    start.with_day(date.day().min(days_in_month(start)))
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
