//! Test fixtures shared by the unit tests.
//!
//! `TestPicker` wraps a [`Picker`](crate::application::Picker) pinned to a fixed
//! "today" and records every value it emits.
//!
//! ```rust,ignore
//! let mut test_picker = TestPicker::new();
//! test_picker.with_options(PickerOptions { select_range: Some(true), ..Default::default() });
//! test_picker.click(date(2024, 3, 5));
//! assert_eq!(test_picker.emitted().len(), 1);
//! ```
use crate::application::Picker;
use crate::domain::PickerOptions;
use crate::infrastructure::{FixedClock, PickerValue, StrftimeFormatter};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

pub const TODAY: (i32, u32, u32) = (2024, 3, 15);

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn today() -> NaiveDate {
    date(TODAY.0, TODAY.1, TODAY.2)
}

pub struct TestPicker {
    picker: Picker,
    emitted: Rc<RefCell<Vec<PickerValue>>>,
}

impl TestPicker {
    pub fn new() -> Self {
        let mut picker = Picker::with_collaborators(
            "datepicker-test",
            Box::new(FixedClock(today())),
            Box::new(StrftimeFormatter),
        );
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&emitted);
        picker.register_on_change(move |value: &PickerValue| {
            sink.borrow_mut().push(value.clone())
        });
        Self { picker, emitted }
    }

    pub fn with_options(&mut self, overrides: PickerOptions) -> &mut Self {
        self.picker.set_options(&overrides);
        self
    }

    pub fn range_mode() -> Self {
        let mut test_picker = Self::new();
        test_picker.with_options(PickerOptions {
            select_range: Some(true),
            ..Default::default()
        });
        test_picker
    }

    /// Clicks the grid cell showing `date`, navigating to its month first.
    pub fn click(&mut self, date: NaiveDate) -> bool {
        while self.picker.viewing_date() > date {
            self.picker.prev_month();
        }
        while crate::domain::calendar::month_end(self.picker.viewing_date()) < date {
            self.picker.next_month();
        }
        let index = self
            .picker
            .days()
            .iter()
            .position(|day| day.date == date && day.in_this_month)
            .expect("date laid out in its own month");
        self.picker.select_day(index)
    }

    pub fn emitted(&self) -> Vec<PickerValue> {
        self.emitted.borrow().clone()
    }
}

impl Deref for TestPicker {
    type Target = Picker;

    fn deref(&self) -> &Picker {
        &self.picker
    }
}

impl DerefMut for TestPicker {
    fn deref_mut(&mut self) -> &mut Picker {
        &mut self.picker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harness_starts_on_fixed_today() {
        let test_picker = TestPicker::new();
        assert_eq!(test_picker.today(), today());
        assert_eq!(test_picker.viewing_date(), date(2024, 3, 1));
        assert!(test_picker.emitted().is_empty());
    }

    #[test]
    fn harness_records_emissions() {
        let mut test_picker = TestPicker::new();
        assert!(test_picker.click(date(2024, 5, 2)));
        assert_eq!(test_picker.emitted(), vec![PickerValue::Date(date(2024, 5, 2))]);
    }
}
