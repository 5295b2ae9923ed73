use crate::domain::calendar::{month_start, shift_months, with_month_clamped, with_year_clamped};
use crate::domain::{
    Day, DayContext, EffectiveOptions, MonthCell, PickerOptions, Selection, YearCell,
    build_day_names, build_grid, build_months, build_years, resolve,
};
use crate::infrastructure::{
    ChangeListener, Clock, DateFormat, ExternalValue, PickerError, PickerValue, StrftimeFormatter,
    SystemClock, ValueAccessor,
};
use chrono::NaiveDate;
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Drill-down granularity of the open picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Days,
    Months,
    Years,
}

/// Date (or date range) picker state.
///
/// Owns the viewed month, the selection and every derived render sequence.
/// Each mutating operation regenerates the derived state before returning.
pub struct Picker {
    defaults: EffectiveOptions,
    options: EffectiveOptions,
    /// Always the first day of the viewed month
    viewing: NaiveDate,
    selection: Selection,
    view: View,
    is_opened: bool,
    disabled: bool,

    days: Vec<Day>,
    years: Vec<YearCell>,
    months: Vec<MonthCell>,
    day_names: Vec<String>,
    display_value: String,
    bar_title: String,

    accessor: ValueAccessor,
    clock: Box<dyn Clock>,
    formatter: Box<dyn DateFormat>,
}

impl Picker {
    pub fn new(field_id: impl Into<String>) -> Self {
        Self::with_collaborators(field_id, Box::new(SystemClock), Box::new(StrftimeFormatter))
    }

    pub fn with_collaborators(
        field_id: impl Into<String>,
        clock: Box<dyn Clock>,
        formatter: Box<dyn DateFormat>,
    ) -> Self {
        let defaults = EffectiveOptions::defaults(field_id);
        let today = clock.today();

        let mut picker = Self {
            options: defaults.clone(),
            defaults,
            viewing: month_start(today),
            selection: Selection::single(today),
            view: View::Days,
            is_opened: false,
            disabled: false,
            days: Vec::new(),
            years: Vec::new(),
            months: Vec::new(),
            day_names: Vec::new(),
            display_value: String::new(),
            bar_title: String::new(),
            accessor: ValueAccessor::new(),
            clock,
            formatter,
        };
        picker.rebuild();
        picker
    }

    /// Re-resolves `overrides` against the defaults and rebuilds.
    pub fn set_options(&mut self, overrides: &PickerOptions) {
        self.options = resolve(&self.defaults, overrides);
        debug!("Options resolved for {}: {:?}", self.options.field_id, self.options);
        self.rebuild();
    }

    pub fn navigate(&mut self, direction: Direction) {
        let delta = match direction {
            Direction::Next => 1,
            Direction::Prev => -1,
        };
        self.viewing = shift_months(self.viewing, delta);
        debug!("Navigated {:?} to {}", direction, self.viewing.format("%Y-%m"));
        self.rebuild();
    }

    pub fn next_month(&mut self) {
        self.navigate(Direction::Next);
    }

    pub fn prev_month(&mut self) {
        self.navigate(Direction::Prev);
    }

    /// Views `year` and drills down to month selection.
    pub fn jump_to_year(&mut self, year: i32) {
        match with_year_clamped(self.viewing, year) {
            Some(viewing) => self.viewing = viewing,
            None => warn!("Year {} is outside the supported calendar", year),
        }
        self.view = View::Months;
        self.rebuild();
    }

    /// Views `month` (1-based) of the current year and drills down to days.
    pub fn jump_to_month(&mut self, month: u32) {
        match with_month_clamped(self.viewing, month) {
            Some(viewing) => self.viewing = viewing,
            None => warn!("Ignoring invalid month {}", month),
        }
        self.view = View::Days;
        self.rebuild();
    }

    /// Clicks the grid cell at `index`. Returns whether the selection changed.
    pub fn select_day(&mut self, index: usize) -> bool {
        if self.disabled {
            warn!("Ignoring selection on disabled picker {}", self.options.field_id);
            return false;
        }
        let Some(day) = self.days.get(index) else {
            warn!("Day index {} is outside the grid of {}", index, self.days.len());
            return false;
        };
        if !day.is_selectable {
            debug!("Day {} is not selectable", day.date);
            return false;
        }

        let date = day.date;
        self.selection = self.selection.select(date, self.options.select_range);
        debug!("Selected {}: {:?}", date, self.selection);
        self.rebuild();

        if let Some(value) = self.emit_value() {
            self.accessor.notify_change(&value);
        }

        if self.options.close_on_selection && self.selection.is_complete() {
            self.close();
        }
        true
    }

    /// Ingests a value from the host form. `None` leaves the picker untouched.
    pub fn write_value(&mut self, value: Option<ExternalValue>) -> Result<(), PickerError> {
        let Some(value) = value else {
            return Ok(());
        };
        let range = value.into_range()?;
        debug!("External value written: {:?}", range);

        self.selection = Selection::from(range);
        if let Some(start) = self.selection.start() {
            self.viewing = month_start(start);
        }
        self.rebuild();
        Ok(())
    }

    /// [`write_value`](Self::write_value) for loosely typed JSON input.
    pub fn write_json(&mut self, value: serde_json::Value) -> Result<(), PickerError> {
        let value = ExternalValue::from_json(value)?;
        self.write_value(value)
    }

    /// The value exposed to the form: a date in single mode, a closed range in
    /// range mode. `None` only when nothing is selected.
    pub fn emit_value(&self) -> Option<PickerValue> {
        let start = self.selection.start()?;
        if !self.options.select_range {
            return Some(PickerValue::Date(start));
        }
        Some(PickerValue::Range {
            start,
            end: self.selection.end().unwrap_or(start),
        })
    }

    /// Collapses the selection to today.
    pub fn reset(&mut self) {
        self.selection = Selection::single(self.clock.today());
        self.rebuild();
        if let Some(value) = self.emit_value() {
            self.accessor.notify_change(&value);
        }
    }

    pub fn toggle_open(&mut self) {
        if !self.is_opened && self.disabled {
            return;
        }
        self.is_opened = !self.is_opened;
        if !self.is_opened && self.view == View::Years {
            self.view = View::Days;
        }
    }

    pub fn open(&mut self) {
        if !self.is_opened {
            self.toggle_open();
        }
    }

    pub fn close(&mut self) {
        self.is_opened = false;
        if self.view == View::Years {
            self.view = View::Days;
        }
    }

    /// Called by the outside-click collaborator.
    pub fn close_on_outside_click(&mut self) {
        if self.is_opened && self.options.close_on_click_outside {
            self.close();
        }
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Days => View::Years,
            _ => View::Days,
        };
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn register_on_change<L>(&mut self, listener: L)
    where
        L: ChangeListener + 'static,
    {
        self.accessor.register_on_change(listener);
    }

    pub fn register_on_touched<F>(&mut self, listener: F)
    where
        F: FnMut() + 'static,
    {
        self.accessor.register_on_touched(listener);
    }

    /// Called by the blur collaborator.
    pub fn mark_touched(&mut self) {
        self.accessor.notify_touched();
    }

    fn rebuild(&mut self) {
        let today = self.clock.today();
        let ctx = DayContext {
            viewing: self.viewing,
            today,
            selection: &self.selection,
            options: &self.options,
        };
        self.days = build_grid(&ctx);
        self.years = build_years(&self.options, self.viewing);
        self.months = build_months(&self.options, self.viewing, self.formatter.as_ref());
        self.day_names = build_day_names(&self.options, self.viewing, self.formatter.as_ref());
        self.display_value = self.format_display();
        self.bar_title = self.format_bar_title();
    }

    fn format_display(&self) -> String {
        let Some(start) = self.selection.start() else {
            return String::new();
        };
        let options = &self.options;
        let formatted_start =
            self.formatter.format(start, &options.display_format, &options.locale);
        if !options.select_range {
            return formatted_start;
        }

        let end = self.selection.end().unwrap_or(start);
        let formatted_end = self.formatter.format(end, &options.display_format, &options.locale);
        format!("{}{}{}", formatted_start, options.range_separator, formatted_end)
    }

    fn format_bar_title(&self) -> String {
        if self.selection == Selection::Empty && self.options.use_empty_bar_title {
            return self.options.bar_title_if_empty.clone();
        }
        self.formatter
            .format(self.viewing, &self.options.bar_title_format, &self.options.locale)
    }

    pub fn options(&self) -> &EffectiveOptions {
        &self.options
    }

    pub fn viewing_date(&self) -> NaiveDate {
        self.viewing
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_opened(&self) -> bool {
        self.is_opened
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn years(&self) -> &[YearCell] {
        &self.years
    }

    pub fn months(&self) -> &[MonthCell] {
        &self.months
    }

    pub fn day_names(&self) -> &[String] {
        &self.day_names
    }

    pub fn display_value(&self) -> &str {
        &self.display_value
    }

    pub fn bar_title(&self) -> &str {
        &self.bar_title
    }

    /// Grid index of `date`, if it is currently laid out.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.days.iter().position(|day| day.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IncludeDays;
    use crate::infrastructure::test_utils::{TestPicker, date, today};
    use chrono::Datelike;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn starts_on_today_in_day_view() {
        let picker = TestPicker::new();
        assert_eq!(picker.selection(), Selection::single(today()));
        assert_eq!(picker.view(), View::Days);
        assert!(!picker.is_opened());
        assert_eq!(picker.display_value(), "Mar 15, 2024");
        assert_eq!(picker.bar_title(), "March 2024");
        assert_eq!(picker.options().field_id, "datepicker-test");

        let today_cells: Vec<_> = picker.days().iter().filter(|day| day.is_today).collect();
        assert_eq!(today_cells.len(), 1);
        assert!(today_cells[0].is_selected);
    }

    #[test]
    fn written_string_moves_view_and_emits_date() {
        let mut picker = TestPicker::new();
        picker.write_value(Some("2024-01-15".into())).unwrap();
        assert_eq!(picker.emit_value(), Some(PickerValue::Date(date(2024, 1, 15))));
        assert_eq!(picker.viewing_date(), date(2024, 1, 1));
        assert_eq!(picker.bar_title(), "January 2024");
        // writes from the form are not echoed back
        assert!(picker.emitted().is_empty());
    }

    #[test]
    fn writing_nothing_keeps_state() {
        let mut picker = TestPicker::new();
        picker.write_value(None).unwrap();
        picker.write_json(json!(null)).unwrap();
        assert_eq!(picker.selection(), Selection::single(today()));
    }

    #[test]
    fn invalid_input_type_is_rejected_without_side_effects() {
        let mut picker = TestPicker::new();
        let err = picker.write_json(json!(true)).unwrap_err();
        assert_eq!(err, PickerError::InvalidInputType("boolean".to_string()));
        assert!(matches!(
            picker.write_value(Some("not a date".into())),
            Err(PickerError::InvalidDate(_))
        ));
        assert_eq!(picker.selection(), Selection::single(today()));
        assert_eq!(picker.viewing_date(), date(2024, 3, 1));
    }

    #[test]
    fn emitted_value_round_trips_in_single_mode() {
        let mut picker = TestPicker::new();
        picker.click(date(2024, 7, 4));
        let emitted = picker.emit_value().unwrap();
        picker.write_value(Some(emitted.clone().into())).unwrap();
        assert_eq!(picker.emit_value(), Some(emitted));
    }

    #[test]
    fn emitted_value_round_trips_in_range_mode() {
        let mut picker = TestPicker::range_mode();
        picker.click(date(2024, 3, 5));
        let anchored = picker.emit_value().unwrap();
        assert_eq!(
            anchored,
            PickerValue::Range {
                start: date(2024, 3, 5),
                end: date(2024, 3, 5)
            }
        );
        picker.write_value(Some(anchored.clone().into())).unwrap();
        assert_eq!(picker.emit_value(), Some(anchored));

        picker.click(date(2024, 3, 1));
        picker.click(date(2024, 4, 2));
        let complete = picker.emit_value().unwrap();
        picker.write_value(Some(complete.clone().into())).unwrap();
        assert_eq!(picker.emit_value(), Some(complete));
    }

    #[test]
    fn earlier_second_click_reanchors() {
        let mut picker = TestPicker::range_mode();
        picker.click(date(2024, 3, 10));
        picker.click(date(2024, 3, 5));
        assert_eq!(picker.selection(), Selection::Anchored(date(2024, 3, 5)));
        assert_eq!(picker.display_value(), "Mar 05, 2024-Mar 05, 2024");
    }

    #[test]
    fn third_click_starts_new_range() {
        let mut picker = TestPicker::range_mode();
        picker.click(date(2024, 3, 5));
        picker.click(date(2024, 3, 10));
        assert_eq!(picker.display_value(), "Mar 05, 2024-Mar 10, 2024");
        let in_range = picker.days().iter().filter(|day| day.is_in_range).count();
        assert_eq!(in_range, 6);

        picker.click(date(2024, 3, 2));
        assert_eq!(picker.selection(), Selection::Anchored(date(2024, 3, 2)));
        assert_eq!(picker.emitted().len(), 3);
    }

    #[test]
    fn range_mode_closes_only_once_complete() {
        let mut picker = TestPicker::range_mode();
        picker.open();
        picker.click(date(2024, 3, 5));
        assert!(picker.is_opened());
        picker.click(date(2024, 3, 9));
        assert!(!picker.is_opened());
    }

    #[test]
    fn single_mode_closes_on_every_selection() {
        let mut picker = TestPicker::new();
        picker.open();
        picker.click(date(2024, 3, 20));
        assert!(!picker.is_opened());

        picker.with_options(PickerOptions {
            close_on_selection: Some(false),
            ..Default::default()
        });
        picker.open();
        picker.click(date(2024, 3, 21));
        assert!(picker.is_opened());
    }

    #[test]
    fn twelve_months_forward_lands_one_year_later() {
        let mut picker = TestPicker::new();
        for _ in 0..12 {
            picker.next_month();
        }
        assert_eq!(picker.viewing_date(), date(2025, 3, 1));
        let this_year: Vec<_> = picker.years().iter().filter(|y| y.is_this_year).collect();
        assert_eq!(this_year.len(), 1);
        assert_eq!(this_year[0].year, 2025);

        picker.navigate(Direction::Prev);
        assert_eq!(picker.viewing_date(), date(2025, 2, 1));
    }

    #[test]
    fn drill_down_jumps_year_then_month() {
        let mut picker = TestPicker::new();
        picker.open();
        picker.toggle_view();
        assert_eq!(picker.view(), View::Years);

        picker.jump_to_year(1999);
        assert_eq!(picker.view(), View::Months);
        assert_eq!(picker.viewing_date(), date(1999, 3, 1));
        assert!(picker.years().iter().any(|y| y.year == 1999 && y.is_this_year));

        picker.jump_to_month(12);
        assert_eq!(picker.view(), View::Days);
        assert_eq!(picker.viewing_date(), date(1999, 12, 1));
        assert!(picker.months()[11].is_selected);
    }

    #[test]
    fn invalid_month_jump_still_drills_down() {
        let mut picker = TestPicker::new();
        picker.jump_to_month(13);
        assert_eq!(picker.viewing_date(), date(2024, 3, 1));
        assert_eq!(picker.view(), View::Days);
    }

    #[test]
    fn out_of_grid_and_unselectable_clicks_are_ignored() {
        let mut picker = TestPicker::new();
        assert!(!picker.select_day(500));

        picker.with_options(PickerOptions {
            max_date: Some(date(2024, 3, 20)),
            ..Default::default()
        });
        let beyond = picker.index_of(date(2024, 3, 21)).unwrap();
        assert!(!picker.select_day(beyond));
        let boundary = picker.index_of(date(2024, 3, 20)).unwrap();
        assert!(picker.select_day(boundary));
        assert_eq!(picker.emitted(), vec![PickerValue::Date(date(2024, 3, 20))]);
    }

    #[test]
    fn hidden_fillers_cannot_be_selected() {
        let mut picker = TestPicker::new();
        picker.with_options(PickerOptions {
            include_days: Some(IncludeDays::None),
            ..Default::default()
        });
        let filler = picker.index_of(date(2024, 2, 29)).unwrap();
        assert!(!picker.select_day(filler));
        assert!(picker.emitted().is_empty());
    }

    #[test]
    fn closing_from_year_view_returns_to_days() {
        let mut picker = TestPicker::new();
        picker.toggle_open();
        picker.toggle_view();
        picker.close();
        assert_eq!(picker.view(), View::Days);

        picker.toggle_open();
        picker.toggle_view();
        picker.toggle_open();
        assert!(!picker.is_opened());
        assert_eq!(picker.view(), View::Days);
    }

    #[test]
    fn month_view_survives_closing() {
        let mut picker = TestPicker::new();
        picker.open();
        picker.jump_to_year(2020);
        picker.close();
        assert_eq!(picker.view(), View::Months);
    }

    #[test]
    fn outside_click_respects_option() {
        let mut picker = TestPicker::new();
        picker.open();
        picker.close_on_outside_click();
        assert!(!picker.is_opened());

        picker.with_options(PickerOptions {
            close_on_click_outside: Some(false),
            ..Default::default()
        });
        picker.open();
        picker.close_on_outside_click();
        assert!(picker.is_opened());
    }

    #[test]
    fn disabled_picker_ignores_selection_and_opening() {
        let mut picker = TestPicker::new();
        picker.set_disabled(true);
        picker.open();
        assert!(!picker.is_opened());
        assert!(!picker.click(date(2024, 3, 3)));
        picker.next_month();
        assert_eq!(picker.viewing_date(), date(2024, 4, 1));
        assert!(picker.is_disabled());
    }

    #[test]
    fn reset_collapses_to_today_and_notifies() {
        let mut picker = TestPicker::range_mode();
        picker.click(date(2024, 3, 1));
        picker.click(date(2024, 3, 9));
        picker.reset();
        assert_eq!(picker.selection(), Selection::single(today()));
        assert_eq!(
            picker.emitted().last(),
            Some(&PickerValue::Range {
                start: today(),
                end: today()
            })
        );
    }

    #[test]
    fn touched_listener_only_fires_on_blur() {
        let touched = Rc::new(RefCell::new(false));
        let mut picker = TestPicker::new();
        let flag = Rc::clone(&touched);
        picker.register_on_touched(move || *flag.borrow_mut() = true);
        picker.click(date(2024, 3, 4));
        assert!(!*touched.borrow());
        picker.mark_touched();
        assert!(*touched.borrow());
    }

    #[test]
    fn new_options_rebuild_render_state() {
        let mut picker = TestPicker::new();
        picker.with_options(PickerOptions {
            first_calendar_day: Some(1),
            display_format: Some("%d/%m/%Y".to_string()),
            ..Default::default()
        });
        assert_eq!(picker.day_names()[0], "Mon");
        assert_eq!(picker.display_value(), "15/03/2024");
        // March 2024 starts on a Friday
        assert_eq!(picker.days().iter().take_while(|d| !d.in_this_month).count(), 4);
    }

    #[test]
    fn last_representable_date_can_be_written_and_selected() {
        let mut picker = TestPicker::new();
        picker.write_value(Some(NaiveDate::MAX.into())).unwrap();
        assert_eq!(picker.viewing_date(), month_start(NaiveDate::MAX));
        assert_eq!(picker.days().last().map(|d| d.date), Some(NaiveDate::MAX));

        picker.next_month();
        assert_eq!(picker.viewing_date(), month_start(NaiveDate::MAX));

        let index = picker.index_of(NaiveDate::MAX).unwrap();
        assert!(picker.select_day(index));
        assert_eq!(picker.emitted(), vec![PickerValue::Date(NaiveDate::MAX)]);
    }

    #[test]
    fn first_representable_date_can_be_written() {
        let mut picker = TestPicker::new();
        picker.write_value(Some(NaiveDate::MIN.into())).unwrap();
        assert_eq!(picker.days().first().map(|d| d.date), Some(NaiveDate::MIN));

        picker.prev_month();
        assert_eq!(picker.viewing_date(), NaiveDate::MIN);
        assert_eq!(picker.day_names().len(), 7);
    }

    #[test]
    fn drilling_to_the_last_year_stays_within_the_calendar() {
        let mut picker = TestPicker::range_mode();
        picker.jump_to_year(NaiveDate::MAX.year());
        picker.jump_to_month(12);
        assert_eq!(picker.viewing_date(), month_start(NaiveDate::MAX));
        assert_eq!(picker.days().iter().filter(|d| d.in_this_month).count(), 31);
    }
}
