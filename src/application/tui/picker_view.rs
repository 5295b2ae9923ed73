use super::theme::Theme;
use crate::application::{Picker, View};
use crate::domain::Day;
use crate::domain::calendar::{days_in_month, same_month, shift_days};
use crate::infrastructure::PickerValue;
use chrono::{Datelike, NaiveDate};
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::tty::IsTty;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use std::io::{self, Stdout, stdout};

#[derive(Debug, Clone, PartialEq)]
pub enum PickerViewResult {
    /// User left without confirming (quit, escape, ctrl+c)
    Cancelled,
    /// The picker closed on a selection, or the user confirmed explicitly
    Confirmed(Option<PickerValue>),
}

pub struct PickerView<'a> {
    /// Day under the keyboard cursor
    cursor: NaiveDate,
    /// Year under the cursor in the year drill-down
    cursor_year: i32,
    /// Month under the cursor in the month drill-down (1-based)
    cursor_month: u32,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    cancelled: bool,
    confirmed: bool,
    show_help: bool,
    theme: Theme,
    picker: &'a mut Picker,
}

impl<'a> PickerView<'a> {
    pub fn new(picker: &'a mut Picker, theme: Theme) -> io::Result<Self> {
        if !IsTty::is_tty(&std::io::stdout()) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "Not running in a TTY, cannot initialize terminal interface",
            ));
        }

        enable_raw_mode()
            .map_err(|e| io::Error::other(format!("Failed to enable raw mode: {}", e)))?;

        stdout().execute(EnterAlternateScreen).map_err(|e| {
            let _ = disable_raw_mode(); // Clean up on failure
            io::Error::other(format!("Failed to enter alternate screen: {}", e))
        })?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend).map_err(|e| {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
            io::Error::other(format!("Failed to create terminal: {}", e))
        })?;

        let cursor = picker.selection().start().unwrap_or_else(|| picker.today());
        let viewing = picker.viewing_date();
        picker.open();

        Ok(Self {
            cursor,
            cursor_year: viewing.year(),
            cursor_month: viewing.month(),
            terminal,
            cancelled: false,
            confirmed: false,
            show_help: false,
            theme,
            picker,
        })
    }

    /// Moves the cursor and keeps the viewed month in step with it.
    fn move_cursor(&mut self, days: i64) {
        let Some(target) = shift_days(self.cursor, days) else {
            return;
        };
        self.cursor = target;
        self.follow_cursor();
    }

    fn follow_cursor(&mut self) {
        while self.picker.viewing_date() > self.cursor {
            self.picker.prev_month();
        }
        while !same_month(self.picker.viewing_date(), self.cursor) {
            self.picker.next_month();
        }
    }

    /// Keeps the cursor inside the viewed month after month navigation.
    fn clamp_cursor_to_view(&mut self) {
        let viewing = self.picker.viewing_date();
        if !same_month(viewing, self.cursor) {
            let day = self.cursor.day().min(days_in_month(viewing));
            self.cursor = viewing.with_day(day).unwrap_or(viewing);
        }
    }

    fn select_cursor(&mut self) {
        let index = self
            .picker
            .days()
            .iter()
            .position(|day| day.date == self.cursor && day.in_this_month);
        if let Some(index) = index {
            self.picker.select_day(index);
        }
    }

    /// Handle keyboard input
    fn handle_key_event(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                self.cancelled = true;
            }
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                self.cancelled = true;
            }
            (KeyCode::Char('?'), _) => {
                self.show_help = !self.show_help;
            }
            _ => match self.picker.view() {
                View::Days => self.handle_days_key(key.code),
                View::Months => self.handle_months_key(key.code),
                View::Years => self.handle_years_key(key.code),
            },
        }
    }

    fn handle_days_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-7),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(7),
            KeyCode::PageUp | KeyCode::Char('[') => {
                self.picker.prev_month();
                self.clamp_cursor_to_view();
            }
            KeyCode::PageDown | KeyCode::Char(']') => {
                self.picker.next_month();
                self.clamp_cursor_to_view();
            }
            KeyCode::Char('t') => {
                self.cursor = self.picker.today();
                self.follow_cursor();
            }
            KeyCode::Char('r') => {
                self.picker.reset();
                self.cursor = self.picker.today();
                self.follow_cursor();
            }
            KeyCode::Char('y') => {
                self.cursor_year = self.picker.viewing_date().year();
                self.picker.toggle_view();
            }
            KeyCode::Char('c') => {
                self.confirmed = true;
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.select_cursor(),
            _ => {}
        }
    }

    fn handle_years_key(&mut self, code: KeyCode) {
        let options = self.picker.options();
        let (min_year, max_year) = (options.min_year, options.max_year);
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor_year -= 1,
            KeyCode::Down | KeyCode::Char('j') => self.cursor_year += 1,
            KeyCode::PageUp => self.cursor_year -= 10,
            KeyCode::PageDown => self.cursor_year += 10,
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.picker.jump_to_year(self.cursor_year);
                self.cursor_month = self.picker.viewing_date().month();
            }
            KeyCode::Char('y') => self.picker.toggle_view(),
            _ => {}
        }
        if min_year <= max_year {
            self.cursor_year = self.cursor_year.clamp(min_year, max_year);
        }
    }

    fn handle_months_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.cursor_month = (self.cursor_month + 10) % 12 + 1
            }
            KeyCode::Right | KeyCode::Char('l') => self.cursor_month = self.cursor_month % 12 + 1,
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor_month = (self.cursor_month + 8) % 12 + 1
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor_month = (self.cursor_month + 2) % 12 + 1
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.picker.jump_to_month(self.cursor_month);
                self.clamp_cursor_to_view();
            }
            _ => {}
        }
    }

    /// Style for a day cell, strongest state first
    fn day_style(day: &Day, is_cursor: bool, theme: &Theme) -> Style {
        let colors = &theme.colors;
        let style = if day.is_selected {
            colors.selected.to_ratatui_with_modifier(Modifier::BOLD)
        } else if day.is_in_range {
            colors.in_range.to_ratatui()
        } else if day.is_today {
            colors.today.to_ratatui_with_modifier(Modifier::BOLD)
        } else if !day.is_selectable {
            colors.disabled.to_ratatui()
        } else if !day.in_this_month {
            colors.dimmed.to_ratatui()
        } else {
            colors.normal_text.to_ratatui()
        };

        if is_cursor {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    fn create_days_table(
        days: &[Day],
        day_names: &[String],
        bar_title: &str,
        cursor: NaiveDate,
        theme: &Theme,
    ) -> Table<'static> {
        let header = Row::new(
            day_names
                .iter()
                .map(|name| Cell::from(name.clone()).style(theme.colors.header.to_ratatui()))
                .collect::<Vec<_>>(),
        )
        .height(1);

        let rows: Vec<Row> = days
            .chunks(7)
            .map(|week| {
                let cells: Vec<Cell> = week
                    .iter()
                    .map(|day| {
                        if !day.is_visible {
                            return Cell::from("");
                        }
                        let is_cursor = day.date == cursor && day.in_this_month;
                        Cell::from(format!("{:>3}", day.day))
                            .style(Self::day_style(day, is_cursor, theme))
                    })
                    .collect();
                Row::new(cells)
            })
            .collect();

        Table::new(rows, [Constraint::Length(4); 7])
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.colors.border.to_ratatui())
                    .title(bar_title.to_string())
                    .title_style(theme.colors.header.to_ratatui())
                    .title_alignment(Alignment::Center),
            )
            .column_spacing(0)
    }

    fn create_years_list(
        years: &[(i32, bool)],
        cursor_year: i32,
        height: usize,
        theme: &Theme,
    ) -> Paragraph<'static> {
        let position = years.iter().position(|(year, _)| *year == cursor_year).unwrap_or(0);
        let first = position.saturating_sub(height / 2);

        let lines: Vec<Line> = years
            .iter()
            .skip(first)
            .take(height)
            .map(|&(year, is_this_year)| {
                let mut style = if is_this_year {
                    theme.colors.selected.to_ratatui()
                } else {
                    theme.colors.normal_text.to_ratatui()
                };
                if year == cursor_year {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(Span::styled(format!("  {}  ", year), style))
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.colors.border.to_ratatui())
                    .title("Year"),
            )
            .alignment(Alignment::Center)
    }

    fn create_months_table(
        months: &[(u32, String, bool)],
        cursor_month: u32,
        year: i32,
        theme: &Theme,
    ) -> Table<'static> {
        let rows: Vec<Row> = months
            .chunks(3)
            .map(|chunk| {
                let cells: Vec<Cell> = chunk
                    .iter()
                    .map(|(month, name, is_selected)| {
                        let mut style = if *is_selected {
                            theme.colors.selected.to_ratatui()
                        } else {
                            theme.colors.normal_text.to_ratatui()
                        };
                        if *month == cursor_month {
                            style = style.add_modifier(Modifier::REVERSED);
                        }
                        Cell::from(format!(" {} ", name)).style(style)
                    })
                    .collect();
                Row::new(cells)
            })
            .collect();

        Table::new(rows, [Constraint::Length(9); 3]).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.colors.border.to_ratatui())
                .title(year.to_string())
                .title_alignment(Alignment::Center),
        )
    }

    fn create_footer(display_value: &str, show_help: bool, theme: &Theme) -> Paragraph<'static> {
        let mut lines = vec![Line::from(Span::styled(
            display_value.to_string(),
            theme.colors.normal_text.to_ratatui_with_modifier(Modifier::BOLD),
        ))];
        if show_help {
            lines.push(Line::from(Span::styled(
                "←→↑↓/hjkl=Move • [ ]=Month • Enter=Select • y=Years • t=Today • r=Reset • \
                 c=Confirm • q=Quit",
                theme.colors.help_text.to_ratatui(),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "?=Help",
                theme.colors.help_text.to_ratatui(),
            )));
        }
        Paragraph::new(lines).alignment(Alignment::Center)
    }

    /// Center a `width` x `height` box inside `available`
    fn centered(available: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(available.width);
        let height = height.min(available.height);
        Rect {
            x: available.x + (available.width - width) / 2,
            y: available.y + (available.height - height) / 2,
            width,
            height,
        }
    }

    /// Run the picker loop until the value is confirmed or the user leaves
    pub fn run(&mut self) -> io::Result<PickerViewResult> {
        loop {
            if self.cancelled || self.confirmed || !self.picker.is_opened() {
                break;
            }

            let days = self.picker.days().to_vec();
            let day_names = self.picker.day_names().to_vec();
            let bar_title = self.picker.bar_title().to_string();
            let display_value = self.picker.display_value().to_string();
            let years: Vec<(i32, bool)> = self
                .picker
                .years()
                .iter()
                .map(|cell| (cell.year, cell.is_this_year))
                .collect();
            let months: Vec<(u32, String, bool)> = self
                .picker
                .months()
                .iter()
                .map(|cell| (cell.month, cell.name.clone(), cell.is_selected))
                .collect();
            let view = self.picker.view();
            let viewing_year = self.picker.viewing_date().year();
            let (cursor, cursor_year, cursor_month) =
                (self.cursor, self.cursor_year, self.cursor_month);
            let show_help = self.show_help;
            let theme = &self.theme;

            self.terminal.draw(|frame| {
                const BODY_HEIGHT: u16 = 11; // 7 week rows + header + borders + slack
                const FOOTER_HEIGHT: u16 = 2;
                const WIDTH: u16 = 30;
                const FOOTER_WIDTH: u16 = 100;

                let area = Self::centered(frame.area(), FOOTER_WIDTH, BODY_HEIGHT + FOOTER_HEIGHT);
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(BODY_HEIGHT),
                        Constraint::Length(FOOTER_HEIGHT),
                    ])
                    .split(area);
                let body = Self::centered(chunks[0], WIDTH, BODY_HEIGHT);

                match view {
                    View::Days => {
                        let table = Self::create_days_table(
                            &days,
                            &day_names,
                            &bar_title,
                            cursor,
                            theme,
                        );
                        frame.render_widget(table, body);
                    }
                    View::Months => {
                        let table =
                            Self::create_months_table(&months, cursor_month, viewing_year, theme);
                        frame.render_widget(table, body);
                    }
                    View::Years => {
                        let list = Self::create_years_list(
                            &years,
                            cursor_year,
                            (BODY_HEIGHT - 2) as usize,
                            theme,
                        );
                        frame.render_widget(list, body);
                    }
                }

                let footer = Self::create_footer(&display_value, show_help, theme);
                frame.render_widget(footer, chunks[1]);
            })?;

            if poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        self.cleanup()?;

        if self.cancelled {
            self.picker.close();
            Ok(PickerViewResult::Cancelled)
        } else {
            self.picker.close();
            Ok(PickerViewResult::Confirmed(self.picker.emit_value()))
        }
    }

    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        Ok(())
    }
}

impl<'a> Drop for PickerView<'a> {
    fn drop(&mut self) {
        // Fallback cleanup if run() bailed out early
        let _ = self.cleanup();
    }
}
