use crate::application::Picker;
use crate::domain::Day;

const CELL_WIDTH: usize = 4;

/// Plain-text month rendering for non-interactive output.
///
/// Markers: `[15]` selected endpoint, `(16)` inside the range, ` 15*` today,
/// ` 15-` outside the min/max bounds. Hidden filler days are blank.
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render_month(&self, picker: &Picker) -> String {
        let width = CELL_WIDTH * 7;
        let mut lines = vec![format!("{:^width$}", picker.bar_title(), width = width)];

        let header: String = picker
            .day_names()
            .iter()
            .map(|name| format!("{:>width$}", name, width = CELL_WIDTH))
            .collect();
        lines.push(header);

        for week in picker.days().chunks(7) {
            let row: String = week.iter().map(Self::render_day).collect();
            lines.push(row);
        }

        lines
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_day(day: &Day) -> String {
        if !day.is_visible {
            return " ".repeat(CELL_WIDTH);
        }
        let (left, right) = if day.is_selected {
            ('[', ']')
        } else if day.is_in_range {
            ('(', ')')
        } else if day.is_today {
            (' ', '*')
        } else if !day.is_selectable {
            (' ', '-')
        } else {
            (' ', ' ')
        };
        format!("{}{:>2}{}", left, day.day, right)
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}
