use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A selected span of calendar days. `end` is absent while the range is
/// still waiting for its second endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.min(end),
            end: Some(start.max(end)),
        }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    pub fn open(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end.unwrap_or(self.start)
    }
}

/// Two-click range selection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Empty,
    /// First endpoint fixed, waiting for the second.
    Anchored(NaiveDate),
    /// Both endpoints fixed, `start <= end`.
    Complete { start: NaiveDate, end: NaiveDate },
}

impl Selection {
    pub fn single(date: NaiveDate) -> Self {
        Selection::Complete {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        match *self {
            Selection::Empty => None,
            Selection::Anchored(start) | Selection::Complete { start, .. } => Some(start),
        }
    }

    pub fn end(&self) -> Option<NaiveDate> {
        match *self {
            Selection::Complete { end, .. } => Some(end),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Selection::Complete { .. })
    }

    /// The selection as a range: an anchor becomes an open range covering only
    /// the anchor day.
    pub fn to_range(&self) -> Option<DateRange> {
        match *self {
            Selection::Empty => None,
            Selection::Anchored(start) => Some(DateRange::open(start)),
            Selection::Complete { start, end } => Some(DateRange {
                start,
                end: Some(end),
            }),
        }
    }

    /// Applies a click on `date`.
    ///
    /// In range mode an anchor only completes when `date` falls strictly after
    /// it; an earlier or equal date re-anchors. Any click on a complete range
    /// starts a new one. In single mode every click collapses to `date..=date`.
    pub fn select(self, date: NaiveDate, select_range: bool) -> Self {
        if !select_range {
            return Selection::single(date);
        }

        match self {
            Selection::Anchored(start) if date > start => Selection::Complete { start, end: date },
            _ => Selection::Anchored(date),
        }
    }
}

impl From<DateRange> for Selection {
    fn from(range: DateRange) -> Self {
        match range.end {
            None => Selection::Anchored(range.start),
            Some(end) => Selection::Complete {
                start: range.start.min(end),
                end: range.start.max(end),
            },
        }
    }
}
