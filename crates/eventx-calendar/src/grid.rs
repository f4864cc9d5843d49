//! Month grid arithmetic on the civil (proleptic Gregorian) calendar.

use chrono::{Datelike, Months, NaiveDate};

/// A calendar month inside chrono's representable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// Always the 1st of the month.
    first: NaiveDate,
}

impl YearMonth {
    /// Returns `None` when `month` is outside `1..=12` or the year is out of chrono's range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date.with_day0(0).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// Number of days in the month, leap years included.
    pub fn days_in_month(&self) -> u32 {
        match self.first.checked_add_months(Months::new(1)) {
            Some(next) => (next - self.first).num_days() as u32,
            // Only the last representable month has no successor.
            None => NaiveDate::MAX.day(),
        }
    }

    /// Weekday of the 1st, 0 = Sunday.
    pub fn first_weekday_offset(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// The month after this one, wrapping December into January.
    /// `None` past the end of chrono's range.
    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// The month before this one, wrapping January into December.
    /// `None` before the start of chrono's range.
    pub fn prev(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// Day `day` of this month, if it exists.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }

    /// Title such as "March 2024".
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

/// One cell of the 7-column month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    /// Leading blank before the 1st.
    Placeholder,
    Day {
        day: u32,
        is_today: bool,
        is_selected: bool,
    },
}

/// Renderable month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub cells: Vec<GridCell>,
}

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

impl MonthGrid {
    /// Build the grid for `month`.
    ///
    /// `is_today` marks the real current date wherever it falls; `is_selected`
    /// only marks `selected` when it lies inside `month`.
    pub fn build(month: YearMonth, today: NaiveDate, selected: NaiveDate) -> Self {
        let offset = month.first_weekday_offset() as usize;
        let days = month.days_in_month();

        let mut cells = Vec::with_capacity(offset + days as usize);
        cells.extend(std::iter::repeat(GridCell::Placeholder).take(offset));
        cells.extend((1..=days).map(|day| {
            let date = month.day(day);
            GridCell::Day {
                day,
                is_today: date == Some(today),
                is_selected: date == Some(selected),
            }
        }));

        Self { month, cells }
    }

    /// Cells chunked into rows of seven; the last row may be short.
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(7)
    }
}
