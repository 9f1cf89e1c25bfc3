//! Calendar projections over the progress store.
//!
//! Pure functions of the store and an injected clock; rendering belongs
//! to the CLI.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::{iso_date, Clock};
use crate::progress::ProgressStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayCell {
    pub date: String,
    /// Day of month, 1-based.
    pub day: u32,
    pub sets: u32,
    pub completed: bool,
    pub is_today: bool,
}

/// One calendar month of completion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub days: Vec<DayCell>,
}

/// Build the current month's view, one cell per day.
pub fn month_view(store: &ProgressStore, clock: &dyn Clock) -> MonthView {
    let today = clock.today();
    let (year, month) = (today.year(), today.month());
    let days = (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .map(|date| cell_for(store, date, today))
        .collect();
    MonthView {
        year,
        month,
        month_name: month_name(month).to_string(),
        days,
    }
}

/// The last seven days, oldest first, ending today.
pub fn week_summary(store: &ProgressStore, clock: &dyn Clock) -> Vec<DayCell> {
    let today = clock.today();
    (0..7)
        .rev()
        .map(|back| cell_for(store, today - Duration::days(back), today))
        .collect()
}

fn cell_for(store: &ProgressStore, date: NaiveDate, today: NaiveDate) -> DayCell {
    let key = iso_date(date);
    DayCell {
        day: date.day(),
        sets: store.sets_for(&key),
        completed: store.is_completed(&key),
        is_today: date == today,
        date: key,
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map_or(30, |d| d.day())
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}
