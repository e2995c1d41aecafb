use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::schedule::{is_weekend, leading_blank_days, YearMonth};

const MONTHS_ES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Column headers of a Monday-first grid.
pub const WEEKDAYS_ES: [&str; 7] = ["Lun", "Mar", "Mié", "Jue", "Vie", "Sáb", "Dom"];

/// Capitalized Spanish month name for a 1-based month.
pub fn month_name_es(month: u32) -> &'static str {
    MONTHS_ES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// `"Octubre 2025"`
pub fn month_title(month: YearMonth) -> String {
    format!("{} {}", month_name_es(month.month), month.year)
}

/// One day in the rendered month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub selected: bool,
    pub today: bool,
    pub has_appointments: bool,
    pub weekend: bool,
    pub past: bool,
    pub has_availability: bool,
}

impl DayCell {
    /// Weekends and days before today cannot be picked.
    pub fn selectable(&self) -> bool {
        !self.weekend && !self.past
    }

    pub fn css_classes(&self) -> String {
        let mut classes = vec!["calendar-day"];
        if self.weekend {
            classes.push("weekend");
        }
        if self.past {
            classes.push("past");
        }
        if self.today {
            classes.push("today");
        }
        if self.selected {
            classes.push("selected");
        }
        if self.has_appointments {
            classes.push("has-appointments");
        }
        if self.has_availability {
            classes.push("available");
        }
        classes.join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub title: String,
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

/// Build the month view model.
///
/// `appointment_days` marks days that already hold appointments; `available`
/// decides whether a day still has free slots (pass `|_| false` to skip).
pub fn month_grid(
    month: YearMonth,
    today: NaiveDate,
    selected: Option<NaiveDate>,
    appointment_days: &BTreeSet<NaiveDate>,
    available: impl Fn(NaiveDate) -> bool,
) -> MonthGrid {
    let days = month
        .days()
        .map(|date| {
            let weekend = is_weekend(date);
            let past = date < today;
            DayCell {
                date,
                day: date.day(),
                selected: selected == Some(date),
                today: date == today,
                has_appointments: appointment_days.contains(&date),
                weekend,
                past,
                has_availability: !weekend && !past && available(date),
            }
        })
        .collect();

    MonthGrid {
        month,
        title: month_title(month),
        leading_blanks: leading_blank_days(month.first_day()),
        days,
    }
}

/// Month range the patient calendar may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBounds {
    pub earliest: YearMonth,
    pub latest: YearMonth,
}

impl MonthBounds {
    /// From the current month to December of `last_year`.
    pub fn patient(today: NaiveDate, last_year: i32) -> Self {
        Self {
            earliest: YearMonth::of(today),
            latest: YearMonth {
                year: last_year,
                month: 12,
            },
        }
    }

    pub fn can_go_prev(&self, current: YearMonth) -> bool {
        current.prev() >= self.earliest
    }

    pub fn can_go_next(&self, current: YearMonth) -> bool {
        current.next() <= self.latest
    }
}
