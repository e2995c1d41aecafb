//! Month arithmetic and the bookable slot grid.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::{Appointment, Slot};

/// Daily bookable window. Both ends are inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorkingHours {
    pub start: Slot,
    pub end: Slot,
    pub slot_minutes: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: Slot::new(9, 0).unwrap_or_else(first_slot),
            end: Slot::new(14, 0).unwrap_or_else(first_slot),
            slot_minutes: 30,
        }
    }
}

fn first_slot() -> Slot {
    Slot::from_time(chrono::NaiveTime::MIN)
}

impl WorkingHours {
    /// Every slot start from `start` to `end`, ascending.
    pub fn grid(&self) -> Vec<Slot> {
        let step = Duration::minutes(i64::from(self.slot_minutes.max(1)));
        let mut slots = Vec::new();
        let mut t = self.start.time();
        while t <= self.end.time() {
            slots.push(Slot::from_time(t));
            let (next, wrapped) = t.overflowing_add_signed(step);
            if wrapped != 0 {
                break;
            }
            t = next;
        }
        slots
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.grid().contains(&slot)
    }
}

/// A calendar month, the unit both dashboards navigate by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        (0..days_in_month(first)).filter_map(move |d| first.checked_add_signed(Duration::days(i64::from(d))))
    }
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let ym = YearMonth::of(date);
    let next = ym.next().first_day();
    next.signed_duration_since(ym.first_day()).num_days() as u32
}

pub fn first_weekday_of_month(date: NaiveDate) -> Weekday {
    YearMonth::of(date).first_day().weekday()
}

/// Empty cells before day 1 in a Monday-first grid.
pub fn leading_blank_days(date: NaiveDate) -> u32 {
    first_weekday_of_month(date).num_days_from_monday()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Slots still free on `date` at the center named `center_name`.
///
/// Booked slots are taken from `active`, matching on date and center name.
/// Weekends and a missing date produce an empty list.
pub fn available_hours(
    date: Option<NaiveDate>,
    center_name: &str,
    active: &[Appointment],
    hours: &WorkingHours,
) -> Vec<Slot> {
    let Some(date) = date else {
        return Vec::new();
    };
    if is_weekend(date) {
        return Vec::new();
    }
    hours
        .grid()
        .into_iter()
        .filter(|slot| {
            !active.iter().any(|a| {
                a.is_active() && a.date == date && a.center.name == center_name && a.slot == *slot
            })
        })
        .collect()
}

/// Stable sort by date and slot. The input is left untouched.
pub fn sort_chronologically(appointments: &[Appointment]) -> Vec<Appointment> {
    let mut sorted = appointments.to_vec();
    sorted.sort_by_key(|a| a.date_time());
    sorted
}
