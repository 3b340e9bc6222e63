use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PeriodCount {
    pub period: &'static str,
    pub last_year: u64,
    pub all_time: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    seen: bool,
    last_year: u64,
    all_time: u64,
}

impl Slot {
    fn add(&mut self, count: u64, recent: bool) {
        self.seen = true;
        self.all_time += count;
        if recent {
            self.last_year += count;
        }
    }
}

/// Weekday and month buckets with an all-time total and a trailing-365-day
/// total. A day counts toward the trailing total when its midnight falls on
/// or after `now - 365 days`.
#[derive(Debug, Clone)]
pub struct PeriodTally {
    cutoff: NaiveDateTime,
    days: [Slot; 7],
    months: [Slot; 12],
}

impl PeriodTally {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            cutoff: (now - Duration::days(365)).naive_utc(),
            days: [Slot::default(); 7],
            months: [Slot::default(); 12],
        }
    }

    pub fn add(&mut self, date: NaiveDate, count: u64) {
        let recent = date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight >= self.cutoff)
            .unwrap_or(false);
        self.days[date.weekday().num_days_from_monday() as usize].add(count, recent);
        self.months[date.month0() as usize].add(count, recent);
    }

    /// Weekdays that received at least one entry, descending by the trailing
    /// total; ties stay in calendar order.
    pub fn per_day(&self) -> Vec<PeriodCount> {
        ranked(&self.days, &WEEKDAYS)
    }

    pub fn per_month(&self) -> Vec<PeriodCount> {
        ranked(&self.months, &MONTHS)
    }

    pub fn all_time(&self) -> u64 {
        self.days.iter().map(|slot| slot.all_time).sum()
    }
}

fn ranked(slots: &[Slot], labels: &[&'static str]) -> Vec<PeriodCount> {
    let mut out: Vec<PeriodCount> = slots
        .iter()
        .zip(labels)
        .filter(|(slot, _)| slot.seen)
        .map(|(slot, label)| PeriodCount {
            period: *label,
            last_year: slot.last_year,
            all_time: slot.all_time,
        })
        .collect();
    out.sort_by(|a, b| b.last_year.cmp(&a.last_year));
    out
}
