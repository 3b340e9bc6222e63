use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// One `[from, to]` span of a `contributionsCollection` query. GitHub caps a
/// single collection at one year, so a history is split per calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from.date_naive() && date <= self.to.date_naive()
    }
}

/// Calendar-year windows covering `created_at..=now`: the first starts at the
/// account creation, the last ends at `now`, the ones between are full years.
/// Empty when `created_at` is after `now`.
pub fn year_windows(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Vec<DateWindow> {
    let mut windows = Vec::new();
    if created_at > now {
        return windows;
    }
    for year in created_at.year()..=now.year() {
        let from = if year == created_at.year() {
            Some(created_at)
        } else {
            utc(year, 1, 1, 0, 0, 0)
        };
        let to = if year == now.year() {
            Some(now)
        } else {
            utc(year, 12, 31, 23, 59, 59)
        };
        if let (Some(from), Some(to)) = (from, to) {
            windows.push(DateWindow { from, to });
        }
    }
    windows
}

fn utc(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> Option<DateTime<Utc>> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(h, m, s)?;
    Some(Utc.from_utc_datetime(&naive))
}
