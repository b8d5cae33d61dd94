use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use std::fmt::{Display, Formatter};

/// A calendar day in the viewer's local calendar, stored as days since the common era.
///
/// Every "same day" comparison goes through this key instead of comparing calendar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(i32);

impl DayKey {
    pub fn of(datetime: &NaiveDateTime) -> Self {
        Self::from_date(datetime.date())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.num_days_from_ce())
    }

    pub fn date(self) -> NaiveDate {
        NaiveDate::from_num_days_from_ce_opt(self.0).unwrap_or(NaiveDate::MIN)
    }

    /// Midnight at the start of the day.
    pub fn start(self) -> NaiveDateTime {
        self.date().and_time(NaiveTime::MIN)
    }

    /// The last millisecond of the day (23:59:59.999).
    pub fn end(self) -> NaiveDateTime {
        self.next().start() - TimeDelta::milliseconds(1)
    }

    pub fn offset(self, days: i32) -> Self {
        Self(self.0 + days)
    }

    pub fn next(self) -> Self {
        self.offset(1)
    }

    pub fn prev(self) -> Self {
        self.offset(-1)
    }

    pub fn is_weekend(self) -> bool {
        matches!(self.date().weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// The Monday of the ISO week this day belongs to.
    pub fn iso_week_start(self) -> Self {
        let from_monday = self.date().weekday().num_days_from_monday() as i32;
        self.offset(-from_monday)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date().format("%d.%m.%Y"))
    }
}
