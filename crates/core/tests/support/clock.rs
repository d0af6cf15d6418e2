use std::sync::Mutex;

use artistcal_core::LocalClock;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Clock that only moves when a test moves it.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    /// Noon on `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self::at(date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()))
    }

    pub fn at(now: NaiveDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance_days(&self, days: u64) {
        let mut now = self.now.lock().unwrap();
        *now = now.checked_add_days(Days::new(days)).unwrap();
    }

    /// Jump to the first instant of the next day.
    pub fn roll_past_midnight(&self) {
        let mut now = self.now.lock().unwrap();
        let next = now.date().succ_opt().unwrap();
        *now = next.and_time(NaiveTime::MIN);
    }
}

impl LocalClock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}
