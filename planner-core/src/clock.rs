//! Time source for statement ids and dates.

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use std::cell::Cell;

use crate::error::{PlannerError, Result};

pub trait Clock {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
    /// Today's calendar date in the user's zone
    fn today(&self) -> NaiveDate;
}

/// Wall clock. Uses the configured IANA zone if any, otherwise the system zone.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    tz: Option<Tz>,
}

impl SystemClock {
    pub fn local() -> Self {
        Self { tz: None }
    }

    pub fn with_timezone(name: &str) -> Result<Self> {
        let tz: Tz = name
            .parse()
            .map_err(|_| PlannerError::InvalidTimezone(name.to_string()))?;
        Ok(Self { tz: Some(tz) })
    }

    pub fn timezone(&self) -> Option<Tz> {
        self.tz
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        match self.tz {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

/// Deterministic clock for tests: each `now_millis` call advances by `step`.
#[derive(Debug, Clone)]
pub struct FixedClock {
    next: Cell<i64>,
    step: i64,
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(start_millis: i64, today: NaiveDate) -> Self {
        Self {
            next: Cell::new(start_millis),
            step: 1,
            today,
        }
    }

    /// A clock that never advances, so consecutive entries share an id
    pub fn frozen(millis: i64, today: NaiveDate) -> Self {
        Self {
            next: Cell::new(millis),
            step: 0,
            today,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
