// src/clock.rs
use chrono::{Datelike, Local, NaiveDate};

use crate::plan::Day;

/// Read-only source of "today".
pub trait Clock {
    fn today(&self) -> NaiveDate;

    fn weekday(&self) -> Day {
        Day::from(self.today().weekday())
    }
}

/// Local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
