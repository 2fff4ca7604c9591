//! Time source abstraction.
//!
//! Every rule that depends on "today" (expiry, future visits, today's visit
//! count) takes the date from a `Clock` so it can be pinned in tests.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub trait Clock: Send + Sync + 'static {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current wall-clock date and time in the clinic's time zone.
    fn local_now(&self) -> NaiveDateTime;

    /// Current calendar date in the clinic's time zone.
    fn today(&self) -> NaiveDate {
        self.local_now().date()
    }
}

/// Wall clock.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        self.now().with_timezone(&Local).naive_local()
    }
}

/// Clock pinned to a single instant, with the clinic on UTC.
#[derive(Debug, Copy, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Noon UTC on `date`; `today()` then returns `date`.
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default();
        Self::new(Utc.from_utc_datetime(&noon))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn local_now(&self) -> NaiveDateTime {
        self.now.naive_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_pinned_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now().date_naive(), date);
    }

    #[test]
    fn fixed_clock_date_and_time_agree_near_midnight() {
        let late = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(23, 59, 30)
            .unwrap();
        let clock = FixedClock::new(Utc.from_utc_datetime(&late));
        assert_eq!(clock.local_now(), late);
        assert_eq!(clock.today(), late.date());
    }

    #[test]
    fn system_clock_today_matches_local_now() {
        let clock = SystemClock;
        let local = clock.local_now();
        let today = clock.today();
        // Allow a date rollover between the two reads.
        assert!(today == local.date() || today.pred_opt() == Some(local.date()));
    }
}
