use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

/// Calendar arithmetic in the campus time zone. The campus "day" decides
/// what counts as due today and when the daily jobs fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CampusClock {
    offset: FixedOffset,
}

impl Default for CampusClock {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }
}

impl CampusClock {
    pub fn from_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours.checked_mul(3600)?).map(|offset| Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Last instant of the campus day containing `now`.
    pub fn end_of_day(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let next_midnight = self.today(now).and_time(NaiveTime::MIN) + Duration::days(1);
        self.to_utc(next_midnight) - Duration::nanoseconds(1)
    }

    pub fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        Utc.from_utc_datetime(&(local - Duration::seconds(self.offset.local_minus_utc() as i64)))
    }

    /// First instant strictly after `now` whose campus wall time is `at`.
    pub fn next_daily_run(&self, now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
        let candidate = self.to_utc(self.today(now).and_time(at));
        if candidate > now {
            candidate
        } else {
            candidate + Duration::days(1)
        }
    }
}
