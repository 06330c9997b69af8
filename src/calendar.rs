use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{Datelike, FixedOffset, Local, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BookingError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A plain (year, month, day) triple.
///
/// Never carries a time of day or a timezone, so the weekday is a pure
/// function of the three components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, BookingError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(CalendarDate)
            .ok_or_else(|| BookingError::InvalidDate(format!("{}-{:02}-{:02}", year, month, day)))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        weekday_of(*self)
    }

    pub(crate) fn from_naive(date: NaiveDate) -> Self {
        CalendarDate(date)
    }

    pub(crate) fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl FromStr for CalendarDate {
    type Err = BookingError;

    /// Parses `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BookingError::InvalidDate(s.to_string());

        let mut parts = s.trim().splitn(3, '-');
        let year = parts.next().and_then(|p| p.parse::<i32>().ok()).ok_or_else(invalid)?;
        let month = parts.next().and_then(|p| p.parse::<u32>().ok()).ok_or_else(invalid)?;
        let day = parts.next().and_then(|p| p.parse::<u32>().ok()).ok_or_else(invalid)?;

        CalendarDate::from_ymd(year, month, day)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Day of week, numbered from Sunday = 0 to Saturday = 6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: i32) -> Result<Self, BookingError> {
        if (0..7).contains(&n) {
            Ok(Weekday::ALL[n as usize])
        } else {
            Err(BookingError::InvalidWeekday(n))
        }
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let n = i32::deserialize(deserializer)?;
        Weekday::from_number(n).map_err(de::Error::custom)
    }
}

pub fn weekday_of(date: CalendarDate) -> Weekday {
    Weekday::ALL[date.0.weekday().num_days_from_sunday() as usize]
}

pub fn compare(a: CalendarDate, b: CalendarDate) -> Ordering {
    a.cmp(&b)
}

/// Wall-clock hour and minute in the tenant's timezone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, BookingError> {
        if hour >= 24 || minute >= 60 {
            return Err(BookingError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(TimeOfDay {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(TimeOfDay {
                minutes: minutes as u16,
            })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.minutes) / 60
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minutes) % 60
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.minutes)
    }

    /// Truncates seconds and below.
    pub(crate) fn from_naive(time: NaiveTime) -> Self {
        TimeOfDay {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }

    pub(crate) fn naive(&self) -> NaiveTime {
        NaiveTime::from_hms(self.hour(), self.minute(), 0)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = BookingError;

    /// Parses `HH:MM`, also accepting `HH:MM:00` as stored by SQL `TIME` columns.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BookingError::InvalidTime(s.to_string());

        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [h, m] | [h, m, "00"] => {
                let hour = h.parse::<u32>().map_err(|_| invalid())?;
                let minute = m.parse::<u32>().map_err(|_| invalid())?;
                TimeOfDay::from_hm(hour, minute).map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// One reading of the wall clock, used as the single "now" of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockReading {
    pub today: CalendarDate,
    pub now: TimeOfDay,
}

impl ClockReading {
    /// A start is past when its day is over, or it is today and not after the current minute.
    pub fn is_past(&self, date: CalendarDate, start: TimeOfDay) -> bool {
        match compare(date, self.today) {
            Ordering::Less => true,
            Ordering::Equal => start <= self.now,
            Ordering::Greater => false,
        }
    }

    /// Listing cutoff: only today's starts up to the current minute are gone.
    pub fn has_started(&self, date: CalendarDate, start: TimeOfDay) -> bool {
        date == self.today && start <= self.now
    }
}

pub trait Clock: Send + Sync {
    fn read(&self) -> ClockReading;

    fn today(&self) -> CalendarDate {
        self.read().today
    }
}

/// Reads the system clock in the tenant's timezone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn local() -> Self {
        SystemClock { offset: None }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        SystemClock {
            offset: Some(offset),
        }
    }
}

impl Clock for SystemClock {
    fn read(&self) -> ClockReading {
        let now = match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        };
        ClockReading {
            today: CalendarDate::from_naive(now.date()),
            now: TimeOfDay::from_naive(now.time()),
        }
    }
}

/// A clock frozen at one reading.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub ClockReading);

impl FixedClock {
    pub fn at(today: CalendarDate, now: TimeOfDay) -> Self {
        FixedClock(ClockReading { today, now })
    }
}

impl Clock for FixedClock {
    fn read(&self) -> ClockReading {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn time(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn weekday_of_known_dates() {
        assert_eq!(weekday_of(date("2000-01-01")), Weekday::Saturday);
        assert_eq!(weekday_of(date("2024-02-29")), Weekday::Thursday);
        assert_eq!(weekday_of(date("2026-10-19")), Weekday::Monday);
        assert_eq!(weekday_of(date("2026-10-20")), Weekday::Tuesday);
        assert_eq!(weekday_of(date("1970-01-01")), Weekday::Thursday);
        assert_eq!(weekday_of(date("2026-10-25")).number(), 0);
    }

    #[test]
    fn weekday_around_year_boundary() {
        // a classic off-by-one point when dates go through UTC timestamps
        assert_eq!(weekday_of(date("2025-12-31")), Weekday::Wednesday);
        assert_eq!(weekday_of(date("2026-01-01")), Weekday::Thursday);
    }

    #[test]
    fn rejects_non_calendar_triples() {
        assert!(matches!(
            CalendarDate::from_ymd(2026, 13, 1),
            Err(BookingError::InvalidDate(_))
        ));
        assert!(matches!(
            CalendarDate::from_ymd(2026, 2, 29),
            Err(BookingError::InvalidDate(_))
        ));
        assert!(CalendarDate::from_ymd(2024, 2, 29).is_ok());
        assert!("2026-1x-01".parse::<CalendarDate>().is_err());
        assert!("2026-10".parse::<CalendarDate>().is_err());
    }

    #[test]
    fn date_equality_and_order() {
        let a = CalendarDate::from_ymd(2026, 3, 9).unwrap();
        assert_eq!(a, date("2026-03-09"));
        assert_eq!(compare(a, date("2026-03-10")), Ordering::Less);
        assert_eq!(compare(a, a), Ordering::Equal);
        assert_eq!(a.to_string(), "2026-03-09");
    }

    #[test]
    fn time_of_day_parsing() {
        assert_eq!(time("09:30").minutes_since_midnight(), 570);
        assert_eq!(time("17:00:00"), time("17:00"));
        assert_eq!(time("08:05").to_string(), "08:05");
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("10:60".parse::<TimeOfDay>().is_err());
        assert!("10:15:30".parse::<TimeOfDay>().is_err());
        assert!(time("08:00") < time("08:01"));
    }

    #[test]
    fn past_cutoff() {
        let reading = ClockReading {
            today: date("2026-10-19"),
            now: time("10:00"),
        };
        assert!(reading.is_past(date("2026-10-19"), time("09:30")));
        assert!(reading.is_past(date("2026-10-19"), time("10:00")));
        assert!(!reading.is_past(date("2026-10-19"), time("10:30")));
        assert!(!reading.is_past(date("2026-10-20"), time("00:00")));
        assert!(reading.is_past(date("2026-10-18"), time("23:30")));
    }

    #[test]
    fn listing_cutoff_ignores_other_days() {
        let reading = ClockReading {
            today: date("2026-10-19"),
            now: time("10:00"),
        };
        assert!(reading.has_started(date("2026-10-19"), time("10:00")));
        assert!(!reading.has_started(date("2026-10-19"), time("10:01")));
        assert!(!reading.has_started(date("2026-10-18"), time("09:00")));
        assert!(!reading.has_started(date("2026-10-20"), time("09:00")));
    }

    #[test]
    fn fixed_offset_clock_reads_date_in_tenant_zone() {
        let clock = SystemClock::with_offset(FixedOffset::east_opt(0).unwrap());
        let reading = clock.read();
        assert!(reading.today.year() >= 2024);
        assert!(reading.now.minutes_since_midnight() < MINUTES_PER_DAY);
    }
}
