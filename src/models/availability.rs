use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::{
    calendar::{TimeOfDay, Weekday},
    error::BookingError,
    schema::professional_availability,
};

#[derive(Queryable, Insertable)]
#[table_name = "professional_availability"]
pub struct AvailabilityData {
    pub pid: String,
    pub weekday: i32,
    pub is_open: bool,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Working hours of one professional on one weekday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub is_open: bool,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl AvailabilityWindow {
    pub fn new(is_open: bool, start: TimeOfDay, end: TimeOfDay) -> Result<Self, BookingError> {
        let window = AvailabilityWindow {
            is_open,
            start,
            end,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn open(start: TimeOfDay, end: TimeOfDay) -> Result<Self, BookingError> {
        Self::new(true, start, end)
    }

    /// Hours shown for a weekday that has never been configured.
    pub fn default_closed() -> Self {
        AvailabilityWindow {
            is_open: false,
            start: TimeOfDay::from_minutes(9 * 60).unwrap_or_default(),
            end: TimeOfDay::from_minutes(18 * 60).unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<(), BookingError> {
        if self.is_open && self.start >= self.end {
            return Err(BookingError::InvalidWindow(format!(
                "start {} must be before end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    pub fn from_data(data: &AvailabilityData) -> Self {
        AvailabilityWindow {
            is_open: data.is_open,
            start: TimeOfDay::from_naive(data.start_time),
            end: TimeOfDay::from_naive(data.end_time),
        }
    }

    pub fn to_data(&self, professional_id: &str, weekday: Weekday) -> AvailabilityData {
        AvailabilityData {
            pid: professional_id.to_string(),
            weekday: i32::from(weekday.number()),
            is_open: self.is_open,
            start_time: self.start.naive(),
            end_time: self.end.naive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn open_window_needs_start_before_end() {
        assert!(AvailabilityWindow::open(time("08:00"), time("18:00")).is_ok());
        assert!(matches!(
            AvailabilityWindow::open(time("18:00"), time("08:00")),
            Err(BookingError::InvalidWindow(_))
        ));
        assert!(AvailabilityWindow::open(time("09:00"), time("09:00")).is_err());
    }

    #[test]
    fn closed_window_hours_are_not_checked() {
        assert!(AvailabilityWindow::new(false, time("18:00"), time("08:00")).is_ok());
    }

    #[test]
    fn default_is_closed_nine_to_six() {
        let window = AvailabilityWindow::default_closed();
        assert!(!window.is_open);
        assert_eq!(window.start, time("09:00"));
        assert_eq!(window.end, time("18:00"));
    }
}
