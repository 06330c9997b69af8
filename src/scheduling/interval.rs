use serde::Serialize;

use crate::{calendar::TimeOfDay, models::availability::AvailabilityWindow};

/// Half-open span `[start, start + duration)` on one day, in minutes since midnight.
///
/// The end may run past midnight; it is only ever compared, never turned back
/// into a `TimeOfDay`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Interval {
    start: u32,
    duration: u32,
}

impl Interval {
    pub fn new(start: TimeOfDay, duration_minutes: u32) -> Self {
        Interval {
            start: start.minutes_since_midnight(),
            duration: duration_minutes,
        }
    }

    pub fn start(&self) -> TimeOfDay {
        TimeOfDay::from_minutes(self.start).unwrap_or_default()
    }

    pub fn end_minutes(&self) -> u32 {
        self.start + self.duration
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end_minutes() && other.start < self.end_minutes()
    }

    pub fn fits_within(&self, window: &AvailabilityWindow) -> bool {
        window.is_open
            && self.start >= window.start.minutes_since_midnight()
            && self.end_minutes() <= window.end.minutes_since_midnight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str, duration: u32) -> Interval {
        Interval::new(s.parse().unwrap(), duration)
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!at("09:00", 30).overlaps(&at("09:30", 30)));
        assert!(!at("09:30", 30).overlaps(&at("09:00", 30)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let pairs = [
            (at("09:00", 60), at("09:30", 15)),
            (at("09:00", 45), at("09:30", 30)),
            (at("10:00", 30), at("09:45", 30)),
            (at("08:00", 600), at("12:00", 5)),
        ];
        for (a, b) in pairs.iter() {
            assert!(a.overlaps(b));
            assert!(b.overlaps(a));
        }
    }

    #[test]
    fn disjoint_intervals() {
        assert!(!at("09:00", 30).overlaps(&at("11:00", 30)));
        assert!(!at("23:30", 60).overlaps(&at("08:00", 30)));
    }

    #[test]
    fn end_may_pass_midnight() {
        let late = at("23:30", 60);
        assert_eq!(late.end_minutes(), 24 * 60 + 30);
        assert_eq!(late.start().to_string(), "23:30");
    }

    #[test]
    fn fits_within_window() {
        let window = AvailabilityWindow::open("08:00".parse().unwrap(), "18:00".parse().unwrap()).unwrap();
        assert!(at("17:00", 60).fits_within(&window));
        assert!(!at("17:30", 60).fits_within(&window));
        assert!(!at("07:30", 60).fits_within(&window));

        let closed = AvailabilityWindow { is_open: false, ..window };
        assert!(!at("09:00", 30).fits_within(&closed));
    }
}
