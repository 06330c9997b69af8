use crate::{
    calendar::{CalendarDate, ClockReading, TimeOfDay},
    error::{BookingError, BookingResult},
    scheduling::interval::Interval,
};

pub fn drop_past<I>(candidates: I, date: CalendarDate, clock: &ClockReading) -> Vec<TimeOfDay>
where
    I: IntoIterator<Item = TimeOfDay>,
{
    candidates
        .into_iter()
        .filter(|start| !clock.has_started(date, *start))
        .collect()
}

pub fn drop_conflicting(
    candidates: Vec<TimeOfDay>,
    duration_minutes: u32,
    occupied: &[Interval],
) -> Vec<TimeOfDay> {
    candidates
        .into_iter()
        .filter(|start| first_conflict(&Interval::new(*start, duration_minutes), occupied).is_none())
        .collect()
}

pub fn first_conflict<'a>(candidate: &Interval, occupied: &'a [Interval]) -> Option<&'a Interval> {
    occupied.iter().find(|busy| busy.overlaps(candidate))
}

/// Commit-time check run under the store's write lock.
pub fn ensure_free(candidate: &Interval, occupied: &[Interval]) -> BookingResult<()> {
    match first_conflict(candidate, occupied) {
        Some(_) => Err(BookingError::SlotConflict),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn times(list: &[&str]) -> Vec<TimeOfDay> {
        list.iter().map(|s| time(s)).collect()
    }

    #[test]
    fn booked_half_hour_blocks_only_its_own_slot() {
        let occupied = vec![Interval::new(time("09:00"), 30)];
        let free = drop_conflicting(times(&["08:30", "09:00", "09:30"]), 30, &occupied);
        assert_eq!(free, times(&["08:30", "09:30"]));
    }

    #[test]
    fn long_service_is_blocked_by_later_booking() {
        let occupied = vec![Interval::new(time("10:00"), 30)];
        let free = drop_conflicting(times(&["09:00", "09:30", "10:30"]), 60, &occupied);
        assert_eq!(free, times(&["09:00", "10:30"]));
    }

    #[test]
    fn past_filter_applies_only_to_today() {
        let today = "2026-10-19".parse().unwrap();
        let clock = ClockReading {
            today,
            now: time("10:00"),
        };
        let candidates = times(&["09:30", "10:00", "10:30"]);

        assert_eq!(drop_past(candidates.clone(), today, &clock), times(&["10:30"]));

        let tomorrow = "2026-10-20".parse().unwrap();
        assert_eq!(drop_past(candidates.clone(), tomorrow, &clock), candidates);

        let last_week = "2026-10-12".parse().unwrap();
        assert_eq!(drop_past(candidates.clone(), last_week, &clock), candidates);
    }

    #[test]
    fn ensure_free_reports_conflict() {
        let occupied = vec![Interval::new(time("09:00"), 45)];
        assert!(matches!(
            ensure_free(&Interval::new(time("09:30"), 30), &occupied),
            Err(BookingError::SlotConflict)
        ));
        assert!(ensure_free(&Interval::new(time("09:45"), 30), &occupied).is_ok());
    }
}
