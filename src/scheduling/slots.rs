use tracing::debug;

use crate::{
    calendar::{weekday_of, CalendarDate, TimeOfDay},
    error::BookingResult,
    models::availability::AvailabilityWindow,
    store::SchedulingStore,
};

/// Grid of start times inside one availability window.
///
/// Cloning restarts the sequence from the same position.
#[derive(Clone, Debug)]
pub struct SlotCandidates {
    cursor: u32,
    end: u32,
    duration: u32,
    step: u32,
}

impl SlotCandidates {
    pub fn new(window: &AvailabilityWindow, duration_minutes: u32, grid_step_minutes: u32) -> Self {
        if !window.is_open || grid_step_minutes == 0 {
            return Self::empty();
        }
        SlotCandidates {
            cursor: window.start.minutes_since_midnight(),
            end: window.end.minutes_since_midnight(),
            duration: duration_minutes,
            step: grid_step_minutes,
        }
    }

    pub fn empty() -> Self {
        SlotCandidates {
            cursor: 0,
            end: 0,
            duration: 0,
            step: 1,
        }
    }
}

impl Iterator for SlotCandidates {
    type Item = TimeOfDay;

    fn next(&mut self) -> Option<TimeOfDay> {
        if self.cursor >= self.end {
            return None;
        }
        let candidate = self.cursor;
        if candidate + self.duration > self.end {
            // every later candidate ends even further out
            self.cursor = self.end;
            return None;
        }
        self.cursor += self.step;
        TimeOfDay::from_minutes(candidate)
    }
}

/// All start times the professional's hours allow on `date`, ignoring bookings.
///
/// A blocked date short-circuits before the weekday rule is read.
pub fn generate(
    store: &dyn SchedulingStore,
    professional_id: &str,
    date: CalendarDate,
    duration_minutes: u32,
    grid_step_minutes: u32,
) -> BookingResult<SlotCandidates> {
    if store.is_blocked(date)? {
        debug!(%date, "date is blocked, no candidates");
        return Ok(SlotCandidates::empty());
    }

    let weekday = weekday_of(date);
    match store.availability(professional_id, weekday)? {
        Some(window) if window.is_open => Ok(SlotCandidates::new(
            &window,
            duration_minutes,
            grid_step_minutes,
        )),
        _ => {
            debug!(professional_id, ?weekday, "closed on weekday");
            Ok(SlotCandidates::empty())
        }
    }
}
