use tracing::debug;

use super::{conflict, interval::Interval, resolve_duration, resolve_professional};
use crate::{
    calendar::{CalendarDate, Clock},
    error::{BookingError, BookingResult},
    models::appointments::{AppointmentId, NewAppointment},
    store::{CommitSnapshot, SchedulingStore},
};

/// Creates a `scheduled` appointment after re-validating every precondition.
///
/// The slot list a caller picked from may be stale, so nothing from an earlier
/// read is trusted. The blocked date, the window and the overlap test are all
/// decided on what the store reads inside its exclusive insert; a lost race
/// comes back as `SlotConflict` and is never retried here.
pub fn reserve(
    store: &dyn SchedulingStore,
    clock: &dyn Clock,
    request: &NewAppointment,
) -> BookingResult<AppointmentId> {
    let professional = resolve_professional(store, &request.professional_id)?;
    if !professional.is_active {
        return Err(BookingError::ProfessionalInactive(professional.pid));
    }
    let duration = resolve_duration(store, &request.professional_id, request.service_id)?;

    if clock.read().is_past(request.date, request.start) {
        return Err(BookingError::PastTime);
    }

    let candidate = Interval::new(request.start, duration);
    debug!(start = %request.start, duration, "committing reservation");
    store.insert_appointment_exclusive(request, &|snapshot| {
        admit(&candidate, request.date, snapshot)
    })
}

/// Commit-time preconditions, in the order callers see them fail.
pub fn admit(candidate: &Interval, date: CalendarDate, snapshot: &CommitSnapshot<'_>) -> BookingResult<()> {
    if snapshot.blocked {
        return Err(BookingError::DateBlocked(date));
    }
    match snapshot.window {
        Some(window) if candidate.fits_within(&window) => {}
        _ => return Err(BookingError::WindowClosed),
    }
    conflict::ensure_free(candidate, snapshot.occupied)
}
