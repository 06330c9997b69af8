//! Availability resolution and booking conflict control.
//!
//! [`Scheduler`] holds no per-request state: every operation receives the
//! professional, service and date explicitly and reads the clock once.

pub mod conflict;
pub mod interval;
pub mod reservation;
pub mod slots;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    calendar::{CalendarDate, Clock, TimeOfDay, Weekday},
    config::BookingConfig,
    error::{BookingError, BookingResult},
    models::{
        appointments::{Appointment, AppointmentId, AppointmentStatus, NewAppointment},
        availability::AvailabilityWindow,
        blocked_dates::BlockedDate,
        professionals::ProfessionalData,
    },
    store::SchedulingStore,
};

#[derive(Clone, Debug, Serialize)]
pub struct AgendaEntry {
    pub appointment: Appointment,
    pub duration_minutes: u32,
}

#[derive(Clone)]
pub struct Scheduler {
    store: Arc<dyn SchedulingStore>,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
}

pub(crate) fn resolve_professional(
    store: &dyn SchedulingStore,
    professional_id: &str,
) -> BookingResult<ProfessionalData> {
    store
        .professional(professional_id)?
        .ok_or_else(|| BookingError::UnknownProfessional(professional_id.to_string()))
}

/// Current duration of a service the professional offers.
pub(crate) fn resolve_duration(
    store: &dyn SchedulingStore,
    professional_id: &str,
    service_id: u64,
) -> BookingResult<u32> {
    let service = store
        .service(service_id)?
        .ok_or(BookingError::UnknownService(service_id))?;
    if service.duration_minutes <= 0 {
        return Err(BookingError::InvalidServiceDuration {
            service_id,
            minutes: service.duration_minutes,
        });
    }
    if !store.offers_service(professional_id, service_id)? {
        return Err(BookingError::ServiceNotOffered {
            professional_id: professional_id.to_string(),
            service_id,
        });
    }
    Ok(service.duration_minutes as u32)
}

impl Scheduler {
    pub fn new(store: Arc<dyn SchedulingStore>, clock: Arc<dyn Clock>, config: BookingConfig) -> Self {
        Scheduler {
            store,
            clock,
            config,
        }
    }

    /// Bookable start times, ascending.
    ///
    /// A blocked date, a closed weekday and an inactive professional all give
    /// an empty list; failing to read the store is an error, never an empty list.
    #[instrument(skip(self))]
    pub fn list_available_slots(
        &self,
        professional_id: &str,
        service_id: u64,
        date: CalendarDate,
    ) -> BookingResult<Vec<TimeOfDay>> {
        let store = &*self.store;
        let professional = resolve_professional(store, professional_id)?;
        let duration = resolve_duration(store, professional_id, service_id)?;
        if !professional.is_active {
            debug!("professional inactive, no slots");
            return Ok(Vec::new());
        }

        let candidates = slots::generate(
            store,
            professional_id,
            date,
            duration,
            self.config.grid_step_minutes(),
        )?;

        let clock = self.clock.read();
        let candidates = conflict::drop_past(candidates, date, &clock);
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let occupied = store.active_appointments(professional_id, date)?;
        let free = conflict::drop_conflicting(candidates, duration, &occupied);
        debug!(free = free.len(), occupied = occupied.len(), "slots resolved");

        Ok(free)
    }

    pub fn reserve(
        &self,
        professional_id: &str,
        service_id: u64,
        client_id: &str,
        date: CalendarDate,
        start: TimeOfDay,
    ) -> BookingResult<AppointmentId> {
        self.reserve_with_notes(professional_id, service_id, client_id, date, start, None)
    }

    #[instrument(skip(self, notes))]
    pub fn reserve_with_notes(
        &self,
        professional_id: &str,
        service_id: u64,
        client_id: &str,
        date: CalendarDate,
        start: TimeOfDay,
        notes: Option<String>,
    ) -> BookingResult<AppointmentId> {
        let request = NewAppointment {
            professional_id: professional_id.to_string(),
            service_id,
            client_id: client_id.to_string(),
            date,
            start,
            notes,
        };

        match reservation::reserve(&*self.store, &*self.clock, &request) {
            Ok(id) => {
                info!(appointment_id = id, "appointment reserved");
                Ok(id)
            }
            Err(BookingError::SlotConflict) => {
                info!("slot taken by a concurrent booking");
                Err(BookingError::SlotConflict)
            }
            Err(err @ BookingError::StorageUnavailable(_)) => {
                warn!(error = %err, "reservation failed");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self))]
    pub fn set_availability(
        &self,
        professional_id: &str,
        weekday: Weekday,
        window: AvailabilityWindow,
    ) -> BookingResult<()> {
        window.validate()?;
        self.store
            .upsert_availability(professional_id, weekday, &window)?;
        info!("availability updated");
        Ok(())
    }

    /// `None` means closed on that weekday.
    pub fn availability(
        &self,
        professional_id: &str,
        weekday: Weekday,
    ) -> BookingResult<Option<AvailabilityWindow>> {
        resolve_professional(&*self.store, professional_id)?;
        self.store.availability(professional_id, weekday)
    }

    /// All seven weekdays, Sunday first; unset days show as closed 09:00-18:00.
    pub fn weekly_availability(
        &self,
        professional_id: &str,
    ) -> BookingResult<Vec<(Weekday, AvailabilityWindow)>> {
        resolve_professional(&*self.store, professional_id)?;
        let configured = self.store.weekly_availability(professional_id)?;

        Ok(Weekday::ALL
            .iter()
            .map(|weekday| {
                let window = configured
                    .iter()
                    .find(|(day, _)| day == weekday)
                    .map(|(_, window)| *window)
                    .unwrap_or_else(AvailabilityWindow::default_closed);
                (*weekday, window)
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub fn block_date(&self, date: CalendarDate, reason: &str, is_holiday: bool) -> BookingResult<()> {
        self.store.insert_blocked_date(&BlockedDate {
            date,
            is_holiday,
            reason: reason.to_string(),
        })?;
        info!("date blocked");
        Ok(())
    }

    /// Returns whether the date was blocked before the call.
    #[instrument(skip(self))]
    pub fn unblock_date(&self, date: CalendarDate) -> BookingResult<bool> {
        let removed = self.store.delete_blocked_date(date)?;
        if removed {
            info!("date unblocked");
        }
        Ok(removed)
    }

    pub fn is_blocked(&self, date: CalendarDate) -> BookingResult<bool> {
        self.store.is_blocked(date)
    }

    pub fn blocked_dates(&self, from: CalendarDate, to: CalendarDate) -> BookingResult<Vec<BlockedDate>> {
        self.store.blocked_dates_between(from, to)
    }

    pub fn appointment(&self, id: AppointmentId) -> BookingResult<Appointment> {
        self.store
            .appointment(id)?
            .ok_or(BookingError::UnknownAppointment(id))
    }

    pub fn confirm(&self, id: AppointmentId) -> BookingResult<Appointment> {
        self.transition(id, AppointmentStatus::Confirmed)
    }

    pub fn complete(&self, id: AppointmentId) -> BookingResult<Appointment> {
        self.transition(id, AppointmentStatus::Completed)
    }

    pub fn cancel(&self, id: AppointmentId) -> BookingResult<Appointment> {
        self.transition(id, AppointmentStatus::Cancelled)
    }

    /// A client who showed up completes the appointment (confirming it first
    /// when needed); a no-show cancels it.
    pub fn check_in(&self, id: AppointmentId, present: bool) -> BookingResult<Appointment> {
        if !present {
            return self.cancel(id);
        }
        let appointment = self.appointment(id)?;
        if appointment.status == AppointmentStatus::Scheduled {
            self.confirm(id)?;
        }
        self.complete(id)
    }

    #[instrument(skip(self))]
    fn transition(&self, id: AppointmentId, to: AppointmentStatus) -> BookingResult<Appointment> {
        let current = self.appointment(id)?;
        if !current.status.can_transition_to(to) {
            return Err(BookingError::InvalidTransition {
                from: current.status,
                to,
            });
        }

        if !self.store.update_status(id, current.status, to)? {
            // someone else moved it between our read and write
            let now = self.appointment(id)?;
            return Err(BookingError::InvalidTransition { from: now.status, to });
        }

        info!(from = %current.status, "appointment status changed");
        Ok(Appointment {
            status: to,
            ..current
        })
    }

    /// Every appointment of the day, including terminal ones, ordered by start.
    pub fn day_agenda(&self, professional_id: &str, date: CalendarDate) -> BookingResult<Vec<AgendaEntry>> {
        resolve_professional(&*self.store, professional_id)?;
        Ok(self
            .store
            .appointments_on(professional_id, date)?
            .into_iter()
            .map(|(appointment, duration_minutes)| AgendaEntry {
                appointment,
                duration_minutes,
            })
            .collect())
    }
}
