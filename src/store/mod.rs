//! Storage seam for the scheduling core.
//!
//! Every method reflects the latest committed state at call time. The only
//! write that must be atomic with respect to concurrent callers is
//! [`SchedulingStore::insert_appointment_exclusive`].

mod memory;
mod mysql;

pub use memory::MemoryStore;
pub use mysql::MysqlStore;

use crate::{
    calendar::{CalendarDate, Weekday},
    error::BookingResult,
    models::{
        appointments::{Appointment, AppointmentId, AppointmentStatus, NewAppointment},
        availability::AvailabilityWindow,
        blocked_dates::BlockedDate,
        professionals::ProfessionalData,
        services::ServiceData,
    },
    scheduling::interval::Interval,
};

/// State of one `(professional, date)` as read inside the write lock.
#[derive(Clone, Copy, Debug)]
pub struct CommitSnapshot<'a> {
    pub blocked: bool,
    /// Rule for the date's weekday; `None` when unset.
    pub window: Option<AvailabilityWindow>,
    pub occupied: &'a [Interval],
}

/// Validation run on the snapshot before the row is written.
pub type CommitCheck<'a> = &'a dyn Fn(&CommitSnapshot<'_>) -> BookingResult<()>;

pub trait SchedulingStore: Send + Sync {
    fn professional(&self, professional_id: &str) -> BookingResult<Option<ProfessionalData>>;

    fn service(&self, service_id: u64) -> BookingResult<Option<ServiceData>>;

    fn offers_service(&self, professional_id: &str, service_id: u64) -> BookingResult<bool>;

    fn availability(
        &self,
        professional_id: &str,
        weekday: Weekday,
    ) -> BookingResult<Option<AvailabilityWindow>>;

    /// Configured weekdays only, ordered by weekday.
    fn weekly_availability(
        &self,
        professional_id: &str,
    ) -> BookingResult<Vec<(Weekday, AvailabilityWindow)>>;

    /// Replaces any existing rule for the pair.
    fn upsert_availability(
        &self,
        professional_id: &str,
        weekday: Weekday,
        window: &AvailabilityWindow,
    ) -> BookingResult<()>;

    fn blocked_date(&self, date: CalendarDate) -> BookingResult<Option<BlockedDate>>;

    fn is_blocked(&self, date: CalendarDate) -> BookingResult<bool> {
        Ok(self.blocked_date(date)?.is_some())
    }

    /// Inclusive on both ends, ordered by date.
    fn blocked_dates_between(
        &self,
        from: CalendarDate,
        to: CalendarDate,
    ) -> BookingResult<Vec<BlockedDate>>;

    /// Fails with `DateAlreadyBlocked` when the date is present.
    fn insert_blocked_date(&self, blocked: &BlockedDate) -> BookingResult<()>;

    /// Returns whether a row was removed.
    fn delete_blocked_date(&self, date: CalendarDate) -> BookingResult<bool>;

    /// Scheduled and confirmed appointments of one professional on one date,
    /// each with the current duration of its service.
    fn active_appointments(
        &self,
        professional_id: &str,
        date: CalendarDate,
    ) -> BookingResult<Vec<Interval>>;

    /// Every appointment of the professional on the date with its duration, ordered by start.
    fn appointments_on(
        &self,
        professional_id: &str,
        date: CalendarDate,
    ) -> BookingResult<Vec<(Appointment, u32)>>;

    fn appointment(&self, id: AppointmentId) -> BookingResult<Option<Appointment>>;

    /// Compare-and-set on the status column. Returns false when the stored
    /// status is no longer `from`, `UnknownAppointment` when there is no row.
    fn update_status(
        &self,
        id: AppointmentId,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> BookingResult<bool>;

    /// Under a per-professional exclusive lock, re-reads the blocked flag of the
    /// date, the weekday rule and the ledger for `(professional, date)`, runs
    /// `check` on them and inserts a `scheduled` row only if the check passes.
    /// Nothing is written on failure.
    fn insert_appointment_exclusive(
        &self,
        new: &NewAppointment,
        check: CommitCheck<'_>,
    ) -> BookingResult<AppointmentId>;
}
