use thiserror::Error;

use crate::{calendar::CalendarDate, models::appointments::AppointmentStatus};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("invalid calendar date: {0}")]
    InvalidDate(String),

    #[error("invalid time of day: {0}")]
    InvalidTime(String),

    #[error("invalid weekday number: {0}")]
    InvalidWeekday(i32),

    #[error("invalid availability window: {0}")]
    InvalidWindow(String),

    #[error("no such professional: {0}")]
    UnknownProfessional(String),

    #[error("professional {0} is not active")]
    ProfessionalInactive(String),

    #[error("no such service: {0}")]
    UnknownService(u64),

    #[error("service {service_id} has unusable duration {minutes}")]
    InvalidServiceDuration { service_id: u64, minutes: i32 },

    #[error("service {service_id} is not offered by professional {professional_id}")]
    ServiceNotOffered {
        professional_id: String,
        service_id: u64,
    },

    #[error("no such appointment: {0}")]
    UnknownAppointment(u64),

    #[error("date {0} is blocked")]
    DateBlocked(CalendarDate),

    #[error("date {0} is already blocked")]
    DateAlreadyBlocked(CalendarDate),

    #[error("requested time is outside the professional's working hours")]
    WindowClosed,

    #[error("requested time has already passed")]
    PastTime,

    #[error("requested time overlaps an existing appointment")]
    SlotConflict,

    #[error("cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl BookingError {
    /// Stable identifier for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::InvalidDate(_) => "invalid_date",
            BookingError::InvalidTime(_) => "invalid_time",
            BookingError::InvalidWeekday(_) => "invalid_weekday",
            BookingError::InvalidWindow(_) => "invalid_window",
            BookingError::UnknownProfessional(_) => "unknown_professional",
            BookingError::ProfessionalInactive(_) => "professional_inactive",
            BookingError::UnknownService(_) => "unknown_service",
            BookingError::InvalidServiceDuration { .. } => "invalid_service_duration",
            BookingError::ServiceNotOffered { .. } => "service_not_offered",
            BookingError::UnknownAppointment(_) => "unknown_appointment",
            BookingError::DateBlocked(_) => "date_blocked",
            BookingError::DateAlreadyBlocked(_) => "date_already_blocked",
            BookingError::WindowClosed => "window_closed",
            BookingError::PastTime => "past_time",
            BookingError::SlotConflict => "slot_conflict",
            BookingError::InvalidTransition { .. } => "invalid_transition",
            BookingError::StorageUnavailable(_) => "storage_unavailable",
        }
    }

    /// Whether the caller may simply try again (possibly with another slot).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BookingError::SlotConflict | BookingError::PastTime | BookingError::StorageUnavailable(_)
        )
    }
}

impl From<r2d2::Error> for BookingError {
    fn from(err: r2d2::Error) -> Self {
        BookingError::StorageUnavailable(format!("DB connection: {}", err))
    }
}

impl From<diesel::result::Error> for BookingError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            // another writer got there first
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => BookingError::SlotConflict,
            Error::DatabaseError(_, ref info) if info.message().contains("Deadlock") => {
                BookingError::SlotConflict
            }
            other => BookingError::StorageUnavailable(format!("DB error: {}", other)),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_typed_and_recoverable() {
        let err = BookingError::SlotConflict;
        assert_eq!(err.code(), "slot_conflict");
        assert!(err.is_recoverable());
        assert!(!BookingError::UnknownService(3).is_recoverable());
        assert!(!BookingError::InvalidServiceDuration {
            service_id: 3,
            minutes: 0
        }
        .is_recoverable());
    }

    #[test]
    fn storage_failure_is_distinct_from_closed() {
        let err = BookingError::from(diesel::result::Error::NotFound);
        assert_eq!(err.code(), "storage_unavailable");
        assert_ne!(err.code(), BookingError::WindowClosed.code());
    }
}
