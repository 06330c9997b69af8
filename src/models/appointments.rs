use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    calendar::{CalendarDate, TimeOfDay},
    error::BookingError,
    schema::appointments,
};

pub type AppointmentId = u64;

#[derive(Queryable)]
pub struct AppointmentData {
    pub aid: u64,
    pub pid: String,
    pub sid: u64,
    pub client_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "appointments"]
pub struct NewAppointmentData {
    pub pid: String,
    pub sid: u64,
    pub client_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: String,
    pub notes: Option<String>,
}

pub const APPOINT_STATUS_SCHEDULED: &str = "scheduled";
pub const APPOINT_STATUS_CONFIRMED: &str = "confirmed";
pub const APPOINT_STATUS_COMPLETED: &str = "completed";
pub const APPOINT_STATUS_CANCELLED: &str = "cancelled";

pub const ACTIVE_STATUSES: [&str; 2] = [APPOINT_STATUS_SCHEDULED, APPOINT_STATUS_CONFIRMED];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => APPOINT_STATUS_SCHEDULED,
            AppointmentStatus::Confirmed => APPOINT_STATUS_CONFIRMED,
            AppointmentStatus::Completed => APPOINT_STATUS_COMPLETED,
            AppointmentStatus::Cancelled => APPOINT_STATUS_CANCELLED,
        }
    }

    /// Active appointments occupy time on the ledger.
    pub fn is_active(self) -> bool {
        matches!(self, AppointmentStatus::Scheduled | AppointmentStatus::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }

    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;

        matches!(
            (self, next),
            (Scheduled, Confirmed) | (Scheduled, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            APPOINT_STATUS_SCHEDULED => Ok(AppointmentStatus::Scheduled),
            APPOINT_STATUS_CONFIRMED => Ok(AppointmentStatus::Confirmed),
            APPOINT_STATUS_COMPLETED => Ok(AppointmentStatus::Completed),
            APPOINT_STATUS_CANCELLED => Ok(AppointmentStatus::Cancelled),
            other => Err(BookingError::StorageUnavailable(format!(
                "unrecognised appointment status '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub professional_id: String,
    pub service_id: u64,
    pub client_id: String,
    pub date: CalendarDate,
    pub start: TimeOfDay,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn from_data(data: AppointmentData) -> Result<Self, BookingError> {
        Ok(Appointment {
            id: data.aid,
            professional_id: data.pid,
            service_id: data.sid,
            client_id: data.client_id,
            date: CalendarDate::from_naive(data.date),
            start: TimeOfDay::from_naive(data.start_time),
            status: data.status.parse()?,
            notes: data.notes,
        })
    }
}

/// A reservation request that passed the read-side checks.
#[derive(Clone, Debug)]
pub struct NewAppointment {
    pub professional_id: String,
    pub service_id: u64,
    pub client_id: String,
    pub date: CalendarDate,
    pub start: TimeOfDay,
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn to_data(&self) -> NewAppointmentData {
        NewAppointmentData {
            pid: self.professional_id.clone(),
            sid: self.service_id,
            client_id: self.client_id.clone(),
            date: self.date.naive(),
            start_time: self.start.naive(),
            status: APPOINT_STATUS_SCHEDULED.to_string(),
            notes: self.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppointmentStatus::*;
    use super::*;

    #[test]
    fn status_machine_only_moves_forward() {
        assert!(Scheduled.can_transition_to(Confirmed));
        assert!(Scheduled.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));

        assert!(!Scheduled.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Scheduled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Scheduled));
        assert!(!Scheduled.can_transition_to(Scheduled));
    }

    #[test]
    fn only_scheduled_and_confirmed_are_active() {
        assert!(Scheduled.is_active());
        assert!(Confirmed.is_active());
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
    }

    #[test]
    fn status_round_trips_through_column_text() {
        for status in [Scheduled, Confirmed, Completed, Cancelled].iter() {
            assert_eq!(status.as_str().parse::<AppointmentStatus>().unwrap(), *status);
        }
        assert!("pending".parse::<AppointmentStatus>().is_err());
    }
}
