use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;

use super::{CommitCheck, CommitSnapshot, SchedulingStore};
use crate::{
    calendar::{weekday_of, CalendarDate, Weekday},
    error::{BookingError, BookingResult},
    models::{
        appointments::{Appointment, AppointmentId, AppointmentStatus, NewAppointment},
        availability::AvailabilityWindow,
        blocked_dates::BlockedDate,
        professionals::ProfessionalData,
        services::ServiceData,
    },
    scheduling::interval::Interval,
};

#[derive(Default)]
struct Inner {
    professionals: HashMap<String, ProfessionalData>,
    services: HashMap<u64, ServiceData>,
    offered: HashSet<(String, u64)>,
    availability: HashMap<(String, Weekday), AvailabilityWindow>,
    blocked: BTreeMap<CalendarDate, BlockedDate>,
    appointments: BTreeMap<AppointmentId, Appointment>,
    last_id: AppointmentId,
}

impl Inner {
    fn duration_of(&self, appointment: &Appointment) -> BookingResult<u32> {
        self.services
            .get(&appointment.service_id)
            .map(|service| service.duration_minutes.max(0) as u32)
            .ok_or_else(|| {
                BookingError::StorageUnavailable(format!(
                    "appointment {} references missing service {}",
                    appointment.id, appointment.service_id
                ))
            })
    }

    fn active_intervals(&self, professional_id: &str, date: CalendarDate) -> BookingResult<Vec<Interval>> {
        let mut intervals = Vec::new();
        for appointment in self.appointments.values() {
            if appointment.professional_id == professional_id
                && appointment.date == date
                && appointment.status.is_active()
            {
                intervals.push(Interval::new(appointment.start, self.duration_of(appointment)?));
            }
        }
        intervals.sort();
        Ok(intervals)
    }
}

/// Process-local store guarded by a single mutex.
///
/// The exclusive insert holds the mutex across the ledger re-read and the
/// write, which serialises reservations the way a row lock does in MySQL.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_professional(&self, professional_id: &str, name: &str, is_active: bool) {
        self.inner.lock().professionals.insert(
            professional_id.to_string(),
            ProfessionalData {
                pid: professional_id.to_string(),
                name: name.to_string(),
                is_active,
            },
        );
    }

    pub fn set_professional_active(&self, professional_id: &str, is_active: bool) {
        if let Some(professional) = self.inner.lock().professionals.get_mut(professional_id) {
            professional.is_active = is_active;
        }
    }

    /// Deletes the professional together with their rules, offers and appointments.
    pub fn remove_professional(&self, professional_id: &str) {
        let mut inner = self.inner.lock();
        inner.professionals.remove(professional_id);
        inner.availability.retain(|(pid, _), _| pid != professional_id);
        inner.offered.retain(|(pid, _)| pid != professional_id);
        inner
            .appointments
            .retain(|_, appointment| appointment.professional_id != professional_id);
    }

    pub fn add_service(&self, service_id: u64, name: &str, duration_minutes: u32) {
        self.inner.lock().services.insert(
            service_id,
            ServiceData {
                sid: service_id,
                name: name.to_string(),
                duration_minutes: duration_minutes as i32,
            },
        );
    }

    pub fn set_service_duration(&self, service_id: u64, duration_minutes: u32) {
        if let Some(service) = self.inner.lock().services.get_mut(&service_id) {
            service.duration_minutes = duration_minutes as i32;
        }
    }

    pub fn offer_service(&self, professional_id: &str, service_id: u64) {
        self.inner
            .lock()
            .offered
            .insert((professional_id.to_string(), service_id));
    }

    /// Makes every call fail with `StorageUnavailable` until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn lock(&self) -> BookingResult<parking_lot::MutexGuard<'_, Inner>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BookingError::StorageUnavailable(
                "memory store switched off".to_string(),
            ));
        }
        Ok(self.inner.lock())
    }
}

impl SchedulingStore for MemoryStore {
    fn professional(&self, professional_id: &str) -> BookingResult<Option<ProfessionalData>> {
        Ok(self.lock()?.professionals.get(professional_id).cloned())
    }

    fn service(&self, service_id: u64) -> BookingResult<Option<ServiceData>> {
        Ok(self.lock()?.services.get(&service_id).cloned())
    }

    fn offers_service(&self, professional_id: &str, service_id: u64) -> BookingResult<bool> {
        Ok(self
            .lock()?
            .offered
            .contains(&(professional_id.to_string(), service_id)))
    }

    fn availability(
        &self,
        professional_id: &str,
        weekday: Weekday,
    ) -> BookingResult<Option<AvailabilityWindow>> {
        Ok(self
            .lock()?
            .availability
            .get(&(professional_id.to_string(), weekday))
            .copied())
    }

    fn weekly_availability(
        &self,
        professional_id: &str,
    ) -> BookingResult<Vec<(Weekday, AvailabilityWindow)>> {
        let inner = self.lock()?;
        Ok(Weekday::ALL
            .iter()
            .filter_map(|weekday| {
                inner
                    .availability
                    .get(&(professional_id.to_string(), *weekday))
                    .map(|window| (*weekday, *window))
            })
            .collect())
    }

    fn upsert_availability(
        &self,
        professional_id: &str,
        weekday: Weekday,
        window: &AvailabilityWindow,
    ) -> BookingResult<()> {
        let mut inner = self.lock()?;
        if !inner.professionals.contains_key(professional_id) {
            return Err(BookingError::UnknownProfessional(professional_id.to_string()));
        }
        inner
            .availability
            .insert((professional_id.to_string(), weekday), *window);
        Ok(())
    }

    fn blocked_date(&self, date: CalendarDate) -> BookingResult<Option<BlockedDate>> {
        Ok(self.lock()?.blocked.get(&date).cloned())
    }

    fn blocked_dates_between(
        &self,
        from: CalendarDate,
        to: CalendarDate,
    ) -> BookingResult<Vec<BlockedDate>> {
        if from > to {
            return Ok(Vec::new());
        }
        Ok(self
            .lock()?
            .blocked
            .range(from..=to)
            .map(|(_, blocked)| blocked.clone())
            .collect())
    }

    fn insert_blocked_date(&self, blocked: &BlockedDate) -> BookingResult<()> {
        let mut inner = self.lock()?;
        if inner.blocked.contains_key(&blocked.date) {
            return Err(BookingError::DateAlreadyBlocked(blocked.date));
        }
        inner.blocked.insert(blocked.date, blocked.clone());
        Ok(())
    }

    fn delete_blocked_date(&self, date: CalendarDate) -> BookingResult<bool> {
        Ok(self.lock()?.blocked.remove(&date).is_some())
    }

    fn active_appointments(
        &self,
        professional_id: &str,
        date: CalendarDate,
    ) -> BookingResult<Vec<Interval>> {
        self.lock()?.active_intervals(professional_id, date)
    }

    fn appointments_on(
        &self,
        professional_id: &str,
        date: CalendarDate,
    ) -> BookingResult<Vec<(Appointment, u32)>> {
        let inner = self.lock()?;
        let mut agenda = Vec::new();
        for appointment in inner.appointments.values() {
            if appointment.professional_id == professional_id && appointment.date == date {
                agenda.push((appointment.clone(), inner.duration_of(appointment)?));
            }
        }
        agenda.sort_by_key(|(appointment, _)| (appointment.start, appointment.id));
        Ok(agenda)
    }

    fn appointment(&self, id: AppointmentId) -> BookingResult<Option<Appointment>> {
        Ok(self.lock()?.appointments.get(&id).cloned())
    }

    fn update_status(
        &self,
        id: AppointmentId,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> BookingResult<bool> {
        let mut inner = self.lock()?;
        match inner.appointments.get_mut(&id) {
            Some(appointment) if appointment.status == from => {
                appointment.status = to;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(BookingError::UnknownAppointment(id)),
        }
    }

    fn insert_appointment_exclusive(
        &self,
        new: &NewAppointment,
        check: CommitCheck<'_>,
    ) -> BookingResult<AppointmentId> {
        let mut inner = self.lock()?;
        if !inner.professionals.contains_key(&new.professional_id) {
            return Err(BookingError::UnknownProfessional(new.professional_id.clone()));
        }

        let occupied = inner.active_intervals(&new.professional_id, new.date)?;
        check(&CommitSnapshot {
            blocked: inner.blocked.contains_key(&new.date),
            window: inner
                .availability
                .get(&(new.professional_id.clone(), weekday_of(new.date)))
                .copied(),
            occupied: occupied.as_slice(),
        })?;

        inner.last_id += 1;
        let id = inner.last_id;
        inner.appointments.insert(
            id,
            Appointment {
                id,
                professional_id: new.professional_id.clone(),
                service_id: new.service_id,
                client_id: new.client_id.clone(),
                date: new.date,
                start: new.start,
                status: AppointmentStatus::Scheduled,
                notes: new.notes.clone(),
            },
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_professional("p1", "Ana", true);
        store.add_service(1, "Cut", 30);
        store
    }

    fn new_appointment(start: &str) -> NewAppointment {
        NewAppointment {
            professional_id: "p1".to_string(),
            service_id: 1,
            client_id: "c1".to_string(),
            date: date("2026-10-20"),
            start: start.parse().unwrap(),
            notes: None,
        }
    }

    #[test]
    fn availability_is_upserted_not_appended() {
        let store = seeded();
        let morning = AvailabilityWindow::open("08:00".parse().unwrap(), "12:00".parse().unwrap()).unwrap();
        let evening = AvailabilityWindow::open("14:00".parse().unwrap(), "20:00".parse().unwrap()).unwrap();

        store.upsert_availability("p1", Weekday::Tuesday, &morning).unwrap();
        store.upsert_availability("p1", Weekday::Tuesday, &evening).unwrap();

        assert_eq!(store.availability("p1", Weekday::Tuesday).unwrap(), Some(evening));
        assert_eq!(store.weekly_availability("p1").unwrap().len(), 1);
    }

    #[test]
    fn availability_for_unknown_professional_is_rejected() {
        let store = seeded();
        let window = AvailabilityWindow::default_closed();
        assert!(matches!(
            store.upsert_availability("ghost", Weekday::Monday, &window),
            Err(BookingError::UnknownProfessional(_))
        ));
    }

    #[test]
    fn failed_check_writes_nothing() {
        let store = seeded();
        let result = store.insert_appointment_exclusive(&new_appointment("09:00"), &|_| {
            Err(BookingError::SlotConflict)
        });
        assert!(matches!(result, Err(BookingError::SlotConflict)));
        assert!(store.appointments_on("p1", date("2026-10-20")).unwrap().is_empty());
    }

    #[test]
    fn commit_sees_blocked_date_and_weekday_rule() {
        let store = seeded();
        let window = AvailabilityWindow::open("08:00".parse().unwrap(), "12:00".parse().unwrap()).unwrap();
        store.upsert_availability("p1", Weekday::Tuesday, &window).unwrap();
        store
            .insert_blocked_date(&BlockedDate {
                date: date("2026-10-20"),
                is_holiday: false,
                reason: "Inventory".to_string(),
            })
            .unwrap();

        let result = store.insert_appointment_exclusive(&new_appointment("09:00"), &|snapshot| {
            assert!(snapshot.blocked);
            assert_eq!(snapshot.window, Some(window));
            assert!(snapshot.occupied.is_empty());
            Err(BookingError::DateBlocked(date("2026-10-20")))
        });
        assert!(matches!(result, Err(BookingError::DateBlocked(_))));
        assert!(store.appointments_on("p1", date("2026-10-20")).unwrap().is_empty());
    }

    #[test]
    fn ledger_uses_live_service_duration() {
        let store = seeded();
        store
            .insert_appointment_exclusive(&new_appointment("09:00"), &|_| Ok(()))
            .unwrap();
        store.set_service_duration(1, 60);

        let intervals = store.active_appointments("p1", date("2026-10-20")).unwrap();
        assert_eq!(intervals, vec![Interval::new("09:00".parse().unwrap(), 60)]);
    }

    #[test]
    fn status_update_is_compare_and_set() {
        let store = seeded();
        let id = store
            .insert_appointment_exclusive(&new_appointment("09:00"), &|_| Ok(()))
            .unwrap();

        assert!(store
            .update_status(id, AppointmentStatus::Scheduled, AppointmentStatus::Confirmed)
            .unwrap());
        assert!(!store
            .update_status(id, AppointmentStatus::Scheduled, AppointmentStatus::Cancelled)
            .unwrap());
        assert_eq!(store.appointment(id).unwrap().unwrap().status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn removing_professional_cascades() {
        let store = seeded();
        store
            .upsert_availability("p1", Weekday::Monday, &AvailabilityWindow::default_closed())
            .unwrap();
        store
            .insert_appointment_exclusive(&new_appointment("09:00"), &|_| Ok(()))
            .unwrap();

        store.remove_professional("p1");

        assert!(store.professional("p1").unwrap().is_none());
        assert!(store.weekly_availability("p1").unwrap().is_empty());
        assert!(store.active_appointments("p1", date("2026-10-20")).unwrap().is_empty());
    }

    #[test]
    fn switched_off_store_reports_unavailable() {
        let store = seeded();
        store.set_unavailable(true);
        assert!(matches!(
            store.is_blocked(date("2026-10-20")),
            Err(BookingError::StorageUnavailable(_))
        ));
        store.set_unavailable(false);
        assert!(!store.is_blocked(date("2026-10-20")).unwrap());
    }
}
