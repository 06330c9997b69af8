use chrono::{NaiveDate, NaiveTime};
use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};
use tracing::debug;

use super::{CommitCheck, CommitSnapshot, SchedulingStore};
use crate::{
    calendar::{weekday_of, CalendarDate, TimeOfDay, Weekday},
    database::{assert, get_db_conn, DbConn, DbPool},
    error::{BookingError, BookingResult},
    models::{
        appointments::{
            Appointment, AppointmentData, AppointmentId, AppointmentStatus, NewAppointment,
            ACTIVE_STATUSES,
        },
        availability::{AvailabilityData, AvailabilityWindow},
        blocked_dates::{BlockedDate, BlockedDateData},
        professionals::ProfessionalData,
        services::ServiceData,
    },
    scheduling::interval::Interval,
};

no_arg_sql_function!(
    last_insert_id,
    diesel::sql_types::Unsigned<diesel::sql_types::Bigint>
);

fn minutes(duration: i32) -> u32 {
    duration.max(0) as u32
}

fn active_intervals(
    conn: &MysqlConnection,
    pid: &str,
    date: CalendarDate,
) -> BookingResult<Vec<Interval>> {
    use crate::schema::{appointments, services};

    let rows = appointments::table
        .inner_join(services::table.on(appointments::sid.eq(services::sid)))
        .filter(appointments::pid.eq(pid))
        .filter(appointments::date.eq(date.naive()))
        .filter(appointments::status.eq_any(ACTIVE_STATUSES.to_vec()))
        .select((appointments::start_time, services::duration_minutes))
        .order(appointments::start_time.asc())
        .load::<(NaiveTime, i32)>(conn)?;

    Ok(rows
        .into_iter()
        .map(|(start, duration)| Interval::new(TimeOfDay::from_naive(start), minutes(duration)))
        .collect())
}

/// Diesel/MySQL backed store.
///
/// Reservations lock the professional row with `SELECT ... FOR UPDATE`, so
/// concurrent writers for one professional queue up behind each other while
/// other professionals are unaffected.
#[derive(Clone)]
pub struct MysqlStore {
    pool: DbPool,
}

impl MysqlStore {
    pub fn new(pool: DbPool) -> Self {
        MysqlStore { pool }
    }

    fn conn(&self) -> BookingResult<DbConn> {
        get_db_conn(&self.pool)
    }
}

impl SchedulingStore for MysqlStore {
    fn professional(&self, professional_id: &str) -> BookingResult<Option<ProfessionalData>> {
        use crate::schema::professionals;

        let conn = self.conn()?;
        let data = professionals::table
            .filter(professionals::pid.eq(professional_id))
            .get_result::<ProfessionalData>(&conn)
            .optional()?;
        Ok(data)
    }

    fn service(&self, service_id: u64) -> BookingResult<Option<ServiceData>> {
        use crate::schema::services;

        let conn = self.conn()?;
        let data = services::table
            .filter(services::sid.eq(service_id))
            .get_result::<ServiceData>(&conn)
            .optional()?;
        Ok(data)
    }

    fn offers_service(&self, professional_id: &str, service_id: u64) -> BookingResult<bool> {
        use crate::schema::professional_services;

        let conn = self.conn()?;
        let res = professional_services::table
            .filter(professional_services::pid.eq(professional_id))
            .filter(professional_services::sid.eq(service_id))
            .count()
            .get_result::<i64>(&conn)?;
        Ok(res > 0)
    }

    fn availability(
        &self,
        professional_id: &str,
        weekday: Weekday,
    ) -> BookingResult<Option<AvailabilityWindow>> {
        use crate::schema::professional_availability;

        let conn = self.conn()?;
        let data = professional_availability::table
            .filter(professional_availability::pid.eq(professional_id))
            .filter(professional_availability::weekday.eq(i32::from(weekday.number())))
            .get_result::<AvailabilityData>(&conn)
            .optional()?;
        Ok(data.as_ref().map(AvailabilityWindow::from_data))
    }

    fn weekly_availability(
        &self,
        professional_id: &str,
    ) -> BookingResult<Vec<(Weekday, AvailabilityWindow)>> {
        use crate::schema::professional_availability;

        let conn = self.conn()?;
        let rows = professional_availability::table
            .filter(professional_availability::pid.eq(professional_id))
            .order(professional_availability::weekday.asc())
            .get_results::<AvailabilityData>(&conn)?;

        rows.iter()
            .map(|data| -> BookingResult<_> {
                Ok((Weekday::from_number(data.weekday)?, AvailabilityWindow::from_data(data)))
            })
            .collect()
    }

    fn upsert_availability(
        &self,
        professional_id: &str,
        weekday: Weekday,
        window: &AvailabilityWindow,
    ) -> BookingResult<()> {
        use crate::schema::professional_availability;

        let conn = self.conn()?;
        let data = window.to_data(professional_id, weekday);
        conn.transaction::<_, BookingError, _>(|| {
            assert::assert_professional(&conn, professional_id)?;

            // keyed on (pid, weekday), so this replaces rather than appends
            diesel::replace_into(professional_availability::table)
                .values(data)
                .execute(&conn)?;

            Ok(())
        })
    }

    fn blocked_date(&self, date: CalendarDate) -> BookingResult<Option<BlockedDate>> {
        use crate::schema::blocked_dates;

        let conn = self.conn()?;
        let data = blocked_dates::table
            .filter(blocked_dates::date.eq(date.naive()))
            .get_result::<BlockedDateData>(&conn)
            .optional()?;
        Ok(data.map(BlockedDate::from))
    }

    fn is_blocked(&self, date: CalendarDate) -> BookingResult<bool> {
        use crate::schema::blocked_dates;

        let conn = self.conn()?;
        let res = blocked_dates::table
            .filter(blocked_dates::date.eq(date.naive()))
            .count()
            .get_result::<i64>(&conn)?;
        Ok(res > 0)
    }

    fn blocked_dates_between(
        &self,
        from: CalendarDate,
        to: CalendarDate,
    ) -> BookingResult<Vec<BlockedDate>> {
        use crate::schema::blocked_dates;

        let conn = self.conn()?;
        let rows = blocked_dates::table
            .filter(blocked_dates::date.between(from.naive(), to.naive()))
            .order(blocked_dates::date.asc())
            .get_results::<BlockedDateData>(&conn)?;
        Ok(rows.into_iter().map(BlockedDate::from).collect())
    }

    fn insert_blocked_date(&self, blocked: &BlockedDate) -> BookingResult<()> {
        use crate::schema::blocked_dates;

        let conn = self.conn()?;
        diesel::insert_into(blocked_dates::table)
            .values(BlockedDateData::from(blocked))
            .execute(&conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    BookingError::DateAlreadyBlocked(blocked.date)
                }
                other => other.into(),
            })?;
        Ok(())
    }

    fn delete_blocked_date(&self, date: CalendarDate) -> BookingResult<bool> {
        use crate::schema::blocked_dates;

        let conn = self.conn()?;
        let res = diesel::delete(blocked_dates::table.filter(blocked_dates::date.eq(date.naive())))
            .execute(&conn)?;
        Ok(res > 0)
    }

    fn active_appointments(
        &self,
        professional_id: &str,
        date: CalendarDate,
    ) -> BookingResult<Vec<Interval>> {
        let conn = self.conn()?;
        active_intervals(&conn, professional_id, date)
    }

    fn appointments_on(
        &self,
        professional_id: &str,
        date: CalendarDate,
    ) -> BookingResult<Vec<(Appointment, u32)>> {
        use crate::schema::{appointments, services};

        let conn = self.conn()?;
        let rows = appointments::table
            .inner_join(services::table.on(appointments::sid.eq(services::sid)))
            .filter(appointments::pid.eq(professional_id))
            .filter(appointments::date.eq(date.naive()))
            .select((appointments::all_columns, services::duration_minutes))
            .order((appointments::start_time.asc(), appointments::aid.asc()))
            .load::<(AppointmentData, i32)>(&conn)?;

        rows.into_iter()
            .map(|(data, duration)| -> BookingResult<_> {
                Ok((Appointment::from_data(data)?, minutes(duration)))
            })
            .collect()
    }

    fn appointment(&self, id: AppointmentId) -> BookingResult<Option<Appointment>> {
        use crate::schema::appointments;

        let conn = self.conn()?;
        let data = appointments::table
            .filter(appointments::aid.eq(id))
            .get_result::<AppointmentData>(&conn)
            .optional()?;
        data.map(Appointment::from_data).transpose()
    }

    fn update_status(
        &self,
        id: AppointmentId,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> BookingResult<bool> {
        use crate::schema::appointments;

        let conn = self.conn()?;
        conn.transaction::<_, BookingError, _>(|| {
            assert::assert_appointment(&conn, id)?;

            let res = diesel::update(
                appointments::table
                    .filter(appointments::aid.eq(id))
                    .filter(appointments::status.eq(from.as_str())),
            )
            .set(appointments::status.eq(to.as_str()))
            .execute(&conn)?;

            Ok(res == 1)
        })
    }

    fn insert_appointment_exclusive(
        &self,
        new: &NewAppointment,
        check: CommitCheck<'_>,
    ) -> BookingResult<AppointmentId> {
        use crate::schema::{appointments, blocked_dates, professional_availability};

        let conn = self.conn()?;
        conn.transaction::<_, BookingError, _>(|| {
            assert::lock_professional(&conn, &new.professional_id)?;

            // locking reads: a concurrent block or rule change waits for this
            // transaction, or is already visible to it
            let blocked = blocked_dates::table
                .filter(blocked_dates::date.eq(new.date.naive()))
                .select(blocked_dates::date)
                .for_update()
                .load::<NaiveDate>(&conn)?;
            let window = professional_availability::table
                .filter(professional_availability::pid.eq(&new.professional_id))
                .filter(professional_availability::weekday.eq(i32::from(weekday_of(new.date).number())))
                .for_update()
                .get_result::<AvailabilityData>(&conn)
                .optional()?;

            let occupied = active_intervals(&conn, &new.professional_id, new.date)?;
            check(&CommitSnapshot {
                blocked: !blocked.is_empty(),
                window: window.as_ref().map(AvailabilityWindow::from_data),
                occupied: occupied.as_slice(),
            })?;

            diesel::insert_into(appointments::table)
                .values(new.to_data())
                .execute(&conn)?;
            let aid = diesel::select(last_insert_id).get_result::<u64>(&conn)?;

            debug!(aid, occupied = occupied.len(), "appointment row inserted");
            Ok(aid)
        })
    }
}
