use diesel::prelude::*;

use crate::error::{BookingError, BookingResult};

pub fn assert_professional(conn: &MysqlConnection, pid: &str) -> BookingResult<()> {
    use crate::schema::professionals;

    let res = professionals::table
        .filter(professionals::pid.eq(pid))
        .count()
        .get_result::<i64>(conn)?;

    if res == 0 {
        return Err(BookingError::UnknownProfessional(pid.to_string()));
    }

    Ok(())
}

/// Takes the row lock that serialises writers for one professional until the
/// surrounding transaction ends.
pub fn lock_professional(conn: &MysqlConnection, pid: &str) -> BookingResult<()> {
    use crate::schema::professionals;

    let res = professionals::table
        .filter(professionals::pid.eq(pid))
        .select(professionals::pid)
        .for_update()
        .get_result::<String>(conn)
        .optional()?;

    if res.is_none() {
        return Err(BookingError::UnknownProfessional(pid.to_string()));
    }

    Ok(())
}

pub fn assert_appointment(conn: &MysqlConnection, aid: u64) -> BookingResult<()> {
    use crate::schema::appointments;

    let res = appointments::table
        .filter(appointments::aid.eq(aid))
        .count()
        .get_result::<i64>(conn)?;

    if res == 0 {
        return Err(BookingError::UnknownAppointment(aid));
    }

    Ok(())
}
