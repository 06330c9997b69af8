use chrono::NaiveDate;
use serde::Serialize;

use crate::{calendar::CalendarDate, schema::blocked_dates};

#[derive(Queryable, Insertable)]
#[table_name = "blocked_dates"]
pub struct BlockedDateData {
    pub date: NaiveDate,
    pub is_holiday: bool,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockedDate {
    pub date: CalendarDate,
    pub is_holiday: bool,
    pub reason: String,
}

impl From<BlockedDateData> for BlockedDate {
    fn from(data: BlockedDateData) -> Self {
        BlockedDate {
            date: CalendarDate::from_naive(data.date),
            is_holiday: data.is_holiday,
            reason: data.reason,
        }
    }
}

impl From<&BlockedDate> for BlockedDateData {
    fn from(blocked: &BlockedDate) -> Self {
        BlockedDateData {
            date: blocked.date.naive(),
            is_holiday: blocked.is_holiday,
            reason: blocked.reason.clone(),
        }
    }
}
