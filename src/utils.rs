#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:expr, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    scheduler: web::Data<Scheduler>,
                    info: web::Json<$request>
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](scheduler, info).await {
                        Ok(response) => response,
                        Err(err) => {
                            tracing::debug!(
                                handler = stringify!($func_name),
                                code = err.code(),
                                "request rejected: {}",
                                err
                            );
                            <$response>::err(&err)
                        }
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}

use std::str::FromStr;

use actix_web::error::BlockingError;

use crate::{
    calendar::CalendarDate,
    error::{BookingError, BookingResult},
};

impl From<BlockingError<BookingError>> for BookingError {
    fn from(err: BlockingError<BookingError>) -> Self {
        match err {
            BlockingError::Error(err) => err,
            BlockingError::Canceled => {
                BookingError::StorageUnavailable("blocking task canceled".to_string())
            }
        }
    }
}

pub fn parse_date<S: AsRef<str>>(s: S) -> BookingResult<CalendarDate> {
    CalendarDate::from_str(s.as_ref())
}

/// Missing bounds open the range to 1901-01-01 and 2901-01-01.
pub fn parse_date_range_opt<S1: AsRef<str>, S2: AsRef<str>>(
    from: Option<S1>,
    to: Option<S2>,
) -> BookingResult<(CalendarDate, CalendarDate)> {
    let from = match from {
        Some(s) => parse_date(s)?,
        None => CalendarDate::from_ymd(1901, 1, 1)?,
    };
    let to = match to {
        Some(s) => parse_date(s)?,
        None => CalendarDate::from_ymd(2901, 1, 1)?,
    };
    Ok((from, to))
}
