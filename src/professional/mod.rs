mod requests;
mod responses;

use actix_web::{post, web, HttpResponse, Responder};

use crate::{
    calendar::{TimeOfDay, Weekday},
    error::BookingResult,
    models::availability::AvailabilityWindow,
    protocol::SimpleResponse,
    scheduling::Scheduler,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(set_availability).service(view_availability);
}

crate::post_funcs! {
    (set_availability, "/set_availability", SetAvailabilityRequest, SimpleResponse),
    (view_availability, "/view_availability", ViewAvailabilityRequest, ViewAvailabilityResponse),
}

async fn set_availability_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<SetAvailabilityRequest>,
) -> BookingResult<SimpleResponse> {
    let info = info.into_inner();

    let weekday = Weekday::from_number(info.weekday)?;
    let start = info.start_time.parse::<TimeOfDay>()?;
    let end = info.end_time.parse::<TimeOfDay>()?;
    let window = AvailabilityWindow::new(info.is_open, start, end)?;

    let scheduler = scheduler.get_ref().clone();
    web::block(move || scheduler.set_availability(&info.pid, weekday, window)).await?;

    Ok(SimpleResponse::ok())
}

async fn view_availability_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<ViewAvailabilityRequest>,
) -> BookingResult<ViewAvailabilityResponse> {
    let info = info.into_inner();

    let scheduler = scheduler.get_ref().clone();
    let week = web::block(move || scheduler.weekly_availability(&info.pid)).await?;

    let days = week
        .into_iter()
        .map(|(weekday, window)| AvailabilityItem {
            weekday: weekday.number(),
            is_open: window.is_open,
            start_time: window.start.to_string(),
            end_time: window.end.to_string(),
        })
        .collect();

    Ok(ViewAvailabilityResponse {
        success: true,
        days,
        ..Default::default()
    })
}
