mod requests;
mod responses;

use actix_web::{post, web, HttpResponse, Responder};

use crate::{
    calendar::TimeOfDay,
    error::BookingResult,
    models::appointments::Appointment,
    scheduling::{interval::Interval, Scheduler},
    utils::parse_date,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_slots)
        .service(reserve)
        .service(confirm)
        .service(complete)
        .service(cancel)
        .service(check_in)
        .service(day_agenda);
}

crate::post_funcs! {
    (list_slots, "/list_slots", ListSlotsRequest, ListSlotsResponse),
    (reserve, "/reserve", ReserveRequest, ReserveResponse),
    (confirm, "/confirm", AppointmentRequest, StatusResponse),
    (complete, "/complete", AppointmentRequest, StatusResponse),
    (cancel, "/cancel", AppointmentRequest, StatusResponse),
    (check_in, "/check_in", CheckInRequest, StatusResponse),
    (day_agenda, "/day_agenda", DayAgendaRequest, DayAgendaResponse),
}

fn status_response(appointment: Appointment) -> StatusResponse {
    StatusResponse {
        success: true,
        aid: appointment.id,
        status: appointment.status.to_string(),
        ..Default::default()
    }
}

async fn list_slots_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<ListSlotsRequest>,
) -> BookingResult<ListSlotsResponse> {
    let info = info.into_inner();
    let date = parse_date(&info.date)?;

    let scheduler = scheduler.get_ref().clone();
    let slots = web::block(move || scheduler.list_available_slots(&info.pid, info.sid, date)).await?;

    Ok(ListSlotsResponse {
        success: true,
        slots: slots.iter().map(TimeOfDay::to_string).collect(),
        ..Default::default()
    })
}

async fn reserve_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<ReserveRequest>,
) -> BookingResult<ReserveResponse> {
    let info = info.into_inner();
    let date = parse_date(&info.date)?;
    let start = info.start_time.parse::<TimeOfDay>()?;

    let scheduler = scheduler.get_ref().clone();
    let aid = web::block(move || {
        scheduler.reserve_with_notes(&info.pid, info.sid, &info.client_id, date, start, info.notes)
    })
    .await?;

    Ok(ReserveResponse {
        success: true,
        aid,
        ..Default::default()
    })
}

async fn confirm_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<AppointmentRequest>,
) -> BookingResult<StatusResponse> {
    let aid = info.aid;
    let scheduler = scheduler.get_ref().clone();
    let appointment = web::block(move || scheduler.confirm(aid)).await?;
    Ok(status_response(appointment))
}

async fn complete_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<AppointmentRequest>,
) -> BookingResult<StatusResponse> {
    let aid = info.aid;
    let scheduler = scheduler.get_ref().clone();
    let appointment = web::block(move || scheduler.complete(aid)).await?;
    Ok(status_response(appointment))
}

async fn cancel_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<AppointmentRequest>,
) -> BookingResult<StatusResponse> {
    let aid = info.aid;
    let scheduler = scheduler.get_ref().clone();
    let appointment = web::block(move || scheduler.cancel(aid)).await?;
    Ok(status_response(appointment))
}

async fn check_in_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<CheckInRequest>,
) -> BookingResult<StatusResponse> {
    let CheckInRequest { aid, present } = info.into_inner();
    let scheduler = scheduler.get_ref().clone();
    let appointment = web::block(move || scheduler.check_in(aid, present)).await?;
    Ok(status_response(appointment))
}

async fn day_agenda_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<DayAgendaRequest>,
) -> BookingResult<DayAgendaResponse> {
    let info = info.into_inner();
    let date = parse_date(&info.date)?;

    let scheduler = scheduler.get_ref().clone();
    let agenda = web::block(move || scheduler.day_agenda(&info.pid, date)).await?;

    let appointments = agenda
        .into_iter()
        .map(|entry| {
            let appointment = entry.appointment;
            let end = Interval::new(appointment.start, entry.duration_minutes).end_minutes();
            AgendaItem {
                aid: appointment.id,
                sid: appointment.service_id,
                client_id: appointment.client_id,
                start_time: appointment.start.to_string(),
                end_time: TimeOfDay::from_minutes(end)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "24:00".to_string()),
                duration_minutes: entry.duration_minutes,
                status: appointment.status.to_string(),
                notes: appointment.notes.unwrap_or_default(),
            }
        })
        .collect();

    Ok(DayAgendaResponse {
        success: true,
        appointments,
        ..Default::default()
    })
}
