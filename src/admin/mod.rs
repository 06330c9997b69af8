mod requests;
mod responses;

use actix_web::{post, web, HttpResponse, Responder};

use crate::{
    error::BookingResult,
    protocol::SimpleResponse,
    scheduling::Scheduler,
    utils::{parse_date, parse_date_range_opt},
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(block_date)
        .service(unblock_date)
        .service(search_blocked);
}

crate::post_funcs! {
    (block_date, "/block_date", BlockDateRequest, SimpleResponse),
    (unblock_date, "/unblock_date", UnblockDateRequest, UnblockDateResponse),
    (search_blocked, "/search_blocked", SearchBlockedRequest, SearchBlockedResponse),
}

async fn block_date_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<BlockDateRequest>,
) -> BookingResult<SimpleResponse> {
    let info = info.into_inner();
    let date = parse_date(&info.date)?;

    let scheduler = scheduler.get_ref().clone();
    web::block(move || scheduler.block_date(date, &info.reason, info.is_holiday)).await?;

    Ok(SimpleResponse::ok())
}

async fn unblock_date_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<UnblockDateRequest>,
) -> BookingResult<UnblockDateResponse> {
    let date = parse_date(&info.date)?;

    let scheduler = scheduler.get_ref().clone();
    let removed = web::block(move || scheduler.unblock_date(date)).await?;

    Ok(UnblockDateResponse {
        success: true,
        removed,
        ..Default::default()
    })
}

async fn search_blocked_impl(
    scheduler: web::Data<Scheduler>,
    info: web::Json<SearchBlockedRequest>,
) -> BookingResult<SearchBlockedResponse> {
    let info = info.into_inner();
    let (from, to) = parse_date_range_opt(info.start_date, info.end_date)?;

    let scheduler = scheduler.get_ref().clone();
    let blocked = web::block(move || scheduler.blocked_dates(from, to)).await?;

    let dates = blocked
        .into_iter()
        .map(|blocked| BlockedDateItem {
            date: blocked.date.to_string(),
            is_holiday: blocked.is_holiday,
            reason: blocked.reason,
        })
        .collect();

    Ok(SearchBlockedResponse {
        success: true,
        dates,
        ..Default::default()
    })
}
