mod common;

use actix_web::{test, App};
use serde_json::{json, Value};

use common::*;

#[actix_rt::test]
async fn booking_round_trip_over_http() {
    let f = fixture();
    let mut app = test::init_service(
        App::new()
            .data(f.scheduler.clone())
            .configure(booking_server::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/booking/list_slots")
        .set_json(&json!({ "pid": PRO, "sid": MASSAGE, "date": "2026-10-26" }))
        .to_request();
    let resp: Value = test::read_response_json(&mut app, req).await;
    assert_eq!(resp["success"], true);
    assert_eq!(resp["slots"].as_array().unwrap().len(), 19);
    assert_eq!(resp["slots"][0], "08:00");

    let req = test::TestRequest::post()
        .uri("/booking/reserve")
        .set_json(&json!({
            "pid": PRO,
            "sid": MASSAGE,
            "client_id": "client-a",
            "date": "2026-10-26",
            "start_time": "08:00",
        }))
        .to_request();
    let resp: Value = test::read_response_json(&mut app, req).await;
    assert_eq!(resp["success"], true);
    let aid = resp["aid"].as_u64().unwrap();

    let req = test::TestRequest::post()
        .uri("/booking/reserve")
        .set_json(&json!({
            "pid": PRO,
            "sid": HAIRCUT,
            "client_id": "client-b",
            "date": "2026-10-26",
            "start_time": "08:30",
        }))
        .to_request();
    let resp: Value = test::read_response_json(&mut app, req).await;
    assert_eq!(resp["success"], false);
    assert_eq!(resp["code"], "slot_conflict");

    let req = test::TestRequest::post()
        .uri("/booking/confirm")
        .set_json(&json!({ "aid": aid }))
        .to_request();
    let resp: Value = test::read_response_json(&mut app, req).await;
    assert_eq!(resp["status"], "confirmed");

    let req = test::TestRequest::post()
        .uri("/booking/day_agenda")
        .set_json(&json!({ "pid": PRO, "date": "2026-10-26" }))
        .to_request();
    let resp: Value = test::read_response_json(&mut app, req).await;
    assert_eq!(resp["appointments"][0]["end_time"], "09:00");
    assert_eq!(resp["appointments"][0]["status"], "confirmed");
}

#[actix_rt::test]
async fn admin_and_professional_scopes() {
    let f = fixture();
    let mut app = test::init_service(
        App::new()
            .data(f.scheduler.clone())
            .configure(booking_server::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/admin/block_date")
        .set_json(&json!({ "date": "2026-12-25", "reason": "Christmas", "is_holiday": true }))
        .to_request();
    let resp: Value = test::read_response_json(&mut app, req).await;
    assert_eq!(resp["success"], true);

    let req = test::TestRequest::post()
        .uri("/admin/search_blocked")
        .set_json(&json!({ "start_date": "2026-12-01" }))
        .to_request();
    let resp: Value = test::read_response_json(&mut app, req).await;
    assert_eq!(resp["dates"][0]["date"], "2026-12-25");

    let req = test::TestRequest::post()
        .uri("/admin/block_date")
        .set_json(&json!({ "date": "2026-02-30" }))
        .to_request();
    let resp: Value = test::read_response_json(&mut app, req).await;
    assert_eq!(resp["code"], "invalid_date");

    let req = test::TestRequest::post()
        .uri("/professional/set_availability")
        .set_json(&json!({
            "pid": PRO,
            "weekday": 2,
            "is_open": true,
            "start_time": "13:00",
            "end_time": "12:00",
        }))
        .to_request();
    let resp: Value = test::read_response_json(&mut app, req).await;
    assert_eq!(resp["code"], "invalid_window");

    let req = test::TestRequest::post()
        .uri("/professional/view_availability")
        .set_json(&json!({ "pid": PRO }))
        .to_request();
    let resp: Value = test::read_response_json(&mut app, req).await;
    let days = resp["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[1]["is_open"], true);
    assert_eq!(days[2]["is_open"], false);
    assert_eq!(days[2]["start_time"], "09:00");
}
