use serde::Deserialize;

#[derive(Deserialize)]
pub struct SetAvailabilityRequest {
    pub pid: String,
    pub weekday: i32,
    pub is_open: bool,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize)]
pub struct ViewAvailabilityRequest {
    pub pid: String,
}
