use serde::Serialize;

#[derive(Default, Serialize)]
pub struct AvailabilityItem {
    pub weekday: u8,
    pub is_open: bool,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Default, Serialize)]
pub struct ViewAvailabilityResponse {
    pub success: bool,
    pub err: String,
    pub code: String,
    pub days: Vec<AvailabilityItem>,
}

crate::impl_err_response! {
    ViewAvailabilityResponse,
}
