use serde::Serialize;

#[derive(Default, Serialize)]
pub struct ListSlotsResponse {
    pub success: bool,
    pub err: String,
    pub code: String,
    pub slots: Vec<String>,
}

#[derive(Default, Serialize)]
pub struct ReserveResponse {
    pub success: bool,
    pub err: String,
    pub code: String,
    pub aid: u64,
}

#[derive(Default, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub err: String,
    pub code: String,
    pub aid: u64,
    pub status: String,
}

#[derive(Default, Serialize)]
pub struct AgendaItem {
    pub aid: u64,
    pub sid: u64,
    pub client_id: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
    pub status: String,
    pub notes: String,
}

#[derive(Default, Serialize)]
pub struct DayAgendaResponse {
    pub success: bool,
    pub err: String,
    pub code: String,
    pub appointments: Vec<AgendaItem>,
}

crate::impl_err_response! {
    ListSlotsResponse,
    ReserveResponse,
    StatusResponse,
    DayAgendaResponse,
}
