use serde::Deserialize;

#[derive(Deserialize)]
pub struct ListSlotsRequest {
    pub pid: String,
    pub sid: u64,
    pub date: String,
}

#[derive(Deserialize)]
pub struct ReserveRequest {
    pub pid: String,
    pub sid: u64,
    pub client_id: String,
    pub date: String,
    pub start_time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct AppointmentRequest {
    pub aid: u64,
}

#[derive(Deserialize)]
pub struct CheckInRequest {
    pub aid: u64,
    pub present: bool,
}

#[derive(Deserialize)]
pub struct DayAgendaRequest {
    pub pid: String,
    pub date: String,
}
