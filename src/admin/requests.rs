use serde::Deserialize;

#[derive(Deserialize)]
pub struct BlockDateRequest {
    pub date: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub is_holiday: bool,
}

#[derive(Deserialize)]
pub struct UnblockDateRequest {
    pub date: String,
}

#[derive(Deserialize)]
pub struct SearchBlockedRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
