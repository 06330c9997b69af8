use serde::Serialize;

#[derive(Default, Serialize)]
pub struct UnblockDateResponse {
    pub success: bool,
    pub err: String,
    pub code: String,
    pub removed: bool,
}

#[derive(Default, Serialize)]
pub struct BlockedDateItem {
    pub date: String,
    pub is_holiday: bool,
    pub reason: String,
}

#[derive(Default, Serialize)]
pub struct SearchBlockedResponse {
    pub success: bool,
    pub err: String,
    pub code: String,
    pub dates: Vec<BlockedDateItem>,
}

crate::impl_err_response! {
    UnblockDateResponse,
    SearchBlockedResponse,
}
