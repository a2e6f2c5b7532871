use crate::domain::value::{ApiCode, SendStatus};

/// Fields present in every Dysms response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub request_id: String,
    pub code: ApiCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSmsResponse {
    pub envelope: ResponseEnvelope,
    /// Receipt id for `QuerySendDetails`; absent when the send was rejected.
    pub biz_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySendDetailsResponse {
    pub envelope: ResponseEnvelope,
    pub total_count: u64,
    pub total_page: u64,
    pub details: Vec<SmsSendDetail>,
}

/// Delivery record for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsSendDetail {
    pub phone_num: String,
    pub send_status: SendStatus,
    pub err_code: String,
    pub template_code: String,
    pub content: String,
    /// `yyyy-MM-dd HH:mm:ss` as reported by Dysms.
    pub send_date: String,
    pub receive_date: String,
    pub out_id: Option<String>,
}
