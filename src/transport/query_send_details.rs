use serde::Deserialize;

use super::canonical::{ACTION_FIELD, QueryField, VERSION_FIELD};
use super::decode::{DecodeError, decode_body, envelope, non_empty};
use crate::domain::{
    BizId, CurrentPage, Format, PageSize, PhoneNumber, QuerySendDetails,
    QuerySendDetailsResponse, RegionId, SendDate, SendStatus, SmsSendDetail,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct QuerySendDetailsWireResponse {
    request_id: String,
    code: String,
    message: String,
    total_count: u64,
    total_page: u64,
    #[serde(rename = "SmsSendDetailDTOs")]
    details: SmsSendDetailList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SmsSendDetailList {
    #[serde(rename = "SmsSendDetailDTO")]
    items: Vec<SmsSendDetailWire>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SmsSendDetailWire {
    phone_num: String,
    send_status: i32,
    err_code: String,
    template_code: String,
    content: String,
    send_date: String,
    receive_date: String,
    out_id: Option<String>,
}

impl From<SmsSendDetailWire> for SmsSendDetail {
    fn from(value: SmsSendDetailWire) -> Self {
        Self {
            phone_num: value.phone_num,
            send_status: SendStatus::new(value.send_status),
            err_code: value.err_code,
            template_code: value.template_code,
            content: value.content,
            send_date: value.send_date,
            receive_date: value.receive_date,
            out_id: non_empty(value.out_id),
        }
    }
}

pub fn query_fields(request: &QuerySendDetails) -> Vec<QueryField> {
    vec![
        QueryField::always(ACTION_FIELD, request.action()),
        QueryField::always(VERSION_FIELD, request.version()),
        QueryField::always(PhoneNumber::FIELD, request.phone_number().raw()),
        QueryField::omit_empty(
            BizId::FIELD,
            request.biz_id().map(|biz_id| biz_id.as_str().to_owned()),
        ),
        QueryField::always(SendDate::FIELD, request.send_date().to_wire()),
        QueryField::always(PageSize::FIELD, request.page_size().value().to_string()),
        QueryField::always(
            CurrentPage::FIELD,
            request.current_page().value().to_string(),
        ),
        QueryField::omit_empty(
            RegionId::FIELD,
            request.region_id().map(|region| region.as_str().to_owned()),
        ),
    ]
}

pub fn decode_query_send_details_response(
    format: Format,
    body: &[u8],
) -> Result<QuerySendDetailsResponse, DecodeError> {
    let parsed: QuerySendDetailsWireResponse = decode_body(format, body)?;

    Ok(QuerySendDetailsResponse {
        envelope: envelope(parsed.request_id, parsed.code, parsed.message),
        total_count: parsed.total_count,
        total_page: parsed.total_page,
        details: parsed
            .details
            .items
            .into_iter()
            .map(SmsSendDetail::from)
            .collect(),
    })
}
