use serde::Deserialize;

use super::canonical::{ACTION_FIELD, QueryField, VERSION_FIELD};
use super::decode::{DecodeError, decode_body, envelope, non_empty};
use crate::domain::{
    Format, OutId, PhoneNumber, RegionId, SendSms, SendSmsResponse, SignName, TemplateCode,
    TemplateParam,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct SendSmsWireResponse {
    request_id: String,
    code: String,
    message: String,
    biz_id: Option<String>,
}

pub fn query_fields(request: &SendSms) -> Vec<QueryField> {
    let phone_numbers = request
        .phone_numbers()
        .iter()
        .map(PhoneNumber::raw)
        .collect::<Vec<_>>()
        .join(",");
    let template_param = request.template_param();

    vec![
        QueryField::always(ACTION_FIELD, request.action()),
        QueryField::always(VERSION_FIELD, request.version()),
        QueryField::always(RegionId::FIELD, request.region_id().as_str()),
        QueryField::always(SendSms::PHONE_NUMBERS_FIELD, phone_numbers),
        QueryField::always(SignName::FIELD, request.sign_name().as_str()),
        QueryField::always(TemplateCode::FIELD, request.template_code().as_str()),
        QueryField::omit_empty(
            TemplateParam::FIELD,
            (!template_param.is_empty()).then(|| template_param.to_json()),
        ),
        QueryField::omit_empty(
            OutId::FIELD,
            request.out_id().map(|out_id| out_id.as_str().to_owned()),
        ),
    ]
}

pub fn decode_send_sms_response(
    format: Format,
    body: &[u8],
) -> Result<SendSmsResponse, DecodeError> {
    let parsed: SendSmsWireResponse = decode_body(format, body)?;

    Ok(SendSmsResponse {
        envelope: envelope(parsed.request_id, parsed.code, parsed.message),
        biz_id: non_empty(parsed.biz_id),
    })
}
