use serde::de::DeserializeOwned;

use crate::domain::{ApiCode, Format, ResponseEnvelope};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid XML response: {0}")]
    Xml(#[from] quick_xml::de::DeError),
}

/// Parse a response body in the format that was requested.
pub fn decode_body<T: DeserializeOwned>(format: Format, body: &[u8]) -> Result<T, DecodeError> {
    match format {
        Format::Json => Ok(serde_json::from_slice(body)?),
        Format::Xml => Ok(quick_xml::de::from_reader(body)?),
    }
}

pub fn envelope(request_id: String, code: String, message: String) -> ResponseEnvelope {
    ResponseEnvelope {
        request_id,
        code: ApiCode::new(code),
        message,
    }
}

/// Dysms sends empty elements for unset optional values in XML.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
