//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    API_VERSION, Action, QueryOptions, QuerySendDetails, SEND_SMS_MAX_RECIPIENTS,
    SIGNATURE_METHOD, SIGNATURE_VERSION, SendOptions, SendSms, SystemParams,
};
pub use response::{QuerySendDetailsResponse, ResponseEnvelope, SendSmsResponse, SmsSendDetail};
pub use validation::ValidationError;
pub use value::{
    AccessKeyId, AccessSecret, ApiCode, BizId, CurrentPage, Format, KnownApiCode,
    KnownSendStatus, OutId, PageSize, PhoneNumber, RegionId, SendDate, SendStatus, SignName,
    SignatureNonce, TemplateCode, TemplateParam, Timestamp,
};
