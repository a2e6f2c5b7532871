//! Typed Rust client for the Alibaba Cloud Dysms (short message service) HTTP API.
//!
//! The crate is split into a domain layer of strong types, a transport layer that owns the
//! canonical query, HMAC-SHA1 signing and JSON/XML decoding, and a small client layer that
//! orchestrates requests.
//!
//! ```rust,no_run
//! use dysms::{
//!     Credentials, DysmsClient, PhoneNumber, RegionId, SendOptions, SendSms, SignName,
//!     TemplateCode,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dysms::DysmsError> {
//!     let client = DysmsClient::new(Credentials::from_env()?);
//!     let mut options = SendOptions::default();
//!     options.template_param.insert("code", "1234");
//!     let request = SendSms::new(
//!         RegionId::new("cn-hangzhou")?,
//!         vec![PhoneNumber::new("15300000001")?],
//!         SignName::new("...")?,
//!         TemplateCode::new("SMS_0000001")?,
//!         options,
//!     )?;
//!     let resp = client.send_sms(&request).await?;
//!     println!("{:?} {:?}", resp.envelope.code, resp.biz_id);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    ClientConfig, Credentials, DEFAULT_ENDPOINT, DysmsClient, DysmsClientBuilder, DysmsError,
    RequestOptions, SERVICE_DEFAULT_FORMAT, SignedRequest, Transport,
};
pub use domain::{
    Action, ApiCode, BizId, Format, KnownApiCode, KnownSendStatus, OutId, PhoneNumber,
    QueryOptions, QuerySendDetails, QuerySendDetailsResponse, RegionId, ResponseEnvelope,
    SendDate, SendOptions, SendSms, SendSmsResponse, SendStatus, SignName, SignatureNonce,
    SmsSendDetail, TemplateCode, TemplateParam, Timestamp, ValidationError,
};
