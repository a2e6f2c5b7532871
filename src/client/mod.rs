//! Client layer: builds system parameters, signs, sends, and decodes.

mod config;
mod transport;

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

pub use config::{ACCESS_KEY_ID_ENV, ACCESS_KEY_SECRET_ENV, ClientConfig, Credentials};
pub use transport::{BoxError, BoxFuture, HttpResponse, ReqwestTransport, Transport};

use crate::domain::{
    Action, Format, QuerySendDetails, QuerySendDetailsResponse, ResponseEnvelope, SendSms,
    SendSmsResponse, SignatureNonce, SystemParams, Timestamp, ValidationError,
};
use crate::transport::CanonicalQuery;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://dysmsapi.aliyuncs.com/";

/// Format the service answers in when the request carries no `Format` parameter.
pub const SERVICE_DEFAULT_FORMAT: Format = Format::Xml;

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`DysmsClient`].
///
/// A response whose `Code` is not `OK` is not an error; inspect
/// [`ResponseEnvelope::code`] on the decoded response.
pub enum DysmsError {
    /// The client could not be set up (e.g. the HTTP client failed to build).
    #[error("configuration error: {0}")]
    Configuration(#[source] Box<dyn StdError + Send + Sync>),

    /// The request could not be signed. HMAC-SHA1 accepts keys of any length, so the current
    /// signer never produces this.
    #[error("signing error: {0}")]
    Signing(#[source] Box<dyn StdError + Send + Sync>),

    /// The transport failed to deliver the request or read the response.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Response body could not be parsed in the requested format.
    #[error("decode error ({format}): {source}")]
    Decode {
        format: Format,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Clone, Default)]
/// Per-call overrides applied after the defaults and before signing.
///
/// Defaults: `Format::Json`, the current time, a fresh random nonce, and the client's transport.
pub struct RequestOptions {
    pub format: Option<Format>,
    /// Leave `Format` out of the signed query. The body is then decoded as `format` when set,
    /// otherwise as [`SERVICE_DEFAULT_FORMAT`].
    pub omit_format: bool,
    pub timestamp: Option<Timestamp>,
    pub nonce: Option<SignatureNonce>,
    pub transport: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("format", &self.format)
            .field("omit_format", &self.omit_format)
            .field("timestamp", &self.timestamp)
            .field("nonce", &self.nonce)
            .field("transport", &self.transport.as_ref().map(|_| "<dyn Transport>"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A fully signed request, ready to be sent.
pub struct SignedRequest {
    url: String,
    signature: String,
    canonical_query: String,
    format: Format,
    timestamp: Timestamp,
    nonce: SignatureNonce,
}

impl SignedRequest {
    /// `endpoint?Signature=...&<canonical query>`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Signature as it appears in the URL (already percent-encoded).
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Sorted, percent-encoded parameters without `Signature`.
    pub fn canonical_query(&self) -> &str {
        &self.canonical_query
    }

    /// Format the response will be decoded as.
    pub fn format(&self) -> Format {
        self.format
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn nonce(&self) -> SignatureNonce {
        self.nonce
    }
}

#[derive(Clone)]
/// Builder for [`DysmsClient`].
///
/// Use this when you need to customize the endpoint, timeout, user-agent, or transport.
pub struct DysmsClientBuilder {
    credentials: Credentials,
    endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl DysmsClientBuilder {
    /// Create a builder with the default endpoint and no timeout/user-agent override.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
            transport: None,
        }
    }

    /// Override the endpoint. The value is used verbatim as the URL prefix.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom transport. `timeout` and `user_agent` only configure the default transport
    /// and are ignored when this is set.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build a [`DysmsClient`].
    pub fn build(self) -> Result<DysmsClient, DysmsError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                let client = builder
                    .build()
                    .map_err(|err| DysmsError::Configuration(Box::new(err)))?;
                Arc::new(ReqwestTransport::new(client))
            }
        };

        Ok(DysmsClient {
            credentials: self.credentials,
            endpoint: self.endpoint,
            transport,
        })
    }
}

#[derive(Clone)]
/// High-level Dysms client.
///
/// Immutable after construction and cheap to clone; share it freely across tasks. Every call
/// builds its own parameters, timestamp and nonce.
pub struct DysmsClient {
    credentials: Credentials,
    endpoint: String,
    transport: Arc<dyn Transport>,
}

impl DysmsClient {
    /// Create a client using the default endpoint and transport.
    ///
    /// For more customization, use [`DysmsClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            transport: Arc::new(ReqwestTransport::default()),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> DysmsClientBuilder {
        DysmsClientBuilder::new(credentials)
    }

    /// Build a client from deserialized settings.
    pub fn from_config(config: ClientConfig) -> Result<Self, DysmsError> {
        let mut builder = Self::builder(config.credentials()?);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(endpoint) = config.endpoint {
            builder = builder.endpoint(endpoint);
        }
        if let Some(user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        builder.build()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the system parameters for `action`, sign them, and assemble the request URL.
    ///
    /// Performs no I/O. With a fixed timestamp and nonce in `options` the result is fully
    /// deterministic.
    pub fn sign(
        &self,
        action: &Action,
        options: &RequestOptions,
    ) -> Result<SignedRequest, DysmsError> {
        let (sent_format, format) = if options.omit_format {
            (None, options.format.unwrap_or(SERVICE_DEFAULT_FORMAT))
        } else {
            let format = options.format.unwrap_or_default();
            (Some(format), format)
        };
        let system = SystemParams {
            access_key_id: self.credentials.access_key_id().clone(),
            timestamp: options.timestamp.unwrap_or_else(Timestamp::now),
            format: sent_format,
            signature_nonce: options.nonce.unwrap_or_else(SignatureNonce::random),
        };

        let canonical_query = CanonicalQuery::build(&system, action).encode();
        let signature = crate::transport::sign(self.credentials.access_secret(), &canonical_query)
            .map_err(|err| DysmsError::Signing(Box::new(err)))?;
        let url = crate::transport::assemble_url(&self.endpoint, &signature, &canonical_query);

        debug!(
            action = action.name(),
            format = %format,
            nonce = %system.signature_nonce,
            "signed Dysms request"
        );

        Ok(SignedRequest {
            url,
            signature,
            canonical_query,
            format,
            timestamp: system.timestamp,
            nonce: system.signature_nonce,
        })
    }

    /// Send an SMS using a registered sign name and template.
    ///
    /// Errors:
    /// - [`DysmsError::Transport`] when the request cannot be delivered,
    /// - [`DysmsError::Decode`] when the body is not valid JSON/XML of the expected shape.
    pub async fn send_sms(&self, request: &SendSms) -> Result<SendSmsResponse, DysmsError> {
        self.send_sms_with(request, RequestOptions::default()).await
    }

    /// [`DysmsClient::send_sms`] with per-call overrides.
    pub async fn send_sms_with(
        &self,
        request: &SendSms,
        options: RequestOptions,
    ) -> Result<SendSmsResponse, DysmsError> {
        let action = Action::SendSms(request.clone());
        let (format, response) = self.execute(&action, options).await?;

        let parsed = crate::transport::decode_send_sms_response(format, &response.body)
            .map_err(|err| DysmsError::Decode {
                format,
                source: Box::new(err),
            })?;
        log_api_code(&action, &parsed.envelope);
        Ok(parsed)
    }

    /// Query delivery records for a phone number on a given day.
    ///
    /// Errors are the same as for [`DysmsClient::send_sms`].
    pub async fn query_send_details(
        &self,
        request: &QuerySendDetails,
    ) -> Result<QuerySendDetailsResponse, DysmsError> {
        self.query_send_details_with(request, RequestOptions::default())
            .await
    }

    /// [`DysmsClient::query_send_details`] with per-call overrides.
    pub async fn query_send_details_with(
        &self,
        request: &QuerySendDetails,
        options: RequestOptions,
    ) -> Result<QuerySendDetailsResponse, DysmsError> {
        let action = Action::QuerySendDetails(request.clone());
        let (format, response) = self.execute(&action, options).await?;

        let parsed = crate::transport::decode_query_send_details_response(format, &response.body)
            .map_err(|err| DysmsError::Decode {
                format,
                source: Box::new(err),
            })?;
        log_api_code(&action, &parsed.envelope);
        Ok(parsed)
    }

    async fn execute(
        &self,
        action: &Action,
        options: RequestOptions,
    ) -> Result<(Format, HttpResponse), DysmsError> {
        let signed = self.sign(action, &options)?;
        let transport = options.transport.as_ref().unwrap_or(&self.transport);

        let response = transport
            .get(signed.url())
            .await
            .map_err(DysmsError::Transport)?;

        debug!(
            action = action.name(),
            status = response.status,
            bytes = response.body.len(),
            "received Dysms response"
        );
        if !(200..=299).contains(&response.status) {
            // Dysms reports failures in the body; decode it regardless.
            warn!(
                action = action.name(),
                status = response.status,
                "unexpected HTTP status from Dysms"
            );
        }

        Ok((signed.format(), response))
    }
}

fn log_api_code(action: &Action, envelope: &ResponseEnvelope) {
    if !envelope.code.is_ok() {
        warn!(
            action = action.name(),
            code = envelope.code.as_str(),
            message = %envelope.message,
            request_id = %envelope.request_id,
            "Dysms returned a non-OK code"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::domain::{
        ApiCode, OutId, PhoneNumber, QueryOptions, RegionId, SendDate, SendOptions, SignName,
        TemplateCode,
    };

    use super::*;

    const NONCE: &str = "57d1303b-0068-4892-994d-c2d70d4c37c6";
    const TIMESTAMP: &str = "2018-04-09T15:27:02Z";

    const SEND_JSON: &str = r#"{"Message":"OK","RequestId":"6EE2B27D-6833-4D5F-9B9B-CE7FA0A85CC7","BizId":"199303724724900469^0","Code":"OK"}"#;
    const SEND_XML: &str = "<?xml version='1.0' encoding='UTF-8'?><SendSmsResponse><Message>OK</Message><RequestId>6EE2B27D-6833-4D5F-9B9B-CE7FA0A85CC7</RequestId><BizId>199303724724900469^0</BizId><Code>OK</Code></SendSmsResponse>";
    const QUERY_JSON: &str = r#"{"TotalCount":1,"Message":"OK","RequestId":"0F8F57E7-B72B-492A-853F-F0F8A78D4DEE","SmsSendDetailDTOs":{"SmsSendDetailDTO":[{"OutId":"123","SendDate":"2018-04-27 14:19:30","SendStatus":3,"ReceiveDate":"2018-04-27 14:19:35","ErrCode":"DELIVRD","TemplateCode":"SMS_132940015","Content":"【可乐贩售机】正在使用Go SDK，版本号：v1.0。","PhoneNum":"15300000001"}]},"Code":"OK"}"#;
    const QUERY_XML: &str = "<?xml version='1.0' encoding='UTF-8'?><QuerySendDetailsResponse><TotalCount>1</TotalCount><Message>OK</Message><RequestId>0F8F57E7-B72B-492A-853F-F0F8A78D4DEE</RequestId><SmsSendDetailDTOs><SmsSendDetailDTO><OutId>123</OutId><SendDate>2018-04-27 14:19:30</SendDate><SendStatus>3</SendStatus><ReceiveDate>2018-04-27 14:19:35</ReceiveDate><ErrCode>DELIVRD</ErrCode><TemplateCode>SMS_132940015</TemplateCode><Content>【可乐贩售机】正在使用Go SDK，版本号：v1.0。</Content><PhoneNum>15300000001</PhoneNum></SmsSendDetailDTO></SmsSendDetailDTOs><Code>OK</Code></QuerySendDetailsResponse>";

    const SIGN_NAME_ENCODED: &str =
        "%E9%98%BF%E9%87%8C%E4%BA%91%E7%9F%AD%E4%BF%A1%E6%B5%8B%E8%AF%95%E4%B8%93%E7%94%A8";

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        urls: Vec<String>,
        response_status: u16,
        response_body: String,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    urls: Vec::new(),
                    response_status,
                    response_body: response_body.into(),
                })),
            }
        }

        fn last_url(&self) -> Option<String> {
            self.state.lock().unwrap().urls.last().cloned()
        }

        fn urls(&self) -> Vec<String> {
            self.state.lock().unwrap().urls.clone()
        }
    }

    impl Transport for FakeTransport {
        fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                state.urls.push(url.to_owned());
                Ok(HttpResponse {
                    status: state.response_status,
                    body: state.response_body.clone().into_bytes(),
                })
            })
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn get<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
            Box::pin(async move {
                Err(Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )) as BoxError)
            })
        }
    }

    fn make_client(transport: FakeTransport) -> DysmsClient {
        DysmsClient {
            credentials: Credentials::new("testId", "testSecret").unwrap(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            transport: Arc::new(transport),
        }
    }

    fn fixed(format: Format) -> RequestOptions {
        RequestOptions {
            format: Some(format),
            timestamp: Some(Timestamp::parse_rfc3339(TIMESTAMP).unwrap()),
            nonce: Some(SignatureNonce::parse(NONCE).unwrap()),
            ..Default::default()
        }
    }

    fn send_request(with_optional: bool) -> SendSms {
        let options = if with_optional {
            SendOptions {
                template_param: [("customer", "test")].into_iter().collect(),
                out_id: Some(OutId::new("123").unwrap()),
            }
        } else {
            SendOptions::default()
        };
        SendSms::new(
            RegionId::new("cn-hangzhou").unwrap(),
            vec![PhoneNumber::new("15300000001").unwrap()],
            SignName::new("阿里云短信测试专用").unwrap(),
            TemplateCode::new("SMS_71390007").unwrap(),
            options,
        )
        .unwrap()
    }

    fn query_request() -> QuerySendDetails {
        QuerySendDetails::new(
            PhoneNumber::new("15300000001").unwrap(),
            SendDate::literal("20180409"),
            QueryOptions {
                region_id: Some(RegionId::new("cn-hangzhou").unwrap()),
                ..Default::default()
            },
        )
    }

    fn send_url(signature: &str, format: &str, optional: bool) -> String {
        let (out_id, template_param) = if optional {
            ("OutId=123&", "TemplateParam=%7B%22customer%22%3A%22test%22%7D&")
        } else {
            ("", "")
        };
        format!(
            "http://dysmsapi.aliyuncs.com/?Signature={signature}&AccessKeyId=testId&Action=SendSms\
             &Format={format}&{out_id}PhoneNumbers=15300000001&RegionId=cn-hangzhou\
             &SignName={SIGN_NAME_ENCODED}&SignatureMethod=HMAC-SHA1\
             &SignatureNonce=57d1303b-0068-4892-994d-c2d70d4c37c6&SignatureVersion=1.0\
             &TemplateCode=SMS_71390007&{template_param}Timestamp=2018-04-09T15%3A27%3A02Z\
             &Version=2017-05-25"
        )
    }

    fn query_url(signature: &str, format: &str) -> String {
        format!(
            "http://dysmsapi.aliyuncs.com/?Signature={signature}&AccessKeyId=testId\
             &Action=QuerySendDetails&CurrentPage=1&Format={format}&PageSize=50\
             &PhoneNumber=15300000001&RegionId=cn-hangzhou&SendDate=20180409\
             &SignatureMethod=HMAC-SHA1&SignatureNonce=57d1303b-0068-4892-994d-c2d70d4c37c6\
             &SignatureVersion=1.0&Timestamp=2018-04-09T15%3A27%3A02Z&Version=2017-05-25"
        )
    }

    #[tokio::test]
    async fn send_sms_builds_signed_url_and_parses_json() {
        let transport = FakeTransport::new(200, SEND_JSON);
        let client = make_client(transport.clone());

        let response = client
            .send_sms_with(&send_request(true), fixed(Format::Json))
            .await
            .unwrap();

        assert_eq!(
            transport.last_url(),
            Some(send_url("gr6VTI2L7pboVdzhg6m96zGfofw%3D", "JSON", true))
        );
        assert_eq!(
            response.envelope.request_id,
            "6EE2B27D-6833-4D5F-9B9B-CE7FA0A85CC7"
        );
        assert_eq!(response.envelope.code, ApiCode::new("OK"));
        assert_eq!(response.envelope.message, "OK");
        assert_eq!(response.biz_id.as_deref(), Some("199303724724900469^0"));
    }

    #[tokio::test]
    async fn send_sms_supports_xml_format() {
        let transport = FakeTransport::new(200, SEND_XML);
        let client = make_client(transport.clone());

        let response = client
            .send_sms_with(&send_request(true), fixed(Format::Xml))
            .await
            .unwrap();

        assert_eq!(
            transport.last_url(),
            Some(send_url("IjPuuQwDI864Lsn2ccnzcyOvKEs%3D", "XML", true))
        );
        assert_eq!(response.biz_id.as_deref(), Some("199303724724900469^0"));
    }

    #[tokio::test]
    async fn send_sms_omits_unset_optional_params() {
        let transport = FakeTransport::new(200, SEND_JSON);
        let client = make_client(transport.clone());
        client
            .send_sms_with(&send_request(false), fixed(Format::Json))
            .await
            .unwrap();
        assert_eq!(
            transport.last_url(),
            Some(send_url("HwBmFIGbv22re%2F3vqdvAxYFqSp0%3D", "JSON", false))
        );

        let transport = FakeTransport::new(200, SEND_XML);
        let client = make_client(transport.clone());
        client
            .send_sms_with(&send_request(false), fixed(Format::Xml))
            .await
            .unwrap();
        assert_eq!(
            transport.last_url(),
            Some(send_url("gw%2BvEFcdCGYFwxPh7qGab6IoY64%3D", "XML", false))
        );
    }

    #[tokio::test]
    async fn query_send_details_builds_signed_url_and_parses_json() {
        let transport = FakeTransport::new(200, QUERY_JSON);
        let client = make_client(transport.clone());

        let response = client
            .query_send_details_with(&query_request(), fixed(Format::Json))
            .await
            .unwrap();

        assert_eq!(
            transport.last_url(),
            Some(query_url("IHO%2FUSQcgVW7sWYWoSvCr9%2FoQlI%3D", "JSON"))
        );
        assert_eq!(response.total_count, 1);
        assert_eq!(response.total_page, 0);
        assert_eq!(response.details.len(), 1);
        assert_eq!(response.details[0].phone_num, "15300000001");
        assert_eq!(response.details[0].err_code, "DELIVRD");
    }

    #[tokio::test]
    async fn query_send_details_supports_xml_format() {
        let transport = FakeTransport::new(200, QUERY_XML);
        let client = make_client(transport.clone());

        let response = client
            .query_send_details_with(&query_request(), fixed(Format::Xml))
            .await
            .unwrap();

        assert_eq!(
            transport.last_url(),
            Some(query_url("fOzO5rT5V8qIY6Td4EMlwm2AtkE%3D", "XML"))
        );

        let expected = client
            .query_send_details_with(
                &query_request(),
                RequestOptions {
                    transport: Some(Arc::new(FakeTransport::new(200, QUERY_JSON))),
                    ..fixed(Format::Json)
                },
            )
            .await
            .unwrap();
        assert_eq!(response, expected);
        assert_eq!(response.details[0].out_id.as_deref(), Some("123"));
        assert_eq!(
            response.details[0].content,
            "【可乐贩售机】正在使用Go SDK，版本号：v1.0。"
        );
    }

    #[test]
    fn sign_is_deterministic_with_fixed_nonce_and_timestamp() {
        let client = make_client(FakeTransport::new(200, ""));
        let action = Action::SendSms(send_request(true));

        let first = client.sign(&action, &fixed(Format::Json)).unwrap();
        let second = client.sign(&action, &fixed(Format::Json)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.signature(), "gr6VTI2L7pboVdzhg6m96zGfofw%3D");
        assert_eq!(
            first.url(),
            format!(
                "{DEFAULT_ENDPOINT}?Signature={}&{}",
                first.signature(),
                first.canonical_query()
            )
        );
        assert!(!first.canonical_query().contains("Signature="));
    }

    #[test]
    fn sign_can_omit_format_parameter() {
        let client = make_client(FakeTransport::new(200, ""));
        let action = Action::SendSms(send_request(true));

        let signed = client
            .sign(
                &action,
                &RequestOptions {
                    omit_format: true,
                    ..fixed(Format::Json)
                },
            )
            .unwrap();
        assert!(!signed.canonical_query().contains("Format="));
        assert_eq!(signed.signature(), "t6J2gOmmxfqdPLMKVSF9jtr3YSQ%3D");
        assert_eq!(signed.format(), Format::Json);

        let signed = client
            .sign(
                &action,
                &RequestOptions {
                    format: None,
                    omit_format: true,
                    ..fixed(Format::Json)
                },
            )
            .unwrap();
        assert_eq!(signed.format(), SERVICE_DEFAULT_FORMAT);
    }

    #[tokio::test]
    async fn omitted_format_decodes_service_default() {
        let transport = FakeTransport::new(200, SEND_XML);
        let client = make_client(transport.clone());

        let response = client
            .send_sms_with(
                &send_request(true),
                RequestOptions {
                    omit_format: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!transport.last_url().unwrap().contains("Format="));
        assert_eq!(response.biz_id.as_deref(), Some("199303724724900469^0"));
    }

    #[test]
    fn sign_generates_fresh_nonce_by_default() {
        let client = make_client(FakeTransport::new(200, ""));
        let action = Action::QuerySendDetails(query_request());

        let first = client.sign(&action, &RequestOptions::default()).unwrap();
        let second = client.sign(&action, &RequestOptions::default()).unwrap();
        assert_ne!(first.nonce(), second.nonce());
        assert_ne!(first.signature(), second.signature());
        assert_eq!(first.format(), Format::Json);
        assert!(first.canonical_query().contains("Format=JSON"));
    }

    #[tokio::test]
    async fn request_can_be_reused_across_calls() {
        let transport = FakeTransport::new(200, SEND_JSON);
        let client = make_client(transport.clone());
        let request = send_request(true);

        client.send_sms(&request).await.unwrap();
        client.send_sms(&request).await.unwrap();

        let urls = transport.urls();
        assert_eq!(urls.len(), 2);
        assert_ne!(urls[0], urls[1]);
    }

    #[tokio::test]
    async fn per_call_transport_overrides_client_transport() {
        let client_transport = FakeTransport::new(200, SEND_JSON);
        let call_transport = FakeTransport::new(200, SEND_JSON);
        let client = make_client(client_transport.clone());

        client
            .send_sms_with(
                &send_request(true),
                RequestOptions {
                    transport: Some(Arc::new(call_transport.clone())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(client_transport.last_url().is_none());
        assert!(call_transport.last_url().is_some());
    }

    #[tokio::test]
    async fn transport_errors_are_propagated() {
        let client = make_client(FakeTransport::new(200, SEND_JSON));
        let err = client
            .send_sms_with(
                &send_request(true),
                RequestOptions {
                    transport: Some(Arc::new(FailingTransport)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        match err {
            DysmsError::Transport(source) => {
                assert_eq!(source.to_string(), "connection refused");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_maps_to_decode_error() {
        let client = make_client(FakeTransport::new(200, "{ not json }"));
        let err = client.send_sms(&send_request(true)).await.unwrap_err();
        assert!(matches!(
            err,
            DysmsError::Decode {
                format: Format::Json,
                ..
            }
        ));

        let client = make_client(FakeTransport::new(
            200,
            "<QuerySendDetailsResponse><TotalCount>many</TotalCount></QuerySendDetailsResponse>",
        ));
        let err = client
            .query_send_details_with(&query_request(), fixed(Format::Xml))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DysmsError::Decode {
                format: Format::Xml,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn non_success_status_still_decodes_body() {
        let body = r#"{"Message":"Specified signature is not matched with our calculation.","RequestId":"R","Code":"SignatureDoesNotMatch"}"#;
        let client = make_client(FakeTransport::new(400, body));

        let response = client.send_sms(&send_request(true)).await.unwrap();
        assert!(response.envelope.code.is_auth_error());
        assert_eq!(response.biz_id, None);
    }

    #[test]
    fn builder_applies_endpoint_and_defaults() {
        let credentials = Credentials::new("testId", "testSecret").unwrap();

        let client = DysmsClient::builder(credentials.clone()).build().unwrap();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);

        let client = DysmsClient::builder(credentials)
            .endpoint("https://example.invalid/")
            .timeout(Duration::from_secs(3))
            .user_agent("dysms-tests")
            .build()
            .unwrap();
        assert_eq!(client.endpoint(), "https://example.invalid/");

        let action = Action::SendSms(send_request(false));
        let signed = client.sign(&action, &fixed(Format::Json)).unwrap();
        assert!(signed.url().starts_with("https://example.invalid/?Signature="));
    }

    #[test]
    fn from_config_validates_credentials() {
        let config = ClientConfig {
            access_key_id: "testId".to_owned(),
            access_secret: "testSecret".to_owned(),
            endpoint: Some("http://localhost:8080/".to_owned()),
            timeout_secs: Some(5),
            user_agent: None,
        };
        let client = DysmsClient::from_config(config.clone()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/");
        assert_eq!(client.credentials().access_key_id().as_str(), "testId");

        let err = DysmsClient::from_config(ClientConfig {
            access_key_id: "  ".to_owned(),
            ..config
        })
        .err()
        .unwrap();
        assert!(matches!(err, DysmsError::Validation(_)));
    }

    #[test]
    fn request_options_debug_hides_transport() {
        let options = RequestOptions {
            transport: Some(Arc::new(FailingTransport)),
            ..Default::default()
        };
        assert!(format!("{options:?}").contains("<dyn Transport>"));
    }
}
