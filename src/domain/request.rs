use crate::domain::validation::ValidationError;
use crate::domain::value::{
    AccessKeyId, BizId, CurrentPage, Format, OutId, PageSize, PhoneNumber, RegionId, SendDate,
    SignName, SignatureNonce, TemplateCode, TemplateParam, Timestamp,
};

/// API version sent with every action (`Version`).
pub const API_VERSION: &str = "2017-05-25";

/// Signature algorithm sent as `SignatureMethod`.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Signing scheme version sent as `SignatureVersion`.
pub const SIGNATURE_VERSION: &str = "1.0";

pub const SEND_SMS_MAX_RECIPIENTS: usize = 1000;

/// Parameters shared by every signed call.
///
/// `SignatureMethod` and `SignatureVersion` are fixed and therefore not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemParams {
    pub access_key_id: AccessKeyId,
    pub timestamp: Timestamp,
    /// `None` omits `Format` from the query; the service then answers in its default format.
    pub format: Option<Format>,
    pub signature_nonce: SignatureNonce,
}

impl SystemParams {
    pub fn signature_method(&self) -> &'static str {
        SIGNATURE_METHOD
    }

    pub fn signature_version(&self) -> &'static str {
        SIGNATURE_VERSION
    }
}

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Variables substituted into the template; omitted from the request when empty.
    pub template_param: TemplateParam,
    pub out_id: Option<OutId>,
}

#[derive(Debug, Clone)]
pub struct SendSms {
    region_id: RegionId,
    phone_numbers: Vec<PhoneNumber>,
    sign_name: SignName,
    template_code: TemplateCode,
    options: SendOptions,
}

impl SendSms {
    /// Action name sent as `Action`.
    pub const ACTION: &'static str = "SendSms";

    /// Query parameter name for the comma-joined recipients.
    pub const PHONE_NUMBERS_FIELD: &'static str = "PhoneNumbers";

    pub fn new(
        region_id: RegionId,
        phone_numbers: Vec<PhoneNumber>,
        sign_name: SignName,
        template_code: TemplateCode,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        if phone_numbers.is_empty() {
            return Err(ValidationError::Empty {
                field: Self::PHONE_NUMBERS_FIELD,
            });
        }
        if phone_numbers.len() > SEND_SMS_MAX_RECIPIENTS {
            return Err(ValidationError::TooManyRecipients {
                max: SEND_SMS_MAX_RECIPIENTS,
                actual: phone_numbers.len(),
            });
        }
        Ok(Self {
            region_id,
            phone_numbers,
            sign_name,
            template_code,
            options,
        })
    }

    pub fn action(&self) -> &'static str {
        Self::ACTION
    }

    pub fn version(&self) -> &'static str {
        API_VERSION
    }

    pub fn region_id(&self) -> &RegionId {
        &self.region_id
    }

    pub fn phone_numbers(&self) -> &[PhoneNumber] {
        &self.phone_numbers
    }

    pub fn sign_name(&self) -> &SignName {
        &self.sign_name
    }

    pub fn template_code(&self) -> &TemplateCode {
        &self.template_code
    }

    pub fn template_param(&self) -> &TemplateParam {
        &self.options.template_param
    }

    pub fn out_id(&self) -> Option<&OutId> {
        self.options.out_id.as_ref()
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub biz_id: Option<BizId>,
    /// Requested page size; anything outside `1..=50` (including the default 0) means 50.
    pub page_size: i64,
    /// Requested page; 0 (the default) means the first page.
    pub current_page: u32,
    pub region_id: Option<RegionId>,
}

#[derive(Debug, Clone)]
pub struct QuerySendDetails {
    phone_number: PhoneNumber,
    send_date: SendDate,
    biz_id: Option<BizId>,
    page_size: PageSize,
    current_page: CurrentPage,
    region_id: Option<RegionId>,
}

impl QuerySendDetails {
    /// Action name sent as `Action`.
    pub const ACTION: &'static str = "QuerySendDetails";

    /// Paging values are normalized here, so the accessors always return what goes on the wire.
    pub fn new(phone_number: PhoneNumber, send_date: SendDate, options: QueryOptions) -> Self {
        Self {
            phone_number,
            send_date,
            biz_id: options.biz_id,
            page_size: PageSize::new(options.page_size),
            current_page: CurrentPage::new(options.current_page),
            region_id: options.region_id,
        }
    }

    pub fn action(&self) -> &'static str {
        Self::ACTION
    }

    pub fn version(&self) -> &'static str {
        API_VERSION
    }

    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    pub fn send_date(&self) -> SendDate {
        self.send_date
    }

    pub fn biz_id(&self) -> Option<&BizId> {
        self.biz_id.as_ref()
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn current_page(&self) -> CurrentPage {
        self.current_page
    }

    pub fn region_id(&self) -> Option<&RegionId> {
        self.region_id.as_ref()
    }
}

/// One Dysms call with its business parameters.
#[derive(Debug, Clone)]
pub enum Action {
    SendSms(SendSms),
    QuerySendDetails(QuerySendDetails),
}

impl Action {
    /// Action name sent as `Action`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SendSms(request) => request.action(),
            Self::QuerySendDetails(request) => request.action(),
        }
    }

    pub fn version(&self) -> &'static str {
        API_VERSION
    }
}

impl From<SendSms> for Action {
    fn from(value: SendSms) -> Self {
        Self::SendSms(value)
    }
}

impl From<QuerySendDetails> for Action {
    fn from(value: QuerySendDetails) -> Self {
        Self::QuerySendDetails(value)
    }
}
