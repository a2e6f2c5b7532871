use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use uuid::Uuid;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Alibaba Cloud access key id (`AccessKeyId`).
///
/// Invariant: non-empty after trimming.
pub struct AccessKeyId(String);

impl AccessKeyId {
    /// Query parameter name used by Dysms (`AccessKeyId`).
    pub const FIELD: &'static str = "AccessKeyId";

    /// Create a validated [`AccessKeyId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq)]
/// Alibaba Cloud access key secret.
///
/// Invariant: must not be empty (whitespace is preserved and allowed). Never sent on the wire;
/// only used as the HMAC key.
pub struct AccessSecret(String);

impl AccessSecret {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "AccessSecret";

    /// Create a validated [`AccessSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessSecret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Region id (`RegionId`), e.g. `cn-hangzhou`.
///
/// Invariant: non-empty after trimming.
pub struct RegionId(String);

impl RegionId {
    /// Query parameter name used by Dysms (`RegionId`).
    pub const FIELD: &'static str = "RegionId";

    /// Create a validated [`RegionId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated region id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Recipient phone number as sent to Dysms.
///
/// Invariant: non-empty after trimming. No normalization is performed; domestic numbers are
/// sent as-is (`15300000001`).
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Query parameter name used by `QuerySendDetails` (`PhoneNumber`).
    pub const FIELD: &'static str = "PhoneNumber";

    /// Create a validated (non-empty) phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to Dysms.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS signature name (`SignName`) registered in the console.
///
/// Invariant: non-empty after trimming.
pub struct SignName(String);

impl SignName {
    /// Query parameter name used by Dysms (`SignName`).
    pub const FIELD: &'static str = "SignName";

    /// Create a validated [`SignName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sign name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS template code (`TemplateCode`), e.g. `SMS_71390007`.
///
/// Invariant: non-empty after trimming.
pub struct TemplateCode(String);

impl TemplateCode {
    /// Query parameter name used by Dysms (`TemplateCode`).
    pub const FIELD: &'static str = "TemplateCode";

    /// Create a validated [`TemplateCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated template code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Caller-supplied correlation id (`OutId`) echoed back in delivery reports.
///
/// Invariant: non-empty after trimming.
pub struct OutId(String);

impl OutId {
    /// Query parameter name used by Dysms (`OutId`).
    pub const FIELD: &'static str = "OutId";

    /// Create a validated [`OutId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated out id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Send receipt id (`BizId`) returned by `SendSms`.
///
/// Invariant: non-empty after trimming.
pub struct BizId(String);

impl BizId {
    /// Query parameter name used by Dysms (`BizId`).
    pub const FIELD: &'static str = "BizId";

    /// Create a validated [`BizId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated biz id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Template variables (`TemplateParam`), sent as a JSON object.
///
/// Keys are kept sorted so the rendered JSON is stable across runs.
pub struct TemplateParam(BTreeMap<String, String>);

impl TemplateParam {
    /// Query parameter name used by Dysms (`TemplateParam`).
    pub const FIELD: &'static str = "TemplateParam";

    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a template variable, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a template variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Render as a compact JSON object, e.g. `{"customer":"test"}`.
    pub fn to_json(&self) -> String {
        let object = self
            .0
            .iter()
            .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(object).to_string()
    }
}

impl From<BTreeMap<String, String>> for TemplateParam {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self(value)
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateParam
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Calendar day to query (`SendDate`), sent as `yyyyMMdd`.
pub struct SendDate(NaiveDate);

impl SendDate {
    /// Query parameter name used by Dysms (`SendDate`).
    pub const FIELD: &'static str = "SendDate";

    /// Wire format of the date.
    pub const FORMAT: &'static str = "%Y%m%d";

    /// Parse a `yyyyMMdd` string such as `20180409`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        NaiveDate::parse_from_str(input.trim(), Self::FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidSendDate {
                input: input.to_owned(),
            })
    }

    /// Build a date from a `yyyyMMdd` literal known to be valid at the call site.
    ///
    /// Use [`SendDate::parse`] for input that comes from outside the program.
    ///
    /// # Panics
    ///
    /// Panics if `literal` is not a valid `yyyyMMdd` date.
    #[track_caller]
    pub fn literal(literal: &str) -> Self {
        match Self::parse(literal) {
            Ok(date) => date,
            Err(err) => panic!("SendDate::literal: {err}"),
        }
    }

    /// The underlying calendar date.
    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Value as sent on the wire (`yyyyMMdd`).
    pub fn to_wire(self) -> String {
        self.0.format(Self::FORMAT).to_string()
    }
}

impl From<NaiveDate> for SendDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Page size for `QuerySendDetails` (`PageSize`).
///
/// Invariant: `1..=50`. Values outside the range fall back to [`PageSize::MAX`].
pub struct PageSize(u32);

impl PageSize {
    /// Query parameter name used by Dysms (`PageSize`).
    pub const FIELD: &'static str = "PageSize";

    pub const MIN: u32 = 1;
    pub const MAX: u32 = 50;

    /// Clamp a requested page size into the accepted range.
    pub fn new(requested: i64) -> Self {
        match u32::try_from(requested) {
            Ok(value) if (Self::MIN..=Self::MAX).contains(&value) => Self(value),
            _ => Self(Self::MAX),
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// One-based page index for `QuerySendDetails` (`CurrentPage`).
///
/// Invariant: at least 1; an unset (zero) page becomes 1.
pub struct CurrentPage(u32);

impl CurrentPage {
    /// Query parameter name used by Dysms (`CurrentPage`).
    pub const FIELD: &'static str = "CurrentPage";

    pub fn new(requested: u32) -> Self {
        Self(requested.max(1))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for CurrentPage {
    fn default() -> Self {
        Self(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Response format requested from Dysms (`Format`).
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    /// Query parameter name used by Dysms (`Format`).
    pub const FIELD: &'static str = "Format";

    /// Value as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Xml => "XML",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Request timestamp (`Timestamp`), sent as RFC 3339 in UTC with second precision.
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Query parameter name used by Dysms (`Timestamp`).
    pub const FIELD: &'static str = "Timestamp";

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse an RFC 3339 string such as `2018-04-09T15:27:02Z`; offsets are converted to UTC.
    pub fn parse_rfc3339(input: &str) -> Result<Self, ValidationError> {
        DateTime::parse_from_rfc3339(input.trim())
            .map(|parsed| Self(parsed.with_timezone(&Utc)))
            .map_err(|_| ValidationError::InvalidTimestamp {
                input: input.to_owned(),
            })
    }

    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Value as sent on the wire, e.g. `2018-04-09T15:27:02Z`.
    pub fn to_wire(self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Per-request replay token (`SignatureNonce`).
pub struct SignatureNonce(Uuid);

impl SignatureNonce {
    /// Query parameter name used by Dysms (`SignatureNonce`).
    pub const FIELD: &'static str = "SignatureNonce";

    /// Generate a fresh random (v4) nonce.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a hyphenated UUID string.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Uuid::parse_str(input.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidNonce {
                input: input.to_owned(),
            })
    }

    pub fn as_uuid(self) -> Uuid {
        self.0
    }

    /// Value as sent on the wire (lower-case hyphenated UUID).
    pub fn to_wire(self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl From<Uuid> for SignatureNonce {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for SignatureNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Top-level `Code` of a Dysms response.
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct ApiCode(String);

impl ApiCode {
    /// The code returned for successful calls.
    pub const OK: &'static str = "OK";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as provided by Dysms.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this code to a known variant, if one exists.
    pub fn known(&self) -> Option<KnownApiCode> {
        KnownApiCode::from_code(&self.0)
    }

    /// Returns `true` for the `OK` code.
    pub fn is_ok(&self) -> bool {
        self.0 == Self::OK
    }

    /// Returns `true` if this code is considered retryable by the crate.
    pub fn is_retryable(&self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_retryable())
    }

    /// Returns `true` if this code represents a credential or signature problem.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_auth_error())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known Dysms response codes.
///
/// Unknown codes are preserved as [`ApiCode`] and return `None` from [`KnownApiCode::from_code`].
pub enum KnownApiCode {
    Ok,
    RamPermissionDenied,
    OutOfService,
    ProductNotSubscribed,
    ProductUnsubscribed,
    AccountNotExists,
    AccountAbnormal,
    TemplateIllegal,
    SignatureIllegal,
    InvalidParameters,
    SystemError,
    MobileNumberIllegal,
    MobileCountOverLimit,
    TemplateMissingParameters,
    BusinessLimitControl,
    InvalidJsonParam,
    BlackKeyControlLimit,
    ParamLengthLimit,
    ParamNotSupportUrl,
    AmountNotEnough,
    SignatureDoesNotMatch,
    InvalidAccessKeyId,
    SignatureNonceUsed,
    TimestampExpired,
}

impl KnownApiCode {
    /// Convert a raw Dysms code into a known variant.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "OK" => Self::Ok,
            "isp.RAM_PERMISSION_DENY" => Self::RamPermissionDenied,
            "isv.OUT_OF_SERVICE" => Self::OutOfService,
            "isv.PRODUCT_UN_SUBSCRIPT" => Self::ProductNotSubscribed,
            "isv.PRODUCT_UNSUBSCRIBE" => Self::ProductUnsubscribed,
            "isv.ACCOUNT_NOT_EXISTS" => Self::AccountNotExists,
            "isv.ACCOUNT_ABNORMAL" => Self::AccountAbnormal,
            "isv.SMS_TEMPLATE_ILLEGAL" => Self::TemplateIllegal,
            "isv.SMS_SIGNATURE_ILLEGAL" => Self::SignatureIllegal,
            "isv.INVALID_PARAMETERS" => Self::InvalidParameters,
            "isp.SYSTEM_ERROR" => Self::SystemError,
            "isv.MOBILE_NUMBER_ILLEGAL" => Self::MobileNumberIllegal,
            "isv.MOBILE_COUNT_OVER_LIMIT" => Self::MobileCountOverLimit,
            "isv.TEMPLATE_MISSING_PARAMETERS" => Self::TemplateMissingParameters,
            "isv.BUSINESS_LIMIT_CONTROL" => Self::BusinessLimitControl,
            "isv.INVALID_JSON_PARAM" => Self::InvalidJsonParam,
            "isv.BLACK_KEY_CONTROL_LIMIT" => Self::BlackKeyControlLimit,
            "isv.PARAM_LENGTH_LIMIT" => Self::ParamLengthLimit,
            "isv.PARAM_NOT_SUPPORT_URL" => Self::ParamNotSupportUrl,
            "isv.AMOUNT_NOT_ENOUGH" => Self::AmountNotEnough,
            "SignatureDoesNotMatch" => Self::SignatureDoesNotMatch,
            "InvalidAccessKeyId.NotFound" => Self::InvalidAccessKeyId,
            "SignatureNonceUsed" => Self::SignatureNonceUsed,
            "InvalidTimeStamp.Expired" => Self::TimestampExpired,
            _ => return None,
        })
    }

    /// Whether this code is likely transient and the call can be retried.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::SystemError | Self::BusinessLimitControl | Self::SignatureNonceUsed
        )
    }

    /// Whether this code indicates invalid credentials or a bad signature.
    pub fn is_auth_error(self) -> bool {
        matches!(
            self,
            Self::RamPermissionDenied
                | Self::SignatureDoesNotMatch
                | Self::InvalidAccessKeyId
                | Self::TimestampExpired
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Delivery state of a single message (`SendStatus`).
///
/// This value is preserved as-is even when unknown to this crate.
pub struct SendStatus(i32);

impl SendStatus {
    pub fn new(code: i32) -> Self {
        Self(code)
    }

    pub fn as_i32(self) -> i32 {
        self.0
    }

    pub fn known_kind(self) -> Option<KnownSendStatus> {
        KnownSendStatus::from_code(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known `SendStatus` values.
pub enum KnownSendStatus {
    WaitingForReceipt,
    Failed,
    Delivered,
}

impl KnownSendStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            1 => Self::WaitingForReceipt,
            2 => Self::Failed,
            3 => Self::Delivered,
            _ => return None,
        })
    }
}
