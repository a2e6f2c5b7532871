use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{AccessKeyId, AccessSecret, ValidationError};

/// Environment variable read by [`Credentials::from_env`] for the key id.
pub const ACCESS_KEY_ID_ENV: &str = "ALIYUN_ACCESS_KEY_ID";
/// Environment variable read by [`Credentials::from_env`] for the secret.
pub const ACCESS_KEY_SECRET_ENV: &str = "ALIYUN_ACCESS_KEY_SECRET";

#[derive(Debug, Clone)]
/// Access key pair used to sign every request.
pub struct Credentials {
    access_key_id: AccessKeyId,
    access_secret: AccessSecret,
}

impl Credentials {
    /// Create credentials and validate that both parts are non-empty.
    pub fn new(
        access_key_id: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            access_key_id: AccessKeyId::new(access_key_id)?,
            access_secret: AccessSecret::new(access_secret)?,
        })
    }

    /// Read `ALIYUN_ACCESS_KEY_ID` and `ALIYUN_ACCESS_KEY_SECRET`.
    ///
    /// A missing or blank variable is reported as [`ValidationError::MissingEnv`] naming it.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let var = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ValidationError::MissingEnv { name })
        };
        Self::new(var(ACCESS_KEY_ID_ENV)?, var(ACCESS_KEY_SECRET_ENV)?)
    }

    pub fn access_key_id(&self) -> &AccessKeyId {
        &self.access_key_id
    }

    pub fn access_secret(&self) -> &AccessSecret {
        &self.access_secret
    }
}

/// Deserializable client settings, e.g. a `[dysms]` table in the host application's config file.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub access_key_id: String,
    pub access_secret: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_key_id", &self.access_key_id)
            .field("access_secret", &"***")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    pub fn credentials(&self) -> Result<Credentials, ValidationError> {
        Credentials::new(self.access_key_id.clone(), self.access_secret.clone())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
