use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    TooManyRecipients { max: usize, actual: usize },
    InvalidSendDate { input: String },
    InvalidTimestamp { input: String },
    InvalidNonce { input: String },
    MissingEnv { name: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooManyRecipients { max, actual } => {
                write!(f, "too many recipients: {actual} (max {max})")
            }
            Self::InvalidSendDate { input } => {
                write!(f, "invalid send date: {input} (expected yyyyMMdd)")
            }
            Self::InvalidTimestamp { input } => {
                write!(f, "invalid timestamp: {input} (expected RFC 3339)")
            }
            Self::InvalidNonce { input } => write!(f, "invalid signature nonce: {input}"),
            Self::MissingEnv { name } => {
                write!(f, "{name} environment variable is not set or empty")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "SignName" };
        assert_eq!(err.to_string(), "SignName must not be empty");

        let err = ValidationError::TooManyRecipients {
            max: 2,
            actual: 3,
        };
        assert_eq!(err.to_string(), "too many recipients: 3 (max 2)");

        let err = ValidationError::InvalidSendDate {
            input: "2018-04-09".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid send date: 2018-04-09 (expected yyyyMMdd)"
        );

        let err = ValidationError::InvalidTimestamp {
            input: "noon".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid timestamp: noon (expected RFC 3339)");

        let err = ValidationError::InvalidNonce {
            input: "x".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid signature nonce: x");

        let err = ValidationError::MissingEnv {
            name: "ALIYUN_ACCESS_KEY_ID",
        };
        assert_eq!(
            err.to_string(),
            "ALIYUN_ACCESS_KEY_ID environment variable is not set or empty"
        );
    }
}
