use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Payload is not valid base64: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("Payload is not valid UTF-8 text: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Payload is not a JSON document: {message}")]
    InvalidJson { message: String },

    #[error("Processing deadline reached before record {record_id}")]
    DeadlineExceeded { record_id: String },

    #[error("Malformed batch envelope: {message}")]
    Envelope { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Affects a single record only.
    Record,
    /// The invocation as a whole must fail so the caller retries it.
    Invocation,
    Envelope,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TransformError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TransformError::Base64Decode(_)
            | TransformError::InvalidUtf8(_)
            | TransformError::InvalidJson { .. } => ErrorCategory::Record,
            TransformError::DeadlineExceeded { .. } => ErrorCategory::Invocation,
            TransformError::Envelope { .. } | TransformError::SerializationError(_) => {
                ErrorCategory::Envelope
            }
            TransformError::TomlParse(_)
            | TransformError::ConfigError { .. }
            | TransformError::MissingConfigError { .. }
            | TransformError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            TransformError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Record => ErrorSeverity::Low,
            ErrorCategory::Invocation | ErrorCategory::Envelope => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Whether this error should be turned into a record status instead
    /// of failing the batch.
    pub fn is_record_level(&self) -> bool {
        self.category() == ErrorCategory::Record
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TransformError::Base64Decode(_) => {
                "Check that the producer sends base64-encoded payloads"
            }
            TransformError::InvalidUtf8(_) => "Check that the producer sends UTF-8 text payloads",
            TransformError::InvalidJson { .. } => {
                "Send JSON documents or disable JSON validation"
            }
            TransformError::DeadlineExceeded { .. } => {
                "Lower the Firehose buffer size or raise the function timeout"
            }
            TransformError::Envelope { .. } | TransformError::SerializationError(_) => {
                "Make sure the input is a Firehose transformation event"
            }
            TransformError::TomlParse(_) => "Fix the syntax of the TOML configuration file",
            TransformError::ConfigError { .. }
            | TransformError::MissingConfigError { .. }
            | TransformError::InvalidConfigValueError { .. } => {
                "Review the configuration values and environment variables"
            }
            TransformError::IoError(_) => "Check that the paths exist and are writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Record => format!("A record could not be transformed: {}", self),
            ErrorCategory::Invocation => format!("The batch was not finished: {}", self),
            ErrorCategory::Envelope => format!("The input batch could not be read: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
