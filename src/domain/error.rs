use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("configuration: {0}")]
    Configuration(String),

    #[error("transport: {0}")]
    Transport(String),

    #[error("adapter: {0}")]
    Adapter(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Adapter(_) => ErrorKind::Unhandled,
        }
    }

    /// The bare message, without the variant prefix `Display` adds.
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::Configuration(msg)
            | Self::Transport(msg)
            | Self::Adapter(msg) => msg,
        }
    }
}

/// Failure discriminator carried on the canonical result so callers can tell
/// a local rejection or transport failure apart from a processor decline.
/// Processor declines carry no kind at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Configuration,
    Transport,
    Unhandled,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Configuration => "configuration",
            Self::Transport => "transport",
            Self::Unhandled => "unhandled",
        }
    }
}
