use thiserror::Error;

/// Longest slice of a raw portal body quoted back in diagnostics.
pub const BODY_EXCERPT_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Portal request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected portal response: {reason} (body: {body_excerpt:?})")]
    Protocol {
        reason: String,
        body_excerpt: String,
    },

    #[error("Operation cancelled before completion")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required setting: {field}")]
    MissingConfigError { field: String },
}

/// Coarse classes used when deciding how a failure is reported and whether
/// retrying later can help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Protocol,
    Configuration,
    Cancelled,
}

impl PortalError {
    pub fn protocol(reason: impl Into<String>, body: &str) -> Self {
        PortalError::Protocol {
            reason: reason.into(),
            body_excerpt: excerpt(body),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PortalError::Transport(_) => ErrorKind::Transport,
            PortalError::Protocol { .. } => ErrorKind::Protocol,
            PortalError::Cancelled => ErrorKind::Cancelled,
            PortalError::IoError(_)
            | PortalError::SerializationError(_)
            | PortalError::ConfigError { .. }
            | PortalError::InvalidConfigValueError { .. }
            | PortalError::MissingConfigError { .. } => ErrorKind::Configuration,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Transport => "The portal could not be reached; the next scheduled run will try again",
            ErrorKind::Protocol => "The portal answered with something other than its login XML; check the base URL",
            ErrorKind::Configuration => "Fix the settings or credentials file, then run again",
            ErrorKind::Cancelled => "The run was interrupted; start it again when ready",
        }
    }
}

/// Cuts `body` down to [`BODY_EXCERPT_CHARS`] characters without splitting a
/// multi-byte character.
pub fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
