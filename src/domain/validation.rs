use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidUrl { input: String },
    RelativeUrl { input: String },
    ZeroDuration { field: &'static str },
    ZeroCount { field: &'static str },
    InvalidPhoneNumber { input: String },
    Serialization { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidUrl { input } => write!(f, "invalid URL: {input}"),
            Self::RelativeUrl { input } => {
                write!(f, "URL must be absolute (with scheme and host): {input}")
            }
            Self::ZeroDuration { field } => write!(f, "{field} must be greater than zero"),
            Self::ZeroCount { field } => write!(f, "{field} must be at least 1"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::Serialization { message } => {
                write!(f, "request body could not be serialized: {message}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
