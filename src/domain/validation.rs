use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    Missing { field: &'static str },
    InvalidId { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidAreaCode { input: String },
    InvalidUrl { field: &'static str, input: String },
    TooLong { field: &'static str, max: usize, actual: usize },
    NotLocalNumber { phone_number: Option<String> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::Missing { field } => write!(f, "{field} is required"),
            Self::InvalidId { field } => write!(f, "{field} must be a positive id"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidAreaCode { input } => {
                write!(f, "invalid area code: {input} (expected 3 digits)")
            }
            Self::InvalidUrl { field, input } => write!(f, "invalid {field}: {input}"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} too long: {actual} characters (max {max})")
            }
            Self::NotLocalNumber { phone_number } => match phone_number {
                Some(number) => write!(f, "number is not local: {number}"),
                None => write!(f, "number is not local"),
            },
        }
    }
}

impl std::error::Error for ValidationError {}
