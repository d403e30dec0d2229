use std::fmt;

use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Clone, PartialEq, Eq, Hash)]
/// Vivial Connect API key.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    pub const FIELD: &'static str = "api_key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.0).finish()
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Vivial Connect API secret, used as the HMAC key or Basic password.
///
/// Invariant: must not be empty. `Debug` never prints the value.
pub struct ApiSecret(String);

impl ApiSecret {
    pub const FIELD: &'static str = "api_secret";

    /// Create a validated [`ApiSecret`].
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

impl fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecret([REDACTED])")
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// OAuth bearer token.
///
/// Invariant: non-empty after trimming. `Debug` never prints the value.
pub struct BearerToken(String);

impl BearerToken {
    pub const FIELD: &'static str = "access_token";

    /// Create a validated [`BearerToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Account (or subaccount) identifier.
///
/// Invariant: positive.
pub struct AccountId(u32);

impl AccountId {
    pub const FIELD: &'static str = "account_id";

    /// Create a validated [`AccountId`].
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::InvalidId { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Text message identifier.
///
/// Invariant: positive.
pub struct MessageId(u32);

impl MessageId {
    pub const FIELD: &'static str = "id";

    /// Create a validated [`MessageId`].
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::InvalidId { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number resource identifier (not the phone number itself).
///
/// Invariant: positive.
pub struct NumberId(u32);

impl NumberId {
    pub const FIELD: &'static str = "id";

    /// Create a validated [`NumberId`].
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::InvalidId { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NumberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Connector identifier.
///
/// Invariant: positive.
pub struct ConnectorId(u32);

impl ConnectorId {
    pub const FIELD: &'static str = "connector_id";

    /// Create a validated [`ConnectorId`].
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::InvalidId { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Contact identifier.
///
/// Invariant: positive.
pub struct ContactId(u32);

impl ContactId {
    pub const FIELD: &'static str = "id";

    /// Create a validated [`ContactId`].
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::InvalidId { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form. Model types keep
/// phone numbers as the strings the API returned; this type is how callers hand
/// numbers to the client.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    pub const FIELD: &'static str = "phone_number";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    /// Vivial Connect numbers are North American, so most callers pass
    /// `Some(country::Id::US)`.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation (`+1xxxyyyzzzz` for US numbers).
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// E.164 digits without the leading `+`, as used by the lookup endpoint.
    pub fn digits(&self) -> &str {
        self.e164.strip_prefix('+').unwrap_or(&self.e164)
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.e164)
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::cmp::PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// North American area code used to search for or buy numbers.
///
/// Invariant: exactly three ASCII digits.
pub struct AreaCode(String);

impl AreaCode {
    pub const FIELD: &'static str = "area_code";

    /// Create a validated [`AreaCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.len() != 3 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidAreaCode {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Type of a phone number: local (non-toll-free) or toll-free.
///
/// Values unknown to this crate are preserved in [`PhoneNumberType::Other`].
pub enum PhoneNumberType {
    Local,
    TollFree,
    Other(String),
}

impl PhoneNumberType {
    pub const FIELD: &'static str = "phone_number_type";

    /// Map a wire value to a variant.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "local" => Self::Local,
            "tollfree" => Self::TollFree,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Wire value as sent to the API.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::TollFree => "tollfree",
            Self::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Kind of an inbound or outbound text message.
pub enum MessageType {
    LocalSms,
    TollFreeSms,
    LocalMms,
    Other(String),
}

impl MessageType {
    /// Map a wire value to a variant.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "local_sms" => Self::LocalSms,
            "tollfree_sms" => Self::TollFreeSms,
            "local_mms" => Self::LocalMms,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Wire value as returned by the API.
    pub fn as_str(&self) -> &str {
        match self {
            Self::LocalSms => "local_sms",
            Self::TollFreeSms => "tollfree_sms",
            Self::LocalMms => "local_mms",
            Self::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// HTTP method the platform uses when calling a webhook URL.
pub enum CallbackMethod {
    Get,
    Post,
    Other(String),
}

impl CallbackMethod {
    /// Map a wire value to a variant (case-insensitive).
    pub fn from_wire(value: &str) -> Self {
        if value.eq_ignore_ascii_case("GET") {
            Self::Get
        } else if value.eq_ignore_ascii_case("POST") {
            Self::Post
        } else {
            Self::Other(value.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Other(value) => value,
        }
    }
}
