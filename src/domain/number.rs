use chrono::{DateTime, Utc};

use crate::domain::validation::ValidationError;
use crate::domain::value::{AccountId, CallbackMethod, ConnectorId, NumberId, PhoneNumberType};

#[derive(Debug, Clone, Default, PartialEq)]
/// Phone number resource (`phone_number`).
///
/// The same type describes numbers the account already owns (associated
/// numbers) and numbers still available for purchase. Available numbers only
/// carry the location fields (`city`, `region`, `lata`, `rate_center`) and
/// have no `id`.
pub struct Number {
    pub id: Option<NumberId>,
    pub date_created: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
    pub account_id: Option<AccountId>,
    /// Number as displayed to users, `(xxx) yyy-zzzz` by default.
    pub name: Option<String>,
    /// E.164 format, `+1xxxyyyzzzz` for US numbers.
    pub phone_number: Option<String>,
    pub phone_number_type: Option<PhoneNumberType>,
    pub status_text_url: Option<String>,
    pub incoming_text_url: Option<String>,
    pub incoming_text_method: Option<CallbackMethod>,
    pub incoming_text_fallback_url: Option<String>,
    pub incoming_text_fallback_method: Option<CallbackMethod>,
    pub voice_forwarding_number: Option<String>,
    pub capabilities: Option<Capabilities>,
    pub city: Option<String>,
    /// Two-letter US state abbreviation.
    pub region: Option<String>,
    pub lata: Option<String>,
    pub rate_center: Option<String>,
    pub active: bool,
    pub connector_id: Option<ConnectorId>,
}

impl Number {
    pub fn is_local(&self) -> bool {
        matches!(self.phone_number_type, Some(PhoneNumberType::Local))
    }

    /// Fail unless this is a local (non-toll-free) number.
    pub fn ensure_local(&self) -> Result<(), ValidationError> {
        if self.is_local() {
            return Ok(());
        }
        Err(ValidationError::NotLocalNumber {
            phone_number: self.phone_number.clone(),
        })
    }

    pub(crate) fn update_from(&mut self, returned: Number) {
        *self = returned;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
/// Capabilities supported by a phone number.
pub struct Capabilities {
    pub sms: bool,
    pub mms: bool,
    pub voice: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Carrier and device information returned by a number lookup.
pub struct NumberInfo {
    pub phone_number: Option<String>,
    pub date_created: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
    pub carrier: Option<Carrier>,
    pub device: Option<Device>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Carrier {
    pub name: Option<String>,
    pub country: Option<String>,
    pub network_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Device {
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub device_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_local_accepts_only_local_numbers() {
        let local = Number {
            phone_number_type: Some(PhoneNumberType::Local),
            ..Default::default()
        };
        assert!(local.is_local());
        assert!(local.ensure_local().is_ok());

        let tollfree = Number {
            phone_number: Some("+18005550100".to_owned()),
            phone_number_type: Some(PhoneNumberType::TollFree),
            ..Default::default()
        };
        assert_eq!(
            tollfree.ensure_local(),
            Err(ValidationError::NotLocalNumber {
                phone_number: Some("+18005550100".to_owned())
            })
        );

        assert!(Number::default().ensure_local().is_err());
    }
}
