use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::domain::value::{AreaCode, CallbackMethod, ConnectorId, PhoneNumber, PhoneNumberType};

/// Query-string filters for list and search operations.
///
/// Keys are unique; setting a key twice keeps the last value. Pairs are
/// emitted in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page number for paginated listings (1-based).
    pub fn page(self, page: u32) -> Self {
        self.with("page", page.to_string())
    }

    /// Maximum number of results per page.
    pub fn limit(self, limit: u32) -> Self {
        self.with("limit", limit.to_string())
    }

    /// Set an arbitrary filter understood by the endpoint.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Optional settings sent when buying a number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberOptions {
    pub name: Option<String>,
    pub status_text_url: Option<String>,
    pub connector_id: Option<ConnectorId>,
    pub incoming_text_url: Option<String>,
    pub incoming_text_method: Option<CallbackMethod>,
    pub incoming_text_fallback_url: Option<String>,
    pub incoming_text_fallback_method: Option<CallbackMethod>,
    pub voice_forwarding_number: Option<String>,
    /// Further body fields passed through as-is. Keys already set by the
    /// typed fields or the number selector take precedence.
    pub extra: Map<String, Value>,
}

impl NumberOptions {
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// How the number to buy is chosen: an exact number, or any number in an area code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberSelector {
    PhoneNumber(PhoneNumber),
    AreaCode(AreaCode),
}

/// Purchase a number of any type (`POST numbers.json`).
#[derive(Debug, Clone)]
pub struct BuyNumber {
    selector: NumberSelector,
    phone_number_type: Option<PhoneNumberType>,
    options: NumberOptions,
}

impl BuyNumber {
    pub fn phone_number(
        phone_number: PhoneNumber,
        phone_number_type: PhoneNumberType,
        options: NumberOptions,
    ) -> Self {
        Self {
            selector: NumberSelector::PhoneNumber(phone_number),
            phone_number_type: Some(phone_number_type),
            options,
        }
    }

    pub fn area_code(
        area_code: AreaCode,
        phone_number_type: Option<PhoneNumberType>,
        options: NumberOptions,
    ) -> Self {
        Self {
            selector: NumberSelector::AreaCode(area_code),
            phone_number_type,
            options,
        }
    }

    pub fn selector(&self) -> &NumberSelector {
        &self.selector
    }

    pub fn phone_number_type(&self) -> Option<&PhoneNumberType> {
        self.phone_number_type.as_ref()
    }

    pub fn options(&self) -> &NumberOptions {
        &self.options
    }
}

/// Purchase a local number (`POST numbers/local.json`).
#[derive(Debug, Clone)]
pub struct BuyLocalNumber {
    selector: NumberSelector,
    options: NumberOptions,
}

impl BuyLocalNumber {
    pub fn phone_number(phone_number: PhoneNumber, options: NumberOptions) -> Self {
        Self {
            selector: NumberSelector::PhoneNumber(phone_number),
            options,
        }
    }

    pub fn area_code(area_code: AreaCode, options: NumberOptions) -> Self {
        Self {
            selector: NumberSelector::AreaCode(area_code),
            options,
        }
    }

    pub fn selector(&self) -> &NumberSelector {
        &self.selector
    }

    pub fn options(&self) -> &NumberOptions {
        &self.options
    }
}
