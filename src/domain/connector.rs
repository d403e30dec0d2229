use chrono::{DateTime, Utc};

use crate::domain::value::{AccountId, CallbackMethod, ConnectorId, NumberId, PhoneNumber};

/// The API lists at most this many phone numbers inline on a connector.
pub const CONNECTOR_MAX_LISTED_NUMBERS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq)]
/// Connector resource: a routing configuration grouping callbacks and phone numbers.
pub struct Connector {
    pub id: Option<ConnectorId>,
    pub date_created: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
    pub account_id: Option<AccountId>,
    pub active: bool,
    /// User-defined descriptive label.
    pub name: Option<String>,
    pub callbacks: Vec<Callback>,
    pub phone_numbers: Vec<ConnectorPhoneNumber>,
    /// `true` when more than [`CONNECTOR_MAX_LISTED_NUMBERS`] numbers are associated.
    pub more_phone_numbers: bool,
}

impl Connector {
    /// Start a connector with the given label, ready to be created.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Queue a callback to be saved by `create_callbacks` or `update_callbacks`.
    ///
    /// ```rust
    /// use vivialconnect::{Callback, CallbackMethod, Connector};
    ///
    /// let mut connector = Connector::named("support");
    /// connector
    ///     .add_callback(Callback::new("text", "incoming", "https://example.com/in", CallbackMethod::Post))
    ///     .add_callback(Callback::new("text", "status", "https://example.com/status", CallbackMethod::Post));
    /// assert_eq!(connector.callbacks.len(), 2);
    /// ```
    pub fn add_callback(&mut self, callback: Callback) -> &mut Self {
        self.callbacks.push(callback);
        self
    }

    /// Queue a phone number to be saved by `create_phone_numbers` or `update_phone_numbers`.
    pub fn add_phone_number(
        &mut self,
        phone_number_id: NumberId,
        phone_number: &PhoneNumber,
    ) -> &mut Self {
        self.phone_numbers.push(ConnectorPhoneNumber {
            phone_number_id: Some(phone_number_id),
            phone_number: Some(phone_number.e164().to_owned()),
        });
        self
    }

    pub(crate) fn update_from(&mut self, returned: Connector) {
        *self = returned;
    }

    pub(crate) fn merge_callbacks(&mut self, returned: Connector) {
        self.date_modified = returned.date_modified;
        self.callbacks = returned.callbacks;
    }

    pub(crate) fn merge_phone_numbers(&mut self, returned: Connector) {
        self.date_modified = returned.date_modified;
        self.phone_numbers = returned.phone_numbers;
        self.more_phone_numbers = returned.more_phone_numbers;
    }

    /// Drop callbacks with the same message and event type as any in `removed`.
    pub(crate) fn forget_callbacks(&mut self, removed: &[Callback]) {
        self.callbacks.retain(|callback| {
            !removed.iter().any(|gone| {
                gone.message_type == callback.message_type && gone.event_type == callback.event_type
            })
        });
    }

    /// Drop phone numbers matching any in `removed` by id or by number.
    pub(crate) fn forget_phone_numbers(&mut self, removed: &[ConnectorPhoneNumber]) {
        self.phone_numbers
            .retain(|entry| !removed.iter().any(|gone| gone.identifies(entry)));
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Webhook configuration for inbound or status events on a connector.
pub struct Callback {
    pub date_created: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
    /// Kind of traffic, e.g. `text`.
    pub message_type: String,
    /// Event that triggers the webhook, e.g. `incoming`, `incoming_fallback` or `status`.
    pub event_type: String,
    pub url: String,
    pub method: CallbackMethod,
}

impl Callback {
    pub fn new(
        message_type: impl Into<String>,
        event_type: impl Into<String>,
        url: impl Into<String>,
        method: CallbackMethod,
    ) -> Self {
        Self {
            date_created: None,
            date_modified: None,
            message_type: message_type.into(),
            event_type: event_type.into(),
            url: url.into(),
            method,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Phone number attached to a connector.
pub struct ConnectorPhoneNumber {
    pub phone_number_id: Option<NumberId>,
    pub phone_number: Option<String>,
}

impl ConnectorPhoneNumber {
    fn identifies(&self, other: &ConnectorPhoneNumber) -> bool {
        match (self.phone_number_id, other.phone_number_id) {
            (Some(left), Some(right)) => left == right,
            _ => self.phone_number.is_some() && self.phone_number == other.phone_number,
        }
    }
}
