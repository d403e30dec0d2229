use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::date::{TransportDate, into_utc};
use super::envelope::{JsonBody, decode_collection, decode_root};
use super::{TransportError, positive_id};
use crate::domain::{
    AccountId, Callback, CallbackMethod, Connector, ConnectorId, ConnectorPhoneNumber, NumberId,
};

const ROOT: &str = "connector";
const COLLECTION: &str = "connectors";

#[derive(Debug, Clone, Deserialize)]
struct ConnectorJson {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    date_created: Option<TransportDate>,
    #[serde(default)]
    date_modified: Option<TransportDate>,
    #[serde(default)]
    account_id: Option<u32>,
    #[serde(default)]
    active: Option<bool>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    callbacks: Option<Vec<CallbackJson>>,
    #[serde(default)]
    phone_numbers: Option<Vec<PhoneNumberJson>>,
    #[serde(default)]
    more_phone_numbers: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct CallbackJson {
    #[serde(default)]
    date_created: Option<TransportDate>,
    #[serde(default)]
    date_modified: Option<TransportDate>,
    #[serde(default)]
    message_type: Option<String>,
    #[serde(default)]
    event_type: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    method: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct PhoneNumberJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone_number_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct CallbackRequestJson<'a> {
    message_type: &'a str,
    event_type: &'a str,
    url: &'a str,
    method: &'a str,
}

impl From<CallbackJson> for Callback {
    fn from(value: CallbackJson) -> Self {
        Self {
            date_created: into_utc(value.date_created),
            date_modified: into_utc(value.date_modified),
            message_type: value.message_type.unwrap_or_default(),
            event_type: value.event_type.unwrap_or_default(),
            url: value.url.unwrap_or_default(),
            method: value
                .method
                .as_deref()
                .map(CallbackMethod::from_wire)
                .unwrap_or(CallbackMethod::Post),
        }
    }
}

impl From<PhoneNumberJson> for ConnectorPhoneNumber {
    fn from(value: PhoneNumberJson) -> Self {
        Self {
            phone_number_id: positive_id(value.phone_number_id, NumberId::new),
            phone_number: value.phone_number,
        }
    }
}

impl From<ConnectorJson> for Connector {
    fn from(value: ConnectorJson) -> Self {
        Self {
            id: positive_id(value.id, ConnectorId::new),
            date_created: into_utc(value.date_created),
            date_modified: into_utc(value.date_modified),
            account_id: positive_id(value.account_id, AccountId::new),
            active: value.active.unwrap_or_default(),
            name: value.name,
            callbacks: value
                .callbacks
                .unwrap_or_default()
                .into_iter()
                .map(Callback::from)
                .collect(),
            phone_numbers: value
                .phone_numbers
                .unwrap_or_default()
                .into_iter()
                .map(ConnectorPhoneNumber::from)
                .collect(),
            more_phone_numbers: value.more_phone_numbers.unwrap_or_default(),
        }
    }
}

/// Body for `POST connectors.json`.
pub fn encode_create_connector_body(connector: &Connector) -> Value {
    JsonBody::new(ROOT)
        .optional("name", connector.name.clone())
        .build()
}

/// Body for `PUT connectors/{id}.json`.
pub fn encode_update_connector_body(id: ConnectorId, connector: &Connector) -> Value {
    JsonBody::new(ROOT)
        .field("id", id.get())
        .optional("name", connector.name.clone())
        .build()
}

/// Body for the `connectors/{id}/callbacks.json` endpoints.
pub fn encode_callbacks_body(callbacks: &[Callback]) -> Result<Value, TransportError> {
    let items = callbacks
        .iter()
        .map(|callback| CallbackRequestJson {
            message_type: &callback.message_type,
            event_type: &callback.event_type,
            url: &callback.url,
            method: callback.method.as_str(),
        })
        .collect::<Vec<_>>();
    Ok(JsonBody::new(ROOT)
        .field("callbacks", serde_json::to_value(items)?)
        .build())
}

/// Body for the `connectors/{id}/phone_numbers.json` endpoints.
pub fn encode_phone_numbers_body(
    phone_numbers: &[ConnectorPhoneNumber],
) -> Result<Value, TransportError> {
    let items = phone_numbers
        .iter()
        .map(|entry| PhoneNumberJson {
            phone_number_id: entry.phone_number_id.map(NumberId::get),
            phone_number: entry.phone_number.clone(),
        })
        .collect::<Vec<_>>();
    Ok(JsonBody::new(ROOT)
        .field("phone_numbers", serde_json::to_value(items)?)
        .build())
}

pub fn decode_connector_response(json: &str) -> Result<Connector, TransportError> {
    decode_root::<ConnectorJson>(json, ROOT).map(Connector::from)
}

pub fn decode_connectors_response(json: &str) -> Result<Vec<Connector>, TransportError> {
    let items = decode_collection::<ConnectorJson>(json, COLLECTION)?;
    Ok(items.into_iter().map(Connector::from).collect())
}
