use serde::Deserialize;
use serde_json::Value;

use super::date::{TransportDate, into_utc};
use super::envelope::{JsonBody, decode_collection, decode_root};
use super::{TransportError, positive_id};
use crate::domain::{
    AccountId, BuyLocalNumber, BuyNumber, CallbackMethod, Capabilities, Carrier, ConnectorId,
    Device, Number, NumberId, NumberInfo, NumberOptions, NumberSelector, PhoneNumberType,
    ValidationError,
};

const ROOT: &str = "phone_number";
const COLLECTION: &str = "phone_numbers";
const NUMBER_INFO: &str = "number_info";

#[derive(Debug, Clone, Deserialize)]
struct NumberJson {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    date_created: Option<TransportDate>,
    #[serde(default)]
    date_modified: Option<TransportDate>,
    #[serde(default)]
    account_id: Option<u32>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    phone_number_type: Option<String>,
    #[serde(default)]
    status_text_url: Option<String>,
    #[serde(default)]
    incoming_text_url: Option<String>,
    #[serde(default)]
    incoming_text_method: Option<String>,
    #[serde(default)]
    incoming_text_fallback_url: Option<String>,
    #[serde(default)]
    incoming_text_fallback_method: Option<String>,
    #[serde(default)]
    voice_forwarding_number: Option<String>,
    #[serde(default)]
    capabilities: Option<CapabilitiesJson>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    lata: Option<String>,
    #[serde(default)]
    rate_center: Option<String>,
    #[serde(default)]
    active: Option<bool>,
    #[serde(default)]
    connector_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct CapabilitiesJson {
    #[serde(default)]
    sms: Option<bool>,
    #[serde(default)]
    mms: Option<bool>,
    #[serde(default)]
    voice: Option<bool>,
}

impl From<NumberJson> for Number {
    fn from(value: NumberJson) -> Self {
        Self {
            id: positive_id(value.id, NumberId::new),
            date_created: into_utc(value.date_created),
            date_modified: into_utc(value.date_modified),
            account_id: positive_id(value.account_id, AccountId::new),
            name: value.name,
            phone_number: value.phone_number,
            phone_number_type: value
                .phone_number_type
                .as_deref()
                .map(PhoneNumberType::from_wire),
            status_text_url: value.status_text_url,
            incoming_text_url: value.incoming_text_url,
            incoming_text_method: value
                .incoming_text_method
                .as_deref()
                .map(CallbackMethod::from_wire),
            incoming_text_fallback_url: value.incoming_text_fallback_url,
            incoming_text_fallback_method: value
                .incoming_text_fallback_method
                .as_deref()
                .map(CallbackMethod::from_wire),
            voice_forwarding_number: value.voice_forwarding_number,
            capabilities: value.capabilities.map(|caps| Capabilities {
                sms: caps.sms.unwrap_or_default(),
                mms: caps.mms.unwrap_or_default(),
                voice: caps.voice.unwrap_or_default(),
            }),
            city: value.city,
            region: value.region,
            lata: value.lata,
            rate_center: value.rate_center,
            active: value.active.unwrap_or_default(),
            connector_id: positive_id(value.connector_id, ConnectorId::new),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct NumberInfoJson {
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    date_created: Option<TransportDate>,
    #[serde(default)]
    date_modified: Option<TransportDate>,
    #[serde(default)]
    carrier: Option<CarrierJson>,
    #[serde(default)]
    device: Option<DeviceJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct CarrierJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    network_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DeviceJson {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    manufacturer: Option<String>,
    #[serde(default, rename = "type")]
    device_type: Option<String>,
}

impl From<NumberInfoJson> for NumberInfo {
    fn from(value: NumberInfoJson) -> Self {
        Self {
            phone_number: value.phone_number,
            date_created: into_utc(value.date_created),
            date_modified: into_utc(value.date_modified),
            carrier: value.carrier.map(|carrier| Carrier {
                name: carrier.name,
                country: carrier.country,
                network_code: carrier.network_code,
            }),
            device: value.device.map(|device| Device {
                model: device.model,
                manufacturer: device.manufacturer,
                device_type: device.device_type,
            }),
        }
    }
}

fn push_selector(builder: JsonBody, selector: &NumberSelector) -> JsonBody {
    match selector {
        NumberSelector::PhoneNumber(phone_number) => {
            builder.field("phone_number", phone_number.e164())
        }
        NumberSelector::AreaCode(area_code) => builder.field("area_code", area_code.as_str()),
    }
}

fn push_options(builder: JsonBody, options: &NumberOptions) -> JsonBody {
    builder
        .optional("name", options.name.clone())
        .optional("status_text_url", options.status_text_url.clone())
        .optional("connector_id", options.connector_id.map(ConnectorId::get))
        .optional("incoming_text_url", options.incoming_text_url.clone())
        .optional(
            "incoming_text_method",
            options.incoming_text_method.as_ref().map(CallbackMethod::as_str),
        )
        .optional(
            "incoming_text_fallback_url",
            options.incoming_text_fallback_url.clone(),
        )
        .optional(
            "incoming_text_fallback_method",
            options
                .incoming_text_fallback_method
                .as_ref()
                .map(CallbackMethod::as_str),
        )
        .optional(
            "voice_forwarding_number",
            options.voice_forwarding_number.clone(),
        )
        .extend_absent(&options.extra)
}

/// Body for `POST numbers.json`.
pub fn encode_buy_number_body(request: &BuyNumber) -> Value {
    let builder = push_selector(JsonBody::new(ROOT), request.selector()).optional(
        "phone_number_type",
        request.phone_number_type().map(PhoneNumberType::as_str),
    );
    push_options(builder, request.options()).build()
}

/// Body for `POST numbers/local.json`.
pub fn encode_buy_local_number_body(request: &BuyLocalNumber) -> Value {
    let builder = push_selector(JsonBody::new(ROOT), request.selector());
    push_options(builder, request.options()).build()
}

/// Body for buying a number returned by an available-number search.
pub fn encode_buy_available_number_body(number: &Number) -> Result<Value, ValidationError> {
    let phone_number = number
        .phone_number
        .as_deref()
        .ok_or(ValidationError::Missing {
            field: "phone_number",
        })?;
    let phone_number_type = number
        .phone_number_type
        .as_ref()
        .ok_or(ValidationError::Missing {
            field: PhoneNumberType::FIELD,
        })?;

    Ok(JsonBody::new(ROOT)
        .field("phone_number", phone_number)
        .field("phone_number_type", phone_number_type.as_str())
        .optional("name", number.name.clone())
        .optional("status_text_url", number.status_text_url.clone())
        .optional("connector_id", number.connector_id.map(ConnectorId::get))
        .optional("incoming_text_url", number.incoming_text_url.clone())
        .optional(
            "incoming_text_method",
            number.incoming_text_method.as_ref().map(CallbackMethod::as_str),
        )
        .optional(
            "incoming_text_fallback_url",
            number.incoming_text_fallback_url.clone(),
        )
        .optional(
            "incoming_text_fallback_method",
            number
                .incoming_text_fallback_method
                .as_ref()
                .map(CallbackMethod::as_str),
        )
        .build())
}

/// Body for `PUT numbers/{id}.json` and `PUT numbers/local/{id}.json`.
pub fn encode_update_number_body(id: NumberId, number: &Number) -> Value {
    JsonBody::new(ROOT)
        .field("id", id.get())
        .optional("connector_id", number.connector_id.map(ConnectorId::get))
        .optional("incoming_text_url", number.incoming_text_url.clone())
        .optional(
            "incoming_text_method",
            number.incoming_text_method.as_ref().map(CallbackMethod::as_str),
        )
        .optional(
            "incoming_text_fallback_url",
            number.incoming_text_fallback_url.clone(),
        )
        .optional(
            "incoming_text_fallback_method",
            number
                .incoming_text_fallback_method
                .as_ref()
                .map(CallbackMethod::as_str),
        )
        .optional(
            "voice_forwarding_number",
            number.voice_forwarding_number.clone(),
        )
        .build()
}

pub fn decode_number_response(json: &str) -> Result<Number, TransportError> {
    decode_root::<NumberJson>(json, ROOT).map(Number::from)
}

pub fn decode_numbers_response(json: &str) -> Result<Vec<Number>, TransportError> {
    let items = decode_collection::<NumberJson>(json, COLLECTION)?;
    Ok(items.into_iter().map(Number::from).collect())
}

pub fn decode_number_info_response(json: &str) -> Result<NumberInfo, TransportError> {
    decode_root::<NumberInfoJson>(json, NUMBER_INFO).map(NumberInfo::from)
}
