//! Transport layer: HTTP and wire-format details (serialization/deserialization, signing).

mod account;
mod connector;
mod date;
mod envelope;
mod message;
mod number;
mod signing;

pub use account::{
    decode_account_response, decode_contact_response, decode_contacts_response,
    encode_contact_body, encode_update_account_body,
};
pub use connector::{
    decode_connector_response, decode_connectors_response, encode_callbacks_body,
    encode_create_connector_body, encode_phone_numbers_body, encode_update_connector_body,
};
pub use envelope::{decode_count, decode_error_message};
pub use message::{
    decode_attachments_response, decode_message_response, decode_messages_response,
    encode_redact_message_body, encode_send_message_body,
};
pub use number::{
    decode_number_info_response, decode_number_response, decode_numbers_response,
    encode_buy_available_number_body, encode_buy_local_number_body, encode_buy_number_body,
    encode_update_number_body,
};
pub use signing::sign_request;

use crate::domain::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is missing the `{key}` key")]
    MissingKey { key: &'static str },

    #[error("request signing failed: {0}")]
    Signing(String),
}

/// Wire ids use `0` (or omit the field) for "unset".
fn positive_id<T>(
    value: Option<u32>,
    new: fn(u32) -> Result<T, ValidationError>,
) -> Option<T> {
    value.and_then(|raw| new(raw).ok())
}
