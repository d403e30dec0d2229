use serde::Deserialize;
use serde_json::Value;

use super::date::{TransportDate, into_utc};
use super::envelope::{JsonBody, TransportInteger, TransportText, decode_collection, decode_root};
use super::{TransportError, positive_id};
use crate::domain::{
    AccountId, Attachment, ConnectorId, MESSAGE_BODY_MAX_CHARS, Message, MessageId, MessageType,
    ValidationError,
};

const ROOT: &str = "message";
const COLLECTION: &str = "messages";
const ATTACHMENTS: &str = "attachments";

#[derive(Debug, Clone, Deserialize)]
struct MessageJson {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    date_created: Option<TransportDate>,
    #[serde(default)]
    date_modified: Option<TransportDate>,
    #[serde(default)]
    account_id: Option<u32>,
    #[serde(default)]
    master_account_id: Option<u32>,
    #[serde(default)]
    message_type: Option<String>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    to_number: Option<String>,
    #[serde(default)]
    from_number: Option<String>,
    #[serde(default)]
    connector_id: Option<u32>,
    #[serde(default)]
    sent: Option<TransportDate>,
    #[serde(default)]
    num_media: Option<u32>,
    #[serde(default)]
    num_segments: Option<u32>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_code: Option<TransportText>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    price: Option<TransportInteger>,
    #[serde(default)]
    price_currency: Option<String>,
    #[serde(default)]
    media_urls: Option<Vec<String>>,
}

impl From<MessageJson> for Message {
    fn from(value: MessageJson) -> Self {
        Self {
            id: positive_id(value.id, MessageId::new),
            date_created: into_utc(value.date_created),
            date_modified: into_utc(value.date_modified),
            account_id: positive_id(value.account_id, AccountId::new),
            master_account_id: positive_id(value.master_account_id, AccountId::new),
            message_type: value.message_type.as_deref().map(MessageType::from_wire),
            direction: value.direction,
            to_number: value.to_number,
            from_number: value.from_number,
            connector_id: positive_id(value.connector_id, ConnectorId::new),
            sent: into_utc(value.sent),
            num_media: value.num_media.unwrap_or_default(),
            num_segments: value.num_segments.unwrap_or_default(),
            body: value.body,
            status: value.status,
            error_code: value.error_code.map(TransportText::into_string),
            error_message: value.error_message,
            price: value.price.as_ref().and_then(TransportInteger::truncate),
            price_currency: value.price_currency,
            media_urls: value.media_urls.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AttachmentJson {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    date_created: Option<TransportDate>,
    #[serde(default)]
    date_modified: Option<TransportDate>,
    #[serde(default)]
    account_id: Option<u32>,
    #[serde(default)]
    message_id: Option<u32>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    key_name: Option<String>,
}

impl From<AttachmentJson> for Attachment {
    fn from(value: AttachmentJson) -> Self {
        Self {
            id: value.id.filter(|id| *id > 0),
            date_created: into_utc(value.date_created),
            date_modified: into_utc(value.date_modified),
            account_id: positive_id(value.account_id, AccountId::new),
            message_id: positive_id(value.message_id, MessageId::new),
            content_type: value.content_type,
            size: value.size,
            file_name: value.file_name,
            key_name: value.key_name,
        }
    }
}

/// Body for `POST messages.json`.
///
/// `media_urls` is sent only when non-empty and `connector_id` only when set;
/// with a connector the API picks the sender, so `from_number` may be absent.
pub fn encode_send_message_body(message: &Message) -> Result<Value, ValidationError> {
    let to_number = message
        .to_number
        .as_deref()
        .filter(|number| !number.trim().is_empty())
        .ok_or(ValidationError::Missing { field: "to_number" })?;

    if message.connector_id.is_none() && message.from_number.is_none() {
        return Err(ValidationError::Missing {
            field: "from_number",
        });
    }

    let body = message.body.as_deref().unwrap_or_default();
    if body.is_empty() && !message.has_media_urls() {
        return Err(ValidationError::Missing { field: "body" });
    }
    let body_chars = body.chars().count();
    if body_chars > MESSAGE_BODY_MAX_CHARS {
        return Err(ValidationError::TooLong {
            field: "body",
            max: MESSAGE_BODY_MAX_CHARS,
            actual: body_chars,
        });
    }

    let mut builder = JsonBody::new(ROOT);
    if message.has_media_urls() {
        builder = builder.field("media_urls", message.media_urls.clone());
    }
    Ok(builder
        .optional("connector_id", message.connector_id.map(ConnectorId::get))
        .optional("from_number", message.from_number.clone())
        .field("to_number", to_number)
        .optional("body", message.body.clone())
        .build())
}

/// Body for `PUT messages/{id}.json` that blanks the message text.
pub fn encode_redact_message_body(id: MessageId) -> Value {
    JsonBody::new(ROOT)
        .field("id", id.get())
        .field("body", "")
        .build()
}

pub fn decode_message_response(json: &str) -> Result<Message, TransportError> {
    decode_root::<MessageJson>(json, ROOT).map(Message::from)
}

pub fn decode_messages_response(json: &str) -> Result<Vec<Message>, TransportError> {
    let items = decode_collection::<MessageJson>(json, COLLECTION)?;
    Ok(items.into_iter().map(Message::from).collect())
}

pub fn decode_attachments_response(json: &str) -> Result<Vec<Attachment>, TransportError> {
    let items = decode_collection::<AttachmentJson>(json, ATTACHMENTS)?;
    Ok(items.into_iter().map(Attachment::from).collect())
}
