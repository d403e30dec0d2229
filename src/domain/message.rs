use chrono::{DateTime, Utc};

use crate::domain::validation::ValidationError;
use crate::domain::value::{AccountId, ConnectorId, MessageId, MessageType, PhoneNumber};

/// Maximum length of a text message body, in characters.
pub const MESSAGE_BODY_MAX_CHARS: usize = 1600;

#[derive(Debug, Clone, Default, PartialEq)]
/// Text message resource (`message`).
///
/// A freshly built outbound message only carries the fields you set; after
/// [`VivialClient::send_message`](crate::VivialClient::send_message) every field
/// reflects what the API returned.
pub struct Message {
    pub id: Option<MessageId>,
    pub date_created: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
    pub account_id: Option<AccountId>,
    /// For subaccounts, the id of the parent (primary) account.
    pub master_account_id: Option<AccountId>,
    pub message_type: Option<MessageType>,
    /// Inbound/outbound direction and, if outbound, how it was initiated.
    pub direction: Option<String>,
    /// Recipient in E.164 format.
    pub to_number: Option<String>,
    /// Sender in E.164 format. Ignored by the API when `connector_id` is set.
    pub from_number: Option<String>,
    pub connector_id: Option<ConnectorId>,
    /// When the message was received (inbound) or sent (outbound).
    pub sent: Option<DateTime<Utc>>,
    pub num_media: u32,
    pub num_segments: u32,
    pub body: Option<String>,
    pub status: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    /// Amount billed, in `price_currency`.
    pub price: Option<i64>,
    pub price_currency: Option<String>,
    pub media_urls: Vec<String>,
}

impl Message {
    /// Start an outbound message to `to` with a text body.
    pub fn outbound(to: &PhoneNumber, body: impl Into<String>) -> Self {
        Self {
            to_number: Some(to.e164().to_owned()),
            body: Some(body.into()),
            ..Default::default()
        }
    }

    /// Send from one of the account's associated numbers.
    pub fn from_number(mut self, from: &PhoneNumber) -> Self {
        self.from_number = Some(from.e164().to_owned());
        self
    }

    /// Send through a connector instead of a specific sender number.
    pub fn via_connector(mut self, connector_id: ConnectorId) -> Self {
        self.connector_id = Some(connector_id);
        self
    }

    /// Attach a media URL, turning the message into an MMS.
    pub fn add_media_url(&mut self, media_url: &str) -> Result<&mut Self, ValidationError> {
        let parsed = url::Url::parse(media_url).map_err(|_| ValidationError::InvalidUrl {
            field: "media_urls",
            input: media_url.to_owned(),
        })?;
        self.media_urls.push(parsed.into());
        Ok(self)
    }

    pub fn has_media_urls(&self) -> bool {
        !self.media_urls.is_empty()
    }

    /// Replace local state with what the API returned.
    ///
    /// Media URLs are write-only on the API side, so the local list survives
    /// when the response carries none.
    pub(crate) fn update_from(&mut self, mut returned: Message) {
        let returned_urls = std::mem::take(&mut returned.media_urls);
        let local_urls = std::mem::take(&mut self.media_urls);
        *self = returned;
        self.media_urls = if returned_urls.is_empty() {
            local_urls
        } else {
            returned_urls
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Media attachment of an MMS message.
pub struct Attachment {
    pub id: Option<u32>,
    pub date_created: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
    pub account_id: Option<AccountId>,
    pub message_id: Option<MessageId>,
    pub content_type: Option<String>,
    /// Size in bytes.
    pub size: Option<u64>,
    pub file_name: Option<String>,
    pub key_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone(raw: &str) -> PhoneNumber {
        PhoneNumber::parse(None, raw).unwrap()
    }

    #[test]
    fn outbound_builder_sets_wire_fields() {
        let message = Message::outbound(&phone("+12025550123"), "hello")
            .from_number(&phone("+12025550199"))
            .via_connector(ConnectorId::new(42).unwrap());

        assert_eq!(message.to_number.as_deref(), Some("+12025550123"));
        assert_eq!(message.from_number.as_deref(), Some("+12025550199"));
        assert_eq!(message.body.as_deref(), Some("hello"));
        assert_eq!(message.connector_id.map(ConnectorId::get), Some(42));
        assert!(message.id.is_none());
    }

    #[test]
    fn add_media_url_validates_and_chains() {
        let mut message = Message::default();
        message
            .add_media_url("https://example.com/a.png")
            .unwrap()
            .add_media_url("https://example.com/b.png")
            .unwrap();
        assert_eq!(message.media_urls.len(), 2);
        assert!(message.has_media_urls());

        let err = message.add_media_url("not a url").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidUrl { .. }));
    }

    #[test]
    fn update_from_keeps_local_media_when_response_has_none() {
        let mut message = Message::default();
        message.add_media_url("https://example.com/a.png").unwrap();

        let returned = Message {
            id: Some(MessageId::new(9).unwrap()),
            status: Some("accepted".to_owned()),
            ..Default::default()
        };
        message.update_from(returned);

        assert_eq!(message.id.map(MessageId::get), Some(9));
        assert_eq!(message.status.as_deref(), Some("accepted"));
        assert_eq!(message.media_urls, vec!["https://example.com/a.png"]);
    }

    #[test]
    fn update_from_takes_media_from_response_when_present() {
        let mut message = Message::default();
        message.add_media_url("https://example.com/a.png").unwrap();

        let returned = Message {
            id: Some(MessageId::new(9).unwrap()),
            media_urls: vec!["https://cdn.example.com/a.png".to_owned()],
            ..Default::default()
        };
        message.update_from(returned);

        assert_eq!(message.media_urls, vec!["https://cdn.example.com/a.png"]);
    }
}
