use reqwest::Method;
use tracing::{debug, instrument};

use super::{VivialClient, VivialError};
use crate::domain::{Attachment, Message, MessageId, QueryParams, ValidationError};
use crate::transport::{
    decode_attachments_response, decode_message_response, decode_messages_response,
    encode_redact_message_body, encode_send_message_body,
};

const RESOURCE: &str = "messages";

impl VivialClient {
    /// Send a text message and copy the created resource back into `message`.
    ///
    /// Constraints:
    /// - `to_number` is required,
    /// - either `from_number` or `connector_id` must be set,
    /// - the body may be empty only when media URLs are attached, and is limited to
    ///   1600 characters.
    ///
    /// Errors:
    /// - Returns [`VivialError::Validation`] when a constraint is violated (no request
    ///   is made),
    /// - [`VivialError::Api`] / [`VivialError::HttpStatus`] for non-2xx responses.
    #[instrument(skip(self, message), fields(account_id = %self.account_id))]
    pub async fn send_message(&self, message: &mut Message) -> Result<(), VivialError> {
        let body = encode_send_message_body(message)?;
        let url = self.resource_url(RESOURCE, None)?;
        let returned = self
            .send_json(Method::POST, url, body)
            .await?
            .decode(decode_message_response)?;
        debug!(message_id = ?returned.id, status = ?returned.status, "message accepted");
        message.update_from(returned);
        Ok(())
    }

    /// Fetch one message by id.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn get_message_by_id(&self, id: MessageId) -> Result<Message, VivialError> {
        let url = self.resource_url(RESOURCE, Some(&id.to_string()))?;
        self.get(url, &QueryParams::new())
            .await?
            .decode(decode_message_response)
    }

    /// List messages; `query` carries paging (`page`, `limit`) and filters.
    #[instrument(skip(self, query), fields(account_id = %self.account_id))]
    pub async fn get_messages(&self, query: &QueryParams) -> Result<Vec<Message>, VivialError> {
        let url = self.resource_url(RESOURCE, None)?;
        self.get(url, query)
            .await?
            .decode(decode_messages_response)
    }

    /// Total number of messages on the account.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn message_count(&self) -> Result<u64, VivialError> {
        self.count(self.resource_url(RESOURCE, Some("count"))?)
            .await
    }

    /// List the media attachments of an MMS message.
    #[instrument(
        skip(self, message),
        fields(account_id = %self.account_id, message_id = ?message.id)
    )]
    pub async fn get_attachments(&self, message: &Message) -> Result<Vec<Attachment>, VivialError> {
        let id = message.id.ok_or(ValidationError::Missing {
            field: MessageId::FIELD,
        })?;
        let url = self.resource_url(RESOURCE, Some(&format!("{id}/attachments")))?;
        self.get(url, &QueryParams::new())
            .await?
            .decode(decode_attachments_response)
    }

    /// Blank the body of a stored message and copy the result back into `message`.
    #[instrument(
        skip(self, message),
        fields(account_id = %self.account_id, message_id = ?message.id)
    )]
    pub async fn redact_message(&self, message: &mut Message) -> Result<(), VivialError> {
        let id = message.id.ok_or(ValidationError::Missing {
            field: MessageId::FIELD,
        })?;
        let url = self.resource_url(RESOURCE, Some(&id.to_string()))?;
        let returned = self
            .send_json(Method::PUT, url, encode_redact_message_body(id))
            .await?
            .decode(decode_message_response)?;
        message.update_from(returned);
        Ok(())
    }
}
