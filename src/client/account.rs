use reqwest::Method;
use tracing::{debug, instrument};

use super::{VivialClient, VivialError};
use crate::domain::{Account, Contact, ContactId, QueryParams, ValidationError};
use crate::transport::{
    decode_account_response, decode_contact_response, decode_contacts_response,
    encode_contact_body, encode_update_account_body,
};

const CONTACTS: &str = "contacts";

fn required_id(contact: &Contact) -> Result<ContactId, ValidationError> {
    contact.id.ok_or(ValidationError::Missing {
        field: ContactId::FIELD,
    })
}

impl VivialClient {
    /// Fetch the account the client is scoped to.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn get_account(&self) -> Result<Account, VivialError> {
        self.get(self.account_url()?, &QueryParams::new())
            .await?
            .decode(decode_account_response)
    }

    /// Save the account's `company_name` and copy the stored account back.
    #[instrument(skip(self, account), fields(account_id = %self.account_id))]
    pub async fn update_account(&self, account: &mut Account) -> Result<(), VivialError> {
        let body = encode_update_account_body(self.account_id, account);
        let returned = self
            .send_json(Method::PUT, self.account_url()?, body)
            .await?
            .decode(decode_account_response)?;
        account.update_from(returned);
        Ok(())
    }

    /// Create a contact from the fields that are set and copy the result back.
    #[instrument(skip(self, contact), fields(account_id = %self.account_id))]
    pub async fn create_contact(&self, contact: &mut Contact) -> Result<(), VivialError> {
        let url = self.resource_url(CONTACTS, None)?;
        let returned = self
            .send_json(Method::POST, url, encode_contact_body(contact))
            .await?
            .decode(decode_contact_response)?;
        debug!(contact_id = ?returned.id, "contact created");
        contact.update_from(returned);
        Ok(())
    }

    /// Save a stored contact and copy the result back.
    #[instrument(
        skip(self, contact),
        fields(account_id = %self.account_id, contact_id = ?contact.id)
    )]
    pub async fn update_contact(&self, contact: &mut Contact) -> Result<(), VivialError> {
        let id = required_id(contact)?;
        let url = self.resource_url(CONTACTS, Some(&id.to_string()))?;
        let returned = self
            .send_json(Method::PUT, url, encode_contact_body(contact))
            .await?
            .decode(decode_contact_response)?;
        contact.update_from(returned);
        Ok(())
    }

    /// Delete a contact. Returns `true` when the server answers `204 No Content`.
    #[instrument(
        skip(self, contact),
        fields(account_id = %self.account_id, contact_id = ?contact.id)
    )]
    pub async fn delete_contact(&self, contact: &Contact) -> Result<bool, VivialError> {
        let id = required_id(contact)?;
        self.delete(self.resource_url(CONTACTS, Some(&id.to_string()))?)
            .await
    }

    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn get_contact_by_id(&self, id: ContactId) -> Result<Contact, VivialError> {
        let url = self.resource_url(CONTACTS, Some(&id.to_string()))?;
        self.get(url, &QueryParams::new())
            .await?
            .decode(decode_contact_response)
    }

    #[instrument(skip(self, query), fields(account_id = %self.account_id))]
    pub async fn get_contacts(&self, query: &QueryParams) -> Result<Vec<Contact>, VivialError> {
        let url = self.resource_url(CONTACTS, None)?;
        self.get(url, query)
            .await?
            .decode(decode_contacts_response)
    }

    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn contact_count(&self) -> Result<u64, VivialError> {
        self.count(self.resource_url(CONTACTS, Some("count"))?)
            .await
    }
}
