use serde::Deserialize;
use serde_json::Value;

use super::date::{TransportDate, into_utc};
use super::envelope::{JsonBody, decode_collection, decode_root};
use super::{TransportError, positive_id};
use crate::domain::{Account, AccountId, Contact, ContactId};

const ACCOUNT_ROOT: &str = "account";
const CONTACT_ROOT: &str = "contact";
const CONTACT_COLLECTION: &str = "contacts";

#[derive(Debug, Clone, Deserialize)]
struct AccountJson {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    account_id: Option<u32>,
    #[serde(default)]
    date_created: Option<TransportDate>,
    #[serde(default)]
    date_modified: Option<TransportDate>,
    #[serde(default)]
    company_name: Option<String>,
}

impl From<AccountJson> for Account {
    fn from(value: AccountJson) -> Self {
        Self {
            id: positive_id(value.id, AccountId::new),
            account_id: positive_id(value.account_id, AccountId::new),
            date_created: into_utc(value.date_created),
            date_modified: into_utc(value.date_modified),
            company_name: value.company_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ContactJson {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    account_id: Option<u32>,
    #[serde(default)]
    date_created: Option<TransportDate>,
    #[serde(default)]
    date_modified: Option<TransportDate>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    mobile_phone: Option<String>,
    #[serde(default)]
    work_phone: Option<String>,
    #[serde(default)]
    contact_type: Option<String>,
}

impl From<ContactJson> for Contact {
    fn from(value: ContactJson) -> Self {
        Self {
            id: positive_id(value.id, ContactId::new),
            account_id: positive_id(value.account_id, AccountId::new),
            date_created: into_utc(value.date_created),
            date_modified: into_utc(value.date_modified),
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            company_name: value.company_name,
            title: value.title,
            mobile_phone: value.mobile_phone,
            work_phone: value.work_phone,
            contact_type: value.contact_type,
        }
    }
}

/// Body for `PUT accounts/{id}.json`.
pub fn encode_update_account_body(id: AccountId, account: &Account) -> Value {
    JsonBody::new(ACCOUNT_ROOT)
        .field("id", id.get())
        .optional("company_name", account.company_name.clone())
        .build()
}

/// Body for creating or updating a contact; only fields that are set are sent.
pub fn encode_contact_body(contact: &Contact) -> Value {
    JsonBody::new(CONTACT_ROOT)
        .optional("id", contact.id.map(ContactId::get))
        .optional("first_name", contact.first_name.clone())
        .optional("last_name", contact.last_name.clone())
        .optional("email", contact.email.clone())
        .optional("company_name", contact.company_name.clone())
        .optional("title", contact.title.clone())
        .optional("mobile_phone", contact.mobile_phone.clone())
        .optional("work_phone", contact.work_phone.clone())
        .optional("contact_type", contact.contact_type.clone())
        .build()
}

pub fn decode_account_response(json: &str) -> Result<Account, TransportError> {
    decode_root::<AccountJson>(json, ACCOUNT_ROOT).map(Account::from)
}

pub fn decode_contact_response(json: &str) -> Result<Contact, TransportError> {
    decode_root::<ContactJson>(json, CONTACT_ROOT).map(Contact::from)
}

pub fn decode_contacts_response(json: &str) -> Result<Vec<Contact>, TransportError> {
    let items = decode_collection::<ContactJson>(json, CONTACT_COLLECTION)?;
    Ok(items.into_iter().map(Contact::from).collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn encode_update_account_body_sends_id_and_company() {
        let account = Account {
            company_name: Some("Acme".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            encode_update_account_body(AccountId::new(10096).unwrap(), &account),
            json!({"account": {"id": 10096, "company_name": "Acme"}})
        );
    }

    #[test]
    fn encode_contact_body_skips_unset_fields() {
        let mut contact = Contact::new("Ada", "Lovelace");
        contact.mobile_phone = Some("+12025550123".to_owned());

        assert_eq!(
            encode_contact_body(&contact),
            json!({
                "contact": {
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                    "mobile_phone": "+12025550123"
                }
            })
        );
    }

    #[test]
    fn decode_account_response_maps_fields() {
        let json = r#"
        {
          "account": {
            "id": 10096,
            "account_id": 0,
            "company_name": "Acme",
            "date_created": "2016-09-01T00:00:00+00:00",
            "date_modified": "2017-01-01T00:00:00+00:00"
          }
        }
        "#;
        let account = decode_account_response(json).unwrap();
        assert_eq!(account.id.map(AccountId::get), Some(10096));
        assert!(account.account_id.is_none());
        assert_eq!(account.company_name.as_deref(), Some("Acme"));
        assert!(account.date_modified.is_some());
    }

    #[test]
    fn decode_contacts_response_maps_list() {
        let json = r#"
        {
          "contacts": [
            {"id": 4, "account_id": 10096, "first_name": "Ada", "last_name": "Lovelace", "contact_type": "technical"},
            {"id": 5, "email": "grace@example.com"}
          ]
        }
        "#;
        let contacts = decode_contacts_response(json).unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].id.map(ContactId::get), Some(4));
        assert_eq!(contacts[0].contact_type.as_deref(), Some("technical"));
        assert_eq!(contacts[1].email.as_deref(), Some("grace@example.com"));
    }
}
