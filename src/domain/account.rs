use chrono::{DateTime, Utc};

use crate::domain::value::{AccountId, ContactId};

#[derive(Debug, Clone, Default, PartialEq)]
/// Account resource (`account`).
pub struct Account {
    pub id: Option<AccountId>,
    /// Parent account, set for subaccounts.
    pub account_id: Option<AccountId>,
    pub date_created: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
    pub company_name: Option<String>,
}

impl Account {
    pub(crate) fn update_from(&mut self, returned: Account) {
        *self = returned;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Contact resource (`contact`) stored on an account.
pub struct Contact {
    pub id: Option<ContactId>,
    pub account_id: Option<AccountId>,
    pub date_created: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub title: Option<String>,
    pub mobile_phone: Option<String>,
    pub work_phone: Option<String>,
    pub contact_type: Option<String>,
}

impl Contact {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            ..Default::default()
        }
    }

    pub(crate) fn update_from(&mut self, returned: Contact) {
        *self = returned;
    }
}
