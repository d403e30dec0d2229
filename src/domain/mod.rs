//! Domain layer: resource models and strong types with validation (no I/O).

mod account;
mod connector;
mod message;
mod number;
mod request;
mod validation;
mod value;

pub use account::{Account, Contact};
pub use connector::{CONNECTOR_MAX_LISTED_NUMBERS, Callback, Connector, ConnectorPhoneNumber};
pub use message::{Attachment, MESSAGE_BODY_MAX_CHARS, Message};
pub use number::{Capabilities, Carrier, Device, Number, NumberInfo};
pub use request::{BuyLocalNumber, BuyNumber, NumberOptions, NumberSelector, QueryParams};
pub use validation::ValidationError;
pub use value::{
    AccountId, ApiKey, ApiSecret, AreaCode, BearerToken, CallbackMethod, ConnectorId, ContactId,
    MessageId, MessageType, NumberId, PhoneNumber, PhoneNumberType,
};
