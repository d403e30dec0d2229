//! Typed Rust client for the Vivial Connect messaging and telephony REST API.
//!
//! The crate has three layers: a domain layer of resource models and strong
//! types, a transport layer for the JSON envelopes and request signing, and a
//! small client layer orchestrating requests. Every operation is scoped to one
//! account; instance operations take the resource by `&mut` and update it with
//! what the server returned.
//!
//! ```rust,no_run
//! use vivialconnect::{Message, PhoneNumber, VivialClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vivialconnect::VivialError> {
//!     let client = VivialClient::from_env()?;
//!     let to = PhoneNumber::parse(None, "+12025550123")?;
//!     let from = PhoneNumber::parse(None, "+12025550199")?;
//!     let mut message = Message::outbound(&to, "hello").from_number(&from);
//!     client.send_message(&mut message).await?;
//!     println!("sent message {:?}", message.id);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{Auth, VivialClient, VivialClientBuilder, VivialError};
pub use domain::{
    Account, AccountId, ApiKey, ApiSecret, AreaCode, Attachment, BearerToken, BuyLocalNumber,
    BuyNumber, CONNECTOR_MAX_LISTED_NUMBERS, Callback, CallbackMethod, Capabilities, Carrier,
    Connector, ConnectorId, ConnectorPhoneNumber, Contact, ContactId, Device,
    MESSAGE_BODY_MAX_CHARS, Message, MessageId, MessageType, Number, NumberId, NumberInfo,
    NumberOptions, NumberSelector, PhoneNumber, PhoneNumberType, QueryParams, ValidationError,
};
