use std::io;

use tracing_subscriber::EnvFilter;
use vivialconnect::{Message, PhoneNumber, VivialClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let to_raw = std::env::var("VIVIALCONNECT_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "VIVIALCONNECT_TO environment variable is required",
        )
    })?;
    let from_raw = std::env::var("VIVIALCONNECT_FROM").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "VIVIALCONNECT_FROM environment variable is required",
        )
    })?;
    let body = std::env::var("VIVIALCONNECT_BODY")
        .unwrap_or_else(|_| "Hello from the vivialconnect demo.".to_owned());

    let client = VivialClient::from_env()?;
    let to = PhoneNumber::parse(None, to_raw)?;
    let from = PhoneNumber::parse(None, from_raw)?;

    let mut message = Message::outbound(&to, body).from_number(&from);
    if let Ok(media_url) = std::env::var("VIVIALCONNECT_MEDIA_URL") {
        message.add_media_url(&media_url)?;
    }
    client.send_message(&mut message).await?;

    println!(
        "id: {:?}, status: {:?}, segments: {}, price: {:?} {:?}",
        message.id, message.status, message.num_segments, message.price, message.price_currency
    );

    Ok(())
}
