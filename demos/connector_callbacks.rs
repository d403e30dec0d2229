use std::io;

use tracing_subscriber::EnvFilter;
use vivialconnect::{Callback, CallbackMethod, Connector, VivialClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let callback_url = std::env::var("VIVIALCONNECT_CALLBACK_URL").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "VIVIALCONNECT_CALLBACK_URL environment variable is required",
        )
    })?;

    let client = VivialClient::from_env()?;

    let mut connector = Connector::named("demo connector");
    client.create_connector(&mut connector).await?;
    println!("created connector {:?}", connector.id);

    connector
        .add_callback(Callback::new(
            "text",
            "incoming",
            callback_url.as_str(),
            CallbackMethod::Post,
        ))
        .add_callback(Callback::new(
            "text",
            "status",
            callback_url.as_str(),
            CallbackMethod::Post,
        ));
    client.create_callbacks(&mut connector).await?;
    println!("callbacks: {:?}", connector.callbacks);

    client.delete_all_callbacks(&mut connector).await?;
    let deleted = client.delete_connector(&connector).await?;
    println!("connector deleted: {deleted}");

    Ok(())
}
