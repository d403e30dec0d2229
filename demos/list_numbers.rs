use tracing_subscriber::EnvFilter;
use vivialconnect::{AreaCode, QueryParams, VivialClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = VivialClient::from_env()?;

    let total = client.number_count().await?;
    let numbers = client
        .get_associated_numbers(&QueryParams::new().limit(20))
        .await?;
    println!("{total} associated numbers");
    for number in &numbers {
        println!(
            "  {:?} {:?} type: {:?}, connector: {:?}",
            number.id, number.phone_number, number.phone_number_type, number.connector_id
        );
    }

    if let Ok(area_code) = std::env::var("VIVIALCONNECT_AREA_CODE") {
        let area_code = AreaCode::new(area_code)?;
        let available = client
            .find_available_numbers_by_area_code(&area_code, &QueryParams::new().limit(5))
            .await?;
        println!("available in {}:", area_code.as_str());
        for number in &available {
            println!(
                "  {:?} {:?}, {:?}",
                number.phone_number, number.city, number.region
            );
        }
    }

    Ok(())
}
