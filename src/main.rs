use chrono::Local;
use zoomscrape::{info_time, process::run, ClientConfig, Credentials, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Local::now();
    let credentials = Credentials::from_env()?;
    let config = ClientConfig::from_env();

    run(config, &credentials).await?;
    info_time!(start_time, "Full program time:");

    Ok(())
}
