//! Example: Fetch a programme thumbnail through the image cache
//!
//! Run with: cargo run --example fetch_image -- p01lcbf6

use bbcschedule::ImageService;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Get pid from command line or use a known Radio 4 image
    let pid = env::args().nth(1).unwrap_or_else(|| "p01lcbf6".to_string());

    println!("Fetching thumbnail for {}...", pid);

    let service = ImageService::new()?;
    let bytes = service.fetch_image(&pid).await?;
    println!("Downloaded {} bytes", bytes.len());

    // Second fetch hits the in-memory cache
    let cached = service.fetch_image(&pid).await?;
    println!("Cached copy: {} bytes ({} entries)", cached.len(), service.cache().len());

    Ok(())
}
