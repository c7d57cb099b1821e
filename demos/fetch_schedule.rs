//! Example: Fetch the three-day Radio 4 schedule
//!
//! Run with: cargo run --example fetch_schedule

use bbcschedule::{Model, ProgrammeService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("Fetching Radio 4 schedules...\n");

    let service = ProgrammeService::new()?;
    let days = service.fetch_programme().await?;

    for model in &days {
        let Model::Schedule(schedule) = model else {
            continue;
        };

        println!("{} ({} broadcasts)", schedule.day.display_date(), schedule.day.broadcasts.len());
        println!("---");

        for broadcast in schedule.day.broadcasts.iter().take(10) {
            println!(
                "  {} - {}  {}",
                broadcast.start.format("%H:%M"),
                broadcast.end.format("%H:%M"),
                broadcast.title()
            );
        }
        if schedule.day.broadcasts.len() > 10 {
            println!("  ... and {} more", schedule.day.broadcasts.len() - 10);
        }
        println!();
    }

    Ok(())
}
