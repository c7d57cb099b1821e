//! BBC radio schedule client
//!
//! This crate fetches a radio station's daily broadcast schedules
//! (yesterday, today and tomorrow) from the BBC `/programmes` JSON API,
//! parses them into a small domain model, and serves programme thumbnails
//! through an in-memory read-through cache.
//!
//! # Features
//!
//! - **Schedule Fetching**: the three daily listings are fetched
//!   concurrently and joined into a fixed-order result; a failed day never
//!   aborts the in-flight requests for the others
//! - **Strict Parsing**: a schedule fragment either parses into a complete
//!   entity or fails; missing fields and type mismatches are errors, not
//!   defaults
//! - **Thumbnails**: image bytes by programme pid, cached in memory after
//!   the first download
//! - **Injected Transport**: services talk to the gateways through the
//!   [`Transport`] trait, so tests run against deterministic stubs
//!
//! # Example
//!
//! ```no_run
//! use bbcschedule::{ImageService, Model, ProgrammeService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ProgrammeService::new()?;
//!
//!     // [yesterday, today, tomorrow]
//!     let days = service.fetch_programme().await?;
//!
//!     let images = ImageService::new()?;
//!     for model in &days {
//!         if let Model::Schedule(schedule) = model {
//!             println!("{}", schedule.day.display_date());
//!             for broadcast in &schedule.day.broadcasts {
//!                 println!("  {}", broadcast.title());
//!                 let thumb = images.fetch_image(broadcast.image_pid()).await?;
//!                 println!("  thumbnail: {} bytes", thumb.len());
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result`]. The aggregate
//! [`ProgrammeService::fetch_programme`] call is all-or-nothing: if any of
//! the three days fails to fetch or parse, the call fails as a whole with
//! a single [`Error::Parsing`] naming the day(s) that failed.

pub mod error;
pub mod images;
pub mod models;
pub mod schedule;
pub mod transport;

// Re-exports
pub use error::{Error, Result};
pub use images::{ImageCache, ImageService, IMAGE_SERVICE_PATH, IMAGE_SIZE};
pub use models::{
    Broadcast, Day, DisplayTitles, ErrorModel, Image, Model, Programme, Schedule,
};
pub use schedule::{ProgrammeService, ScheduleDay, SCHEDULE_SERVICE_PATH};
pub use transport::{
    HttpTransport, Transport, TransportBuilder, DEFAULT_CALL_GATEWAY, DEFAULT_DOWNLOAD_GATEWAY,
};
