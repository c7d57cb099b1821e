//! Programme schedule service
//!
//! Fetches the daily broadcast listings for yesterday, today and tomorrow
//! from the schedule gateway and parses each into a [`Model`].
//!
//! # Example
//!
//! ```no_run
//! use bbcschedule::ProgrammeService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ProgrammeService::new()?;
//!
//!     // [yesterday, today, tomorrow], in that order
//!     let days = service.fetch_programme().await?;
//!     for day in &days {
//!         println!("{}", day.text());
//!     }
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{self, ErrorModel, Model};
use crate::transport::{HttpTransport, Transport};
use std::sync::Arc;

/// Service path of the Radio 4 FM schedule listings
pub const SCHEDULE_SERVICE_PATH: &str = "/radio4/programmes/schedules/fm";

/// The three days a schedule fetch covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDay {
    /// The day before the current one
    Yesterday,
    /// The current day
    Today,
    /// The day after the current one
    Tomorrow,
}

impl ScheduleDay {
    /// All days, in the order `fetch_programme` returns them
    pub const ALL: [ScheduleDay; 3] = [
        ScheduleDay::Yesterday,
        ScheduleDay::Today,
        ScheduleDay::Tomorrow,
    ];

    /// Day slug
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleDay::Yesterday => "yesterday",
            ScheduleDay::Today => "today",
            ScheduleDay::Tomorrow => "tomorrow",
        }
    }

    /// Listing document name on the gateway
    pub fn file_name(&self) -> &'static str {
        match self {
            ScheduleDay::Yesterday => "yesterday.json",
            ScheduleDay::Today => "today.json",
            ScheduleDay::Tomorrow => "tomorrow.json",
        }
    }

    /// Full service path of this day's listing
    pub fn service_path(&self) -> String {
        format!("{}/{}", SCHEDULE_SERVICE_PATH, self.file_name())
    }
}

/// Schedule fetching service
///
/// Holds a [`Transport`] and turns listing documents into [`Model`]s. The
/// service itself is stateless; nothing is cached between calls.
#[derive(Clone)]
pub struct ProgrammeService {
    transport: Arc<dyn Transport>,
}

impl ProgrammeService {
    /// Create a service over the production HTTP transport
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new()?)))
    }

    /// Create a service over a custom transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch and parse the listings for all three days concurrently
    ///
    /// The three requests run concurrently and are all awaited; a
    /// transport or parse failure in one slot does not abort the others.
    /// If every slot parses, the result is `[yesterday, today, tomorrow]`
    /// regardless of completion order. If any slot failed, the whole call
    /// fails with a single [`Error::Parsing`] naming the day(s) that
    /// failed; the per-day results are discarded.
    pub async fn fetch_programme(&self) -> Result<Vec<Model>> {
        let (yesterday, today, tomorrow) = tokio::join!(
            self.fetch_day(ScheduleDay::Yesterday),
            self.fetch_day(ScheduleDay::Today),
            self.fetch_day(ScheduleDay::Tomorrow),
        );

        let slots: Vec<Model> = [yesterday, today, tomorrow]
            .into_iter()
            .zip(ScheduleDay::ALL)
            .map(|(result, day)| {
                result.unwrap_or_else(|error| {
                    tracing::warn!("schedule fetch failed for {}: {}", day.as_str(), error);
                    Model::Error(ErrorModel::new(&error))
                })
            })
            .collect();

        let failed: Vec<&str> = slots
            .iter()
            .zip(ScheduleDay::ALL)
            .filter(|(slot, _)| slot.is_error())
            .map(|(_, day)| day.as_str())
            .collect();

        if !failed.is_empty() {
            return Err(Error::parsing(format!(
                "schedule unavailable for: {}",
                failed.join(", ")
            )));
        }

        Ok(slots)
    }

    /// Fetch and parse today's listing only
    ///
    /// Transport and parse failures both propagate to the caller.
    pub async fn fetch_today(&self) -> Result<Model> {
        self.fetch_day(ScheduleDay::Today).await
    }

    async fn fetch_day(&self, day: ScheduleDay) -> Result<Model> {
        let bytes = self.transport.fetch_bytes(&day.service_path()).await?;
        models::parse_slice(&bytes)
    }
}
