//! Domain model and parser for BBC schedule documents
//!
//! A schedule document nests `schedule → day → broadcasts[] → programme`,
//! each broadcast carrying an image identifier and display titles. The
//! parser dispatches on the top-level key of a decoded JSON fragment and
//! constructs exactly one entity from it, or fails; a missing required
//! field or a type mismatch at any nesting level is a parse failure, never
//! a partially-populated entity.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Format of calendar dates in schedule documents (`2016-09-25`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of broadcast timestamps (`2016-09-25T06:00:00+01:00`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Short date rendering used when a day is not adjacent to the reference
/// date (`25/09/2016`)
pub const SHORT_DATE_FORMAT: &str = "%d/%m/%Y";

fn deserialize_calendar_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
}

fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
}

// ============================================================================
// Entities
// ============================================================================

/// Root of a single day's API response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Schedule {
    /// The day this schedule covers
    pub day: Day,
}

/// One broadcast day
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Day {
    /// Calendar date of the day
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    /// Broadcasts in API order
    pub broadcasts: Vec<Broadcast>,
}

impl Day {
    /// Render the date relative to `today`
    ///
    /// Adjacent days render as "Yesterday" / "Today" / "Tomorrow"; any
    /// other day renders as a short calendar date.
    pub fn relative_date(&self, today: NaiveDate) -> String {
        match self.date.signed_duration_since(today).num_days() {
            -1 => "Yesterday".to_string(),
            0 => "Today".to_string(),
            1 => "Tomorrow".to_string(),
            _ => self.date.format(SHORT_DATE_FORMAT).to_string(),
        }
    }

    /// Render the date relative to the current local date
    pub fn display_date(&self) -> String {
        self.relative_date(Local::now().date_naive())
    }
}

/// A single broadcast slot within a day
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Broadcast {
    /// When the broadcast starts
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start: DateTime<FixedOffset>,
    /// When the broadcast ends (never before `start`)
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub end: DateTime<FixedOffset>,
    /// Duration in seconds
    pub duration: u32,
    /// The programme aired in this slot
    pub programme: Programme,
}

impl Broadcast {
    /// Identifier of the programme's thumbnail image
    pub fn image_pid(&self) -> &str {
        &self.programme.image.pid
    }

    /// Main programme title
    pub fn title(&self) -> &str {
        &self.programme.display_titles.title
    }

    /// Programme subtitle
    pub fn subtitle(&self) -> &str {
        &self.programme.display_titles.subtitle
    }

    /// Human-readable start/end/duration summary
    pub fn meta(&self) -> String {
        format!(
            "Start: {}\nEnd: {}\nDuration: {}s",
            self.start.format(TIMESTAMP_FORMAT),
            self.end.format(TIMESTAMP_FORMAT),
            self.duration
        )
    }

    fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(Error::parsing(format!(
                "broadcast ends before it starts: {} < {}",
                self.end, self.start
            )));
        }
        Ok(())
    }
}

/// A programme aired in a broadcast slot
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Programme {
    /// Thumbnail image reference
    pub image: Image,
    /// Display titles for list rendering
    pub display_titles: DisplayTitles,
}

/// Reference to a programme image
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Image {
    /// Opaque identifier used to build thumbnail URLs
    pub pid: String,
}

/// Title pair shown for a programme
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplayTitles {
    /// Main title
    pub title: String,
    /// Subtitle
    pub subtitle: String,
}

/// Sentinel entity carrying a captured failure
///
/// Substitutable anywhere a [`Model`] is expected; used to hold a
/// per-request failure without aborting a concurrent aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorModel {
    message: String,
}

impl ErrorModel {
    /// Capture an error
    pub fn new(error: &Error) -> Self {
        Self {
            message: error.to_string(),
        }
    }

    /// The captured failure description
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// Model union
// ============================================================================

/// Any entity a schedule fragment can parse into
///
/// The error variant carries a captured per-request failure so a list of
/// models can hold failed slots alongside parsed ones.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    /// A full day schedule
    Schedule(Schedule),
    /// A bare day fragment
    Day(Day),
    /// A single broadcast fragment
    Broadcast(Broadcast),
    /// A bare programme fragment
    Programme(Programme),
    /// A bare image fragment
    Image(Image),
    /// A bare display-titles fragment
    DisplayTitles(DisplayTitles),
    /// A captured failure standing in for an entity
    Error(ErrorModel),
}

impl Model {
    /// Whether this slot holds a captured failure
    pub fn is_error(&self) -> bool {
        matches!(self, Model::Error(_))
    }

    /// Display text for list rendering
    pub fn text(&self) -> String {
        match self {
            Model::Schedule(schedule) => schedule.day.display_date(),
            Model::Day(day) => day.display_date(),
            Model::Broadcast(broadcast) => broadcast.meta(),
            Model::Programme(programme) => programme.display_titles.title.clone(),
            Model::Image(image) => image.pid.clone(),
            Model::DisplayTitles(titles) => titles.title.clone(),
            Model::Error(error) => error.message().to_string(),
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Parse a decoded JSON fragment into a [`Model`]
///
/// The fragment must be an object whose top-level key is one of the
/// recognized entity types; the matching entity is constructed from the
/// nested fragment. An unknown key is [`Error::UnrecognizedType`]; a
/// malformed or incomplete fragment is [`Error::Parsing`].
pub fn parse(raw: Value) -> Result<Model> {
    let Value::Object(mut map) = raw else {
        return Err(Error::parsing("expected a JSON object fragment"));
    };

    if let Some(fragment) = map.remove("schedule") {
        let schedule: Schedule = from_fragment(fragment)?;
        validate_broadcasts(&schedule.day.broadcasts)?;
        return Ok(Model::Schedule(schedule));
    }
    if let Some(fragment) = map.remove("day") {
        let day: Day = from_fragment(fragment)?;
        validate_broadcasts(&day.broadcasts)?;
        return Ok(Model::Day(day));
    }
    if let Some(fragment) = map.remove("broadcast") {
        let broadcast: Broadcast = from_fragment(fragment)?;
        broadcast.validate()?;
        return Ok(Model::Broadcast(broadcast));
    }
    if let Some(fragment) = map.remove("programme") {
        return Ok(Model::Programme(from_fragment(fragment)?));
    }
    if let Some(fragment) = map.remove("image") {
        return Ok(Model::Image(from_fragment(fragment)?));
    }
    // The API spells this key both ways
    if let Some(fragment) = map
        .remove("display_titles")
        .or_else(|| map.remove("displayTitle"))
    {
        return Ok(Model::DisplayTitles(from_fragment(fragment)?));
    }

    match map.keys().next() {
        Some(key) => Err(Error::UnrecognizedType(key.clone())),
        None => Err(Error::parsing("empty fragment")),
    }
}

/// Decode raw bytes as JSON and parse the result
pub fn parse_slice(bytes: &[u8]) -> Result<Model> {
    let value: Value = serde_json::from_slice(bytes)?;
    parse(value)
}

fn from_fragment<T: DeserializeOwned>(fragment: Value) -> Result<T> {
    serde_json::from_value(fragment).map_err(|e| Error::parsing(e.to_string()))
}

fn validate_broadcasts(broadcasts: &[Broadcast]) -> Result<()> {
    broadcasts.iter().try_for_each(Broadcast::validate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn broadcast_json(start: &str, end: &str) -> Value {
        json!({
            "start": start,
            "end": end,
            "duration": 3600,
            "programme": {
                "image": { "pid": "p01lcbf6" },
                "display_titles": {
                    "title": "Today",
                    "subtitle": "25/09/2016"
                }
            }
        })
    }

    fn schedule_json() -> Value {
        json!({
            "schedule": {
                "day": {
                    "date": "2016-09-25",
                    "broadcasts": [
                        broadcast_json("2016-09-25T06:00:00+01:00", "2016-09-25T07:00:00+01:00"),
                        broadcast_json("2016-09-25T07:00:00+01:00", "2016-09-25T08:00:00+01:00"),
                        broadcast_json("2016-09-25T08:00:00+01:00", "2016-09-25T09:00:00+01:00"),
                    ]
                }
            }
        })
    }

    #[test]
    fn test_parse_schedule() {
        let model = parse(schedule_json()).unwrap();

        let Model::Schedule(schedule) = model else {
            panic!("expected a schedule, got {:?}", model);
        };
        assert_eq!(
            schedule.day.date,
            NaiveDate::from_ymd_opt(2016, 9, 25).unwrap()
        );
        assert_eq!(schedule.day.broadcasts.len(), 3);
    }

    #[test]
    fn test_parse_preserves_broadcast_order() {
        let Model::Schedule(schedule) = parse(schedule_json()).unwrap() else {
            panic!("expected a schedule");
        };

        let hours: Vec<String> = schedule
            .day
            .broadcasts
            .iter()
            .map(|b| b.start.format("%H").to_string())
            .collect();
        assert_eq!(hours, vec!["06", "07", "08"]);
    }

    #[test]
    fn test_parse_day_fragment() {
        let raw = json!({
            "day": {
                "date": "2016-09-25",
                "broadcasts": []
            }
        });
        let model = parse(raw).unwrap();
        assert!(matches!(model, Model::Day(_)));
    }

    #[test]
    fn test_parse_broadcast_fragment() {
        let raw = json!({
            "broadcast": broadcast_json("2016-09-25T06:00:00+01:00", "2016-09-25T07:00:00+01:00")
        });
        let Model::Broadcast(broadcast) = parse(raw).unwrap() else {
            panic!("expected a broadcast");
        };
        assert_eq!(broadcast.image_pid(), "p01lcbf6");
        assert_eq!(broadcast.title(), "Today");
        assert_eq!(broadcast.subtitle(), "25/09/2016");
        assert_eq!(broadcast.duration, 3600);
    }

    #[test]
    fn test_parse_leaf_fragments() {
        let model = parse(json!({ "image": { "pid": "p01lcbf6" } })).unwrap();
        assert!(matches!(model, Model::Image(_)));

        let model = parse(json!({
            "display_titles": { "title": "Today", "subtitle": "News" }
        }))
        .unwrap();
        assert!(matches!(model, Model::DisplayTitles(_)));

        // Alternate spelling of the titles key
        let model = parse(json!({
            "displayTitle": { "title": "Today", "subtitle": "News" }
        }))
        .unwrap();
        assert!(matches!(model, Model::DisplayTitles(_)));
    }

    #[test]
    fn test_parse_unrecognized_key() {
        let result = parse(json!({ "episode": {} }));
        assert!(matches!(result, Err(Error::UnrecognizedType(key)) if key == "episode"));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(parse(json!([1, 2, 3])), Err(Error::Parsing(_))));
        assert!(matches!(parse(json!("schedule")), Err(Error::Parsing(_))));
        assert!(matches!(parse(json!({})), Err(Error::Parsing(_))));
    }

    #[test]
    fn test_parse_missing_field_is_failure() {
        // No pid on the image, three levels deep
        let raw = json!({
            "schedule": {
                "day": {
                    "date": "2016-09-25",
                    "broadcasts": [{
                        "start": "2016-09-25T06:00:00+01:00",
                        "end": "2016-09-25T07:00:00+01:00",
                        "duration": 3600,
                        "programme": {
                            "image": {},
                            "display_titles": { "title": "Today", "subtitle": "" }
                        }
                    }]
                }
            }
        });
        assert!(matches!(parse(raw), Err(Error::Parsing(_))));
    }

    #[test]
    fn test_parse_missing_programme_is_failure() {
        let raw = json!({
            "broadcast": {
                "start": "2016-09-25T06:00:00+01:00",
                "end": "2016-09-25T07:00:00+01:00",
                "duration": 3600
            }
        });
        assert!(matches!(parse(raw), Err(Error::Parsing(_))));
    }

    #[test]
    fn test_parse_type_mismatch_is_failure() {
        let mut raw = broadcast_json("2016-09-25T06:00:00+01:00", "2016-09-25T07:00:00+01:00");
        raw["duration"] = json!("one hour");
        assert!(matches!(
            parse(json!({ "broadcast": raw })),
            Err(Error::Parsing(_))
        ));
    }

    #[test]
    fn test_parse_negative_duration_is_failure() {
        let mut raw = broadcast_json("2016-09-25T06:00:00+01:00", "2016-09-25T07:00:00+01:00");
        raw["duration"] = json!(-60);
        assert!(matches!(
            parse(json!({ "broadcast": raw })),
            Err(Error::Parsing(_))
        ));
    }

    #[test]
    fn test_parse_bad_date_format_is_failure() {
        let raw = json!({
            "day": { "date": "25/09/2016", "broadcasts": [] }
        });
        assert!(matches!(parse(raw), Err(Error::Parsing(_))));
    }

    #[test]
    fn test_parse_bad_timestamp_format_is_failure() {
        let raw = json!({
            "broadcast": broadcast_json("2016-09-25 06:00:00", "2016-09-25T07:00:00+01:00")
        });
        assert!(matches!(parse(raw), Err(Error::Parsing(_))));
    }

    #[test]
    fn test_parse_end_before_start_is_failure() {
        let raw = json!({
            "broadcast": broadcast_json("2016-09-25T07:00:00+01:00", "2016-09-25T06:00:00+01:00")
        });
        assert!(matches!(parse(raw), Err(Error::Parsing(_))));
    }

    #[test]
    fn test_parse_slice_malformed_json() {
        assert!(matches!(parse_slice(b"{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_relative_date() {
        let day = Day {
            date: NaiveDate::from_ymd_opt(2016, 9, 25).unwrap(),
            broadcasts: Vec::new(),
        };

        let reference = NaiveDate::from_ymd_opt(2016, 9, 25).unwrap();
        assert_eq!(day.relative_date(reference), "Today");

        let reference = NaiveDate::from_ymd_opt(2016, 9, 26).unwrap();
        assert_eq!(day.relative_date(reference), "Yesterday");

        let reference = NaiveDate::from_ymd_opt(2016, 9, 24).unwrap();
        assert_eq!(day.relative_date(reference), "Tomorrow");

        let reference = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        assert_eq!(day.relative_date(reference), "25/09/2016");
    }

    #[test]
    fn test_broadcast_meta() {
        let Model::Broadcast(broadcast) = parse(json!({
            "broadcast": broadcast_json("2016-09-25T06:00:00+01:00", "2016-09-25T07:00:00+01:00")
        }))
        .unwrap() else {
            panic!("expected a broadcast");
        };

        let meta = broadcast.meta();
        assert!(meta.contains("Start: 2016-09-25T06:00:00+01:00"));
        assert!(meta.contains("End: 2016-09-25T07:00:00+01:00"));
        assert!(meta.contains("Duration: 3600s"));
    }

    #[test]
    fn test_error_model_text() {
        let error = Error::parsing("bad fragment");
        let model = Model::Error(ErrorModel::new(&error));
        assert!(model.is_error());
        assert_eq!(model.text(), "schedule parsing failed: bad fragment");
    }
}
