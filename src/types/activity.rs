use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Untitled Activity";
pub const DEFAULT_ACTIVITY_TYPE: &str = "Unknown";

/// A track point exactly as the markup carried it, before any numeric parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTrackPoint {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub elevation: Option<String>,
    pub time: Option<String>,
    pub heart_rate: Option<String>,
    pub cadence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
    pub time: Option<DateTime<Utc>>,
    pub heart_rate: Option<u16>,
    pub cadence: Option<u16>,
}

impl TrackPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            elevation: None,
            time: None,
            heart_rate: None,
            cadence: None,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }
}

/// Everything the markup layer hands to the metrics extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpxDocument {
    pub title: String,
    pub activity_type: String,
    pub points: Vec<RawTrackPoint>,
}

impl Default for GpxDocument {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            activity_type: DEFAULT_ACTIVITY_TYPE.to_string(),
            points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityMetrics {
    pub title: String,
    pub activity_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub distance_m: f64,
    pub elevation_gain_m: f64,
    pub elevation_loss_m: f64,
    pub avg_speed_ms: f64,
    pub max_speed_ms: f64,
    /// Every extracted point in document order, timestamped or not.
    pub points: Vec<TrackPoint>,
    pub track_point_count: usize,
}

impl ActivityMetrics {
    pub fn duration_seconds(&self) -> f64 {
        seconds_between(self.start_time, self.end_time)
    }

    pub fn coordinates(&self) -> TrackCoordinates {
        TrackCoordinates(self.points.iter().map(|p| [p.lat, p.lon]).collect())
    }
}

/// `[lat, lon]` pairs, one per original track point, for map rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackCoordinates(pub Vec<[f64; 2]>);

impl TrackCoordinates {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json).map(TrackCoordinates)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub activity_type: String,
    pub distance_m: f64,
    pub elevation_gain_m: f64,
    pub elevation_loss_m: f64,
    pub avg_speed_ms: f64,
    pub max_speed_ms: f64,
    pub track_points: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_coordinates_json: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    pub fn from_metrics(metrics: &ActivityMetrics) -> serde_json::Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: metrics.title.clone(),
            start_time: metrics.start_time,
            end_time: metrics.end_time,
            activity_type: metrics.activity_type.clone(),
            distance_m: metrics.distance_m,
            elevation_gain_m: metrics.elevation_gain_m,
            elevation_loss_m: metrics.elevation_loss_m,
            avg_speed_ms: metrics.avg_speed_ms,
            max_speed_ms: metrics.max_speed_ms,
            track_points: metrics.track_point_count,
            track_coordinates_json: Some(metrics.coordinates().to_json()?),
            created_at: Utc::now(),
        })
    }

    pub fn duration_seconds(&self) -> f64 {
        seconds_between(self.start_time, self.end_time)
    }

    pub fn coordinates(&self) -> serde_json::Result<Option<TrackCoordinates>> {
        match self.track_coordinates_json.as_deref() {
            Some(json) if !json.is_empty() => TrackCoordinates::from_json(json).map(Some),
            _ => Ok(None),
        }
    }
}

pub(crate) fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
