use crate::types::activity::{RawTrackPoint, TrackPoint};
use chrono::{DateTime, NaiveDateTime, Utc};

impl TrackPoint {
    /// Best-effort conversion of a raw markup point.
    ///
    /// Missing coordinates default to `0.0`. A coordinate, elevation or
    /// timestamp that is present but unreadable drops the whole point.
    /// Heart rate and cadence never drop a point; unreadable values are
    /// simply absent.
    pub fn from_raw(raw: &RawTrackPoint) -> Option<TrackPoint> {
        Some(TrackPoint {
            lat: parse_coordinate(raw.lat.as_deref())?,
            lon: parse_coordinate(raw.lon.as_deref())?,
            elevation: parse_optional(raw.elevation.as_deref(), parse_number)?,
            time: parse_optional(raw.time.as_deref(), parse_timestamp)?,
            heart_rate: raw.heart_rate.as_deref().and_then(parse_rate),
            cadence: raw.cadence.as_deref().and_then(parse_rate),
        })
    }
}

fn parse_coordinate(value: Option<&str>) -> Option<f64> {
    match value {
        None => Some(0.0),
        Some(text) => parse_number(text),
    }
}

/// `Some(None)` when the field is absent, `None` when it is present but bad.
fn parse_optional<T>(value: Option<&str>, parse: fn(&str) -> Option<T>) -> Option<Option<T>> {
    match value {
        None => Some(None),
        Some(text) => parse(text).map(Some),
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(time) = text.parse::<DateTime<Utc>>() {
        return Some(time);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn parse_rate(text: &str) -> Option<u16> {
    text.trim().parse::<u16>().ok().filter(|v| *v > 0)
}
