use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::types::activity::{seconds_between, ActivityMetrics, GpxDocument, TrackPoint};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub fn extract(document: GpxDocument) -> ActivityMetrics {
    extract_at(document, Utc::now())
}

/// Derives activity metrics, using `now` as start and end time when fewer
/// than two points carry a timestamp.
pub fn extract_at(document: GpxDocument, now: DateTime<Utc>) -> ActivityMetrics {
    let GpxDocument {
        title,
        activity_type,
        points: raw_points,
    } = document;

    let points: Vec<TrackPoint> = raw_points
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let point = TrackPoint::from_raw(raw);
            if point.is_none() {
                tracing::debug!("Skipping malformed track point #{}: {:?}", idx, raw);
            }
            point
        })
        .collect();

    let valid = valid_sequence(&points);

    let mut metrics = ActivityMetrics {
        title,
        activity_type,
        start_time: now,
        end_time: now,
        distance_m: 0.0,
        elevation_gain_m: 0.0,
        elevation_loss_m: 0.0,
        avg_speed_ms: 0.0,
        max_speed_ms: 0.0,
        track_point_count: points.len(),
        points: Vec::new(),
    };

    if valid.len() >= 2 {
        let start = timestamp(valid[0]);
        let end = timestamp(valid[valid.len() - 1]);
        let distance_m = total_distance(&valid);
        let (elevation_gain_m, elevation_loss_m) = elevation_change(&valid);
        let duration = seconds_between(start, end);

        metrics.start_time = start;
        metrics.end_time = end;
        metrics.distance_m = distance_m;
        metrics.elevation_gain_m = elevation_gain_m;
        metrics.elevation_loss_m = elevation_loss_m;
        metrics.avg_speed_ms = if duration > 0.0 { distance_m / duration } else { 0.0 };
        metrics.max_speed_ms = max_speed(&valid);
    }

    tracing::debug!(
        "Extracted {} of {} track points ({} timestamped), {:.1} m",
        points.len(),
        raw_points.len(),
        valid.len(),
        metrics.distance_m
    );

    metrics.points = points;
    metrics
}

/// Independent activities are extracted in parallel; output order follows input order.
pub fn extract_many(documents: Vec<GpxDocument>) -> Vec<ActivityMetrics> {
    let now = Utc::now();
    documents
        .into_par_iter()
        .map(|document| extract_at(document, now))
        .collect()
}

/// Timestamped points in ascending time order. The sort is stable, so points
/// sharing a timestamp keep their document order.
pub fn valid_sequence(points: &[TrackPoint]) -> Vec<&TrackPoint> {
    let mut valid: Vec<&TrackPoint> = points.iter().filter(|p| p.time.is_some()).collect();
    valid.sort_by_key(|p| p.time);
    valid
}

pub fn total_distance(valid: &[&TrackPoint]) -> f64 {
    valid
        .windows(2)
        .map(|pair| segment_distance(pair[0], pair[1]))
        .sum()
}

/// `(gain, loss)` over consecutive pairs where both sides carry an elevation.
pub fn elevation_change(valid: &[&TrackPoint]) -> (f64, f64) {
    valid
        .windows(2)
        .fold((0.0, 0.0), |(gain, loss), pair| {
            match (pair[0].elevation, pair[1].elevation) {
                (Some(prev), Some(curr)) => {
                    let diff = curr - prev;
                    if diff > 0.0 {
                        (gain + diff, loss)
                    } else {
                        (gain, loss + diff.abs())
                    }
                }
                _ => (gain, loss),
            }
        })
}

/// Fastest consecutive pair. Pairs without a positive time step count as 0.
pub fn max_speed(valid: &[&TrackPoint]) -> f64 {
    valid
        .windows(2)
        .map(|pair| segment_speed(pair[0], pair[1]))
        .fold(0.0, f64::max)
}

fn segment_speed(prev: &TrackPoint, curr: &TrackPoint) -> f64 {
    let dt = seconds_between(timestamp(prev), timestamp(curr));
    if dt > 0.0 {
        segment_distance(prev, curr) / dt
    } else {
        0.0
    }
}

fn segment_distance(prev: &TrackPoint, curr: &TrackPoint) -> f64 {
    haversine_distance(prev.lat, prev.lon, curr.lat, curr.lon)
}

fn timestamp(point: &TrackPoint) -> DateTime<Utc> {
    point.time.unwrap_or_default()
}

/// Great-circle distance in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
