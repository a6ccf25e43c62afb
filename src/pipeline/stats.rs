use std::collections::BTreeMap;

use crate::types::activity::ActivityRecord;
use crate::types::activity_type::ActivityTypeCatalog;
use crate::types::statistics::SportStatistics;

/// Per-sport totals, largest total distance first.
pub fn sport_statistics(
    records: &[ActivityRecord],
    catalog: &ActivityTypeCatalog,
) -> Vec<SportStatistics> {
    let mut groups: BTreeMap<&str, Vec<&ActivityRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.activity_type.as_str())
            .or_default()
            .push(record);
    }

    let mut stats: Vec<SportStatistics> = groups
        .into_iter()
        .map(|(sport, group)| summarize(sport, &group, catalog))
        .collect();

    stats.sort_by(|a, b| {
        b.total_distance_m
            .total_cmp(&a.total_distance_m)
            .then_with(|| a.sport_name.cmp(&b.sport_name))
    });
    stats
}

fn summarize(sport: &str, group: &[&ActivityRecord], catalog: &ActivityTypeCatalog) -> SportStatistics {
    let total_distance_m: f64 = group.iter().map(|r| r.distance_m).sum();
    let total_duration_seconds: f64 = group.iter().map(|r| r.duration_seconds()).sum();
    let max_duration_seconds = group
        .iter()
        .map(|r| r.duration_seconds())
        .fold(0.0, f64::max);
    let max_speed_ms = group.iter().map(|r| r.max_speed_ms).fold(0.0, f64::max);
    let total_elevation_gain_m: f64 = group.iter().map(|r| r.elevation_gain_m).sum();

    let avg_speed_ms = if total_duration_seconds > 0.0 {
        total_distance_m / total_duration_seconds
    } else {
        0.0
    };

    let known = catalog.find(sport);

    SportStatistics {
        sport_name: sport.to_string(),
        icon: known.and_then(|t| t.icon.clone()),
        color: known.and_then(|t| t.color.clone()),
        total_activities: group.len(),
        total_distance_m,
        total_distance_km: total_distance_m / 1000.0,
        total_duration_seconds,
        avg_speed_ms,
        avg_speed_kmh: avg_speed_ms * 3.6,
        max_speed_ms,
        max_speed_kmh: max_speed_ms * 3.6,
        max_duration_seconds,
        total_elevation_gain_m,
    }
}
