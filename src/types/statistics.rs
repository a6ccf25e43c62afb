use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportStatistics {
    pub sport_name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub total_activities: usize,
    pub total_distance_m: f64,
    pub total_distance_km: f64,
    pub total_duration_seconds: f64,
    pub avg_speed_ms: f64,
    pub avg_speed_kmh: f64,
    pub max_speed_ms: f64,
    pub max_speed_kmh: f64,
    pub max_duration_seconds: f64,
    pub total_elevation_gain_m: f64,
}
