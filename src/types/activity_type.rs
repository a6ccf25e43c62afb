use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityType {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_default: bool,
}

impl ActivityType {
    fn builtin(name: &str, icon: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: Some(icon.to_string()),
            color: Some(color.to_string()),
            is_default: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityTypeCatalog(Vec<ActivityType>);

impl ActivityTypeCatalog {
    /// Case-insensitive lookup by name.
    pub fn find(&self, name: &str) -> Option<&ActivityType> {
        self.0.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

impl Default for ActivityTypeCatalog {
    fn default() -> Self {
        Self(vec![
            ActivityType::builtin("Run", "directions_run", "#FF5722"),
            ActivityType::builtin("Nordic Ski", "downhill_skiing", "#2196F3"),
            ActivityType::builtin("Kayak", "kayaking", "#4CAF50"),
            ActivityType::builtin("Walk", "directions_walk", "#FF9800"),
            ActivityType::builtin("Cycle", "directions_bike", "#9C27B0"),
            ActivityType::builtin("Hike", "hiking", "#795548"),
            ActivityType::builtin("Swim", "pool", "#00BCD4"),
        ])
    }
}
