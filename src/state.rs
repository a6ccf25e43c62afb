use crate::types::activity::ActivityRecord;
use crate::types::activity_type::ActivityTypeCatalog;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    activities: Arc<DashMap<Uuid, ActivityRecord>>,
    activity_types: Arc<ActivityTypeCatalog>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            activities: Arc::new(DashMap::new()),
            activity_types: Arc::new(ActivityTypeCatalog::default()),
        }
    }

    pub fn activity_types(&self) -> &ActivityTypeCatalog {
        &self.activity_types
    }

    pub fn insert(&self, record: ActivityRecord) {
        self.activities.insert(record.id, record);
    }

    pub fn get(&self, id: &Uuid) -> Option<ActivityRecord> {
        self.activities.get(id).map(|entry| entry.value().clone())
    }

    /// All activities, most recent start first.
    pub fn all(&self) -> Vec<ActivityRecord> {
        let mut records: Vec<ActivityRecord> = self
            .activities
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        records
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self.activities.remove(id).is_some();
        if removed {
            tracing::info!("Deleted activity {}. Current size: {}", id, self.activities.len());
        }
        removed
    }
}
