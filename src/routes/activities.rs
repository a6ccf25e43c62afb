use axum::extract::{Multipart, Path};
use axum::http::StatusCode;
use axum::{extract::State, routing::get, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline;
use crate::state::AppState;
use crate::types::activity::{ActivityMetrics, ActivityRecord, TrackCoordinates};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/activities", get(list_activities))
        .route("/api/activities/import", post(import))
        .route("/api/activities/import/batch", post(import_batch))
        .route(
            "/api/activities/:id",
            get(get_activity).delete(delete_activity),
        )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityResponse {
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
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_coordinates: Option<TrackCoordinates>,
}

impl ActivityResponse {
    fn new(record: ActivityRecord, track_coordinates: Option<TrackCoordinates>) -> Self {
        Self {
            id: record.id,
            title: record.title,
            start_time: record.start_time,
            end_time: record.end_time,
            activity_type: record.activity_type,
            distance_m: record.distance_m,
            elevation_gain_m: record.elevation_gain_m,
            elevation_loss_m: record.elevation_loss_m,
            avg_speed_ms: record.avg_speed_ms,
            max_speed_ms: record.max_speed_ms,
            track_points: record.track_points,
            created_at: record.created_at,
            track_coordinates,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchImportEntry {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivityResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

struct GpxUpload {
    file_name: String,
    bytes: Vec<u8>,
}

async fn import(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ActivityResponse>), AppError> {
    let upload = read_uploads(multipart)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BadRequest("No GPX file provided".to_string()))?;

    tracing::info!("Importing GPX file: {}", upload.file_name);

    let bytes = upload.bytes;
    let metrics = run_blocking(move || pipeline::import(&bytes)).await??;
    let response = store(&state, &metrics)?;

    tracing::info!(
        "Imported {} as {} ({} points, {:.2} km)",
        upload.file_name,
        response.id,
        response.track_points,
        response.distance_m / 1000.0
    );

    Ok((StatusCode::CREATED, Json(response)))
}

async fn import_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<BatchImportEntry>>), AppError> {
    let uploads = read_uploads(multipart).await?;
    if uploads.is_empty() {
        return Err(AppError::BadRequest("No GPX file provided".to_string()));
    }

    tracing::info!("Importing batch of {} GPX files", uploads.len());

    let (names, payloads): (Vec<String>, Vec<Vec<u8>>) = uploads
        .into_iter()
        .map(|upload| (upload.file_name, upload.bytes))
        .unzip();

    let results = run_blocking(move || pipeline::import_many(&payloads)).await?;

    let mut entries = Vec::with_capacity(names.len());
    for (file_name, result) in names.into_iter().zip(results) {
        let stored = result
            .map_err(AppError::from)
            .and_then(|metrics| store(&state, &metrics));

        let entry = match stored {
            Ok(activity) => BatchImportEntry {
                file_name,
                activity: Some(activity),
                error: None,
            },
            Err(err) => {
                tracing::warn!("Skipping {} in batch import: {}", file_name, err);
                BatchImportEntry {
                    file_name,
                    activity: None,
                    error: Some(err.to_string()),
                }
            }
        };
        entries.push(entry);
    }

    Ok((StatusCode::CREATED, Json(entries)))
}

async fn list_activities(State(state): State<AppState>) -> Json<Vec<ActivityResponse>> {
    let activities = state
        .all()
        .into_iter()
        .map(|record| ActivityResponse::new(record, None))
        .collect();
    Json(activities)
}

async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActivityResponse>, AppError> {
    let record = state
        .get(&id)
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    let coordinates = record.coordinates()?;
    Ok(Json(ActivityResponse::new(record, coordinates)))
}

async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(id.to_string()))
    }
}

/// GPX parsing is CPU-bound, so it runs on the blocking pool.
async fn run_blocking<T, F>(job: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::Internal(format!("Import task failed: {}", e)))
}

fn store(state: &AppState, metrics: &ActivityMetrics) -> Result<ActivityResponse, AppError> {
    let record = ActivityRecord::from_metrics(metrics)?;
    state.insert(record.clone());
    Ok(ActivityResponse::new(record, Some(metrics.coordinates())))
}

async fn read_uploads(mut multipart: Multipart) -> Result<Vec<GpxUpload>, AppError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("gpx") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file bytes: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("No GPX file provided".to_string()));
        }
        if !file_name.to_lowercase().ends_with(".gpx") {
            return Err(AppError::BadRequest("File must be a GPX file".to_string()));
        }

        uploads.push(GpxUpload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Ok(uploads)
}
