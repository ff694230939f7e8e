use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{require, require_id};
use crate::AppState;
use crate::db;
use crate::error::AppError;
use crate::types::{LostBirdId, UserId};

const DEFAULT_CONFIDENCE: i64 = 5;

pub fn routes() -> Router<AppState> {
    Router::new().route("/sightings", post(create_sighting))
}

#[derive(Deserialize)]
struct CreateSightingBody {
    lost_bird_id: Option<i64>,
    user_id: Option<i64>,
    location: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    sighting_date: Option<String>,
    description: Option<String>,
    photos: Option<serde_json::Value>,
    confidence_level: Option<i64>,
}

async fn create_sighting(
    State(state): State<AppState>,
    Json(body): Json<CreateSightingBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let lost_bird_id = LostBirdId(require_id(body.lost_bird_id, "lost_bird_id")?);
    let reporter = UserId(require_id(body.user_id, "user_id")?);
    let location = require(&body.location, "location")?;
    let sighting_date_raw = require(&body.sighting_date, "sighting_date")?;
    let sighting_date = db::parse_client_date(sighting_date_raw).map_err(AppError::BadRequest)?;

    let confidence_level = body.confidence_level.unwrap_or(DEFAULT_CONFIDENCE);
    if !(1..=10).contains(&confidence_level) {
        return Err(AppError::BadRequest(
            "confidence_level must be between 1 and 10".into(),
        ));
    }

    let id = db::sightings::create_sighting(
        &state.pool,
        db::sightings::NewSighting {
            lost_bird_id,
            reporter,
            location: location.to_string(),
            lat: body.lat,
            lng: body.lng,
            sighting_date,
            description: body.description.unwrap_or_default(),
            photos: body.photos.unwrap_or_else(|| json!([])),
            confidence_level,
        },
    )
    .await?
    .ok_or_else(|| AppError::NotFound("lost bird not found".into()))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "sighting report created successfully",
            "id": id,
        })),
    ))
}
