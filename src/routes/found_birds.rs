use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{Pagination, require, require_id};
use crate::AppState;
use crate::db;
use crate::db::models::{json_array, json_object};
use crate::error::AppError;
use crate::types::{SpeciesId, UserId};

pub fn routes() -> Router<AppState> {
    Router::new().route("/found-birds", post(create_found_bird).get(list_found_birds))
}

#[derive(Deserialize)]
struct CreateFoundBirdBody {
    user_id: Option<i64>,
    species_id: Option<i64>,
    description: Option<String>,
    characteristics: Option<serde_json::Value>,
    photos: Option<serde_json::Value>,
    found_location: Option<String>,
    found_lat: Option<f64>,
    found_lng: Option<f64>,
    found_date: Option<String>,
    contact_info: Option<serde_json::Value>,
}

async fn create_found_bird(
    State(state): State<AppState>,
    Json(body): Json<CreateFoundBirdBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let finder = UserId(require_id(body.user_id, "user_id")?);
    let description = require(&body.description, "description")?;
    let found_location = require(&body.found_location, "found_location")?;
    let found_date_raw = require(&body.found_date, "found_date")?;
    let found_date = db::parse_client_date(found_date_raw).map_err(AppError::BadRequest)?;

    let id = db::found_birds::create_found_bird(
        &state.pool,
        db::found_birds::NewFoundBird {
            finder,
            species_id: body.species_id.map(SpeciesId),
            description: description.to_string(),
            characteristics: body.characteristics.unwrap_or_else(|| json!({})),
            photos: body.photos.unwrap_or_else(|| json!([])),
            found_location: found_location.to_string(),
            found_lat: body.found_lat,
            found_lng: body.found_lng,
            found_date,
            contact_info: body.contact_info.unwrap_or_else(|| json!({})),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "found bird report created successfully",
            "id": id,
        })),
    ))
}

fn default_page() -> i64 {
    1
}
fn default_per_page() -> i64 {
    20
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_per_page")]
    per_page: i64,
}

async fn list_found_birds(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = query.page.max(1);
    let per_page = query.per_page.max(1);

    let (rows, total) = db::found_birds::list_found_birds(&state.pool, page, per_page).await?;

    let mut birds = Vec::with_capacity(rows.len());
    for row in &rows {
        let finder = db::users::get_user(&state.pool, UserId(row.user_id))
            .await?
            .ok_or_else(|| AppError::Internal(format!("finder {} missing", row.user_id)))?;
        birds.push(json!({
            "id": row.id,
            "description": row.description,
            "characteristics": json_object(&row.characteristics),
            "photos": json_array(&row.photos),
            "found_location": row.found_location,
            "found_lat": row.found_lat,
            "found_lng": row.found_lng,
            "found_date": row.found_date,
            "status": row.status,
            "created_at": row.created_at,
            "finder": {
                "name": finder.name,
                "phone": finder.phone,
            },
        }));
    }

    Ok(Json(json!({
        "birds": birds,
        "pagination": Pagination::new(page, per_page, total),
    })))
}
