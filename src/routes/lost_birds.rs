use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{Pagination, require, require_id};
use crate::AppState;
use crate::db;
use crate::db::models::{LostBirdRow, json_array, json_object};
use crate::error::AppError;
use crate::types::{LostBirdId, SpeciesId, UserId};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lost-birds", post(create_lost_bird).get(list_lost_birds))
        .route("/lost-birds/{id}", get(get_lost_bird))
}

#[derive(Deserialize)]
struct CreateLostBirdBody {
    user_id: Option<i64>,
    species_id: Option<i64>,
    name: Option<String>,
    description: Option<String>,
    characteristics: Option<serde_json::Value>,
    photos: Option<serde_json::Value>,
    last_seen_location: Option<String>,
    last_seen_lat: Option<f64>,
    last_seen_lng: Option<f64>,
    lost_date: Option<String>,
    contact_info: Option<serde_json::Value>,
    reward_amount: Option<i64>,
}

async fn create_lost_bird(
    State(state): State<AppState>,
    Json(body): Json<CreateLostBirdBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let owner = UserId(require_id(body.user_id, "user_id")?);
    let name = require(&body.name, "name")?;
    let description = require(&body.description, "description")?;
    let last_seen_location = require(&body.last_seen_location, "last_seen_location")?;
    let lost_date_raw = require(&body.lost_date, "lost_date")?;
    let lost_date = db::parse_client_date(lost_date_raw).map_err(AppError::BadRequest)?;

    let id = db::lost_birds::create_lost_bird(
        &state.pool,
        db::lost_birds::NewLostBird {
            owner,
            species_id: body.species_id.map(SpeciesId),
            name: name.to_string(),
            description: description.to_string(),
            characteristics: body.characteristics.unwrap_or_else(|| json!({})),
            photos: body.photos.unwrap_or_else(|| json!([])),
            last_seen_location: last_seen_location.to_string(),
            last_seen_lat: body.last_seen_lat,
            last_seen_lng: body.last_seen_lng,
            lost_date,
            contact_info: body.contact_info.unwrap_or_else(|| json!({})),
            reward_amount: body.reward_amount.unwrap_or(0),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "lost bird report created successfully",
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
fn default_status() -> String {
    "lost".into()
}
fn default_radius() -> f64 {
    50.0
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_per_page")]
    per_page: i64,
    #[serde(default = "default_status")]
    status: String,
    search: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    /// Search radius in km for the bounding-box filter.
    #[serde(default = "default_radius")]
    radius: f64,
}

async fn list_lost_birds(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = query.page.max(1);
    let per_page = query.per_page.max(1);

    let filter = db::lost_birds::LostBirdFilter {
        status: query.status,
        search: query.search,
        lat: query.lat,
        lng: query.lng,
        radius_km: query.radius,
    };
    let (rows, total) = db::lost_birds::list_lost_birds(&state.pool, &filter, page, per_page).await?;

    let mut birds = Vec::with_capacity(rows.len());
    for row in &rows {
        birds.push(list_item(&state, row).await?);
    }

    Ok(Json(json!({
        "birds": birds,
        "pagination": Pagination::new(page, per_page, total),
    })))
}

/// List-view shape: owner reduced to name/phone, species to its names.
async fn list_item(state: &AppState, row: &LostBirdRow) -> Result<serde_json::Value, AppError> {
    let owner = db::users::get_user(&state.pool, UserId(row.user_id))
        .await?
        .ok_or_else(|| AppError::Internal(format!("owner {} missing", row.user_id)))?;
    let species = match row.species_id {
        Some(id) => db::species::get_species(&state.pool, SpeciesId(id)).await?,
        None => None,
    };

    Ok(json!({
        "id": row.id,
        "name": row.name,
        "description": row.description,
        "characteristics": json_object(&row.characteristics),
        "photos": json_array(&row.photos),
        "last_seen_location": row.last_seen_location,
        "last_seen_lat": row.last_seen_lat,
        "last_seen_lng": row.last_seen_lng,
        "lost_date": row.lost_date,
        "reward_amount": row.reward_amount,
        "status": row.status,
        "created_at": row.created_at,
        "owner": {
            "name": owner.name,
            "phone": owner.phone,
        },
        "species": species.map(|s| json!({
            "name_th": s.name_th,
            "name_en": s.name_en,
        })),
    }))
}

async fn get_lost_bird(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = LostBirdId(id);
    let bird = db::lost_birds::get_lost_bird(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("lost bird not found".into()))?;

    let owner = db::users::get_user(&state.pool, UserId(bird.user_id))
        .await?
        .ok_or_else(|| AppError::Internal(format!("owner {} missing", bird.user_id)))?;
    let species = match bird.species_id {
        Some(sid) => db::species::get_species(&state.pool, SpeciesId(sid)).await?,
        None => None,
    };
    let sightings = db::sightings::list_for_lost_bird(&state.pool, id).await?;

    Ok(Json(json!({
        "id": bird.id,
        "name": bird.name,
        "description": bird.description,
        "characteristics": json_object(&bird.characteristics),
        "photos": json_array(&bird.photos),
        "last_seen_location": bird.last_seen_location,
        "last_seen_lat": bird.last_seen_lat,
        "last_seen_lng": bird.last_seen_lng,
        "lost_date": bird.lost_date,
        "contact_info": json_object(&bird.contact_info),
        "reward_amount": bird.reward_amount,
        "status": bird.status,
        "created_at": bird.created_at,
        "owner": {
            "id": owner.id,
            "name": owner.name,
            "email": owner.email,
            "phone": owner.phone,
        },
        "species": species.map(|s| json!({
            "id": s.id,
            "name_th": s.name_th,
            "name_en": s.name_en,
            "description": s.description,
        })),
        "sightings": sightings.iter().map(|s| json!({
            "id": s.id,
            "location": s.location,
            "lat": s.lat,
            "lng": s.lng,
            "sighting_date": s.sighting_date,
            "description": s.description,
            "photos": json_array(&s.photos),
            "confidence_level": s.confidence_level,
            "verified": s.verified,
            "reporter": s.reporter_name,
        })).collect::<Vec<_>>(),
    })))
}
