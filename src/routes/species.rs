use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::AppState;
use crate::db;
use crate::db::models::json_object;
use crate::error::AppError;

pub fn routes() -> Router<AppState> {
    Router::new().route("/species", get(list_species))
}

async fn list_species(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let species = db::species::list_species(&state.pool).await?;
    let list: Vec<_> = species
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "name_th": s.name_th,
                "name_en": s.name_en,
                "description": s.description,
                "characteristics": json_object(&s.characteristics),
            })
        })
        .collect();
    Ok(Json(json!(list)))
}
