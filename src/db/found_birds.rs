use chrono::{DateTime, Utc};

use super::models::FoundBirdRow;
use super::{Db, now, sql, to_timestamp};
use crate::types::{FoundBirdId, FoundBirdStatus, SpeciesId, UserId};

pub struct NewFoundBird {
    pub finder: UserId,
    pub species_id: Option<SpeciesId>,
    pub description: String,
    pub characteristics: serde_json::Value,
    pub photos: serde_json::Value,
    pub found_location: String,
    pub found_lat: Option<f64>,
    pub found_lng: Option<f64>,
    pub found_date: DateTime<Utc>,
    pub contact_info: serde_json::Value,
}

#[tracing::instrument(skip(pool, bird), err)]
pub async fn create_found_bird(pool: &Db, bird: NewFoundBird) -> Result<FoundBirdId, sqlx::Error> {
    let q = sql(
        "INSERT INTO found_birds
            (user_id, species_id, description, characteristics, photos,
             found_location, found_lat, found_lng, found_date, contact_info,
             status, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
    );
    let id: i64 = sqlx::query_scalar(&q)
        .bind(bird.finder.as_i64())
        .bind(bird.species_id.map(|s| s.as_i64()))
        .bind(&bird.description)
        .bind(bird.characteristics.to_string())
        .bind(bird.photos.to_string())
        .bind(&bird.found_location)
        .bind(bird.found_lat)
        .bind(bird.found_lng)
        .bind(to_timestamp(bird.found_date))
        .bind(bird.contact_info.to_string())
        .bind(FoundBirdStatus::Found.as_str())
        .bind(now())
        .fetch_one(pool)
        .await?;
    Ok(FoundBirdId(id))
}

/// Unclaimed found-bird listings, newest first, plus the total count.
#[tracing::instrument(skip(pool), err)]
pub async fn list_found_birds(
    pool: &Db,
    page: i64,
    per_page: i64,
) -> Result<(Vec<FoundBirdRow>, i64), sqlx::Error> {
    let count_q = sql("SELECT COUNT(*) FROM found_birds WHERE status = ?");
    let total: i64 = sqlx::query_scalar(&count_q)
        .bind(FoundBirdStatus::Found.as_str())
        .fetch_one(pool)
        .await?;

    let list_q = sql(
        "SELECT * FROM found_birds WHERE status = ?
         ORDER BY created_at DESC, id DESC
         LIMIT ? OFFSET ?",
    );
    let rows = sqlx::query_as::<_, FoundBirdRow>(&list_q)
        .bind(FoundBirdStatus::Found.as_str())
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(pool)
        .await?;

    Ok((rows, total))
}
