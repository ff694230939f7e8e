use chrono::{DateTime, Utc};

use super::models::SightingWithReporterRow;
use super::{Db, now, sql, to_timestamp};
use crate::types::{LostBirdId, SightingId, UserId};

pub struct NewSighting {
    pub lost_bird_id: LostBirdId,
    pub reporter: UserId,
    pub location: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub sighting_date: DateTime<Utc>,
    pub description: String,
    pub photos: serde_json::Value,
    pub confidence_level: i64,
}

/// Insert a sighting tied to an existing lost-bird listing. Returns `None`
/// without writing anything when the listing does not exist; SQLite does not
/// enforce the foreign key for us, so the check is explicit and shares a
/// transaction with the insert.
#[tracing::instrument(skip(pool, sighting), err)]
pub async fn create_sighting(
    pool: &Db,
    sighting: NewSighting,
) -> Result<Option<SightingId>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let exists_q = sql("SELECT COUNT(*) FROM lost_birds WHERE id = ?");
    let exists: i64 = sqlx::query_scalar(&exists_q)
        .bind(sighting.lost_bird_id.as_i64())
        .fetch_one(&mut *tx)
        .await?;
    if exists == 0 {
        return Ok(None);
    }

    let insert_q = sql(
        "INSERT INTO sighting_reports
            (lost_bird_id, user_id, location, lat, lng, sighting_date,
             description, photos, confidence_level, verified, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
    );
    let id: i64 = sqlx::query_scalar(&insert_q)
        .bind(sighting.lost_bird_id.as_i64())
        .bind(sighting.reporter.as_i64())
        .bind(&sighting.location)
        .bind(sighting.lat)
        .bind(sighting.lng)
        .bind(to_timestamp(sighting.sighting_date))
        .bind(&sighting.description)
        .bind(sighting.photos.to_string())
        .bind(sighting.confidence_level)
        .bind(false)
        .bind(now())
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(SightingId(id)))
}

/// Sightings for one listing with the reporter's name, oldest first.
#[tracing::instrument(skip(pool), err)]
pub async fn list_for_lost_bird(
    pool: &Db,
    lost_bird_id: LostBirdId,
) -> Result<Vec<SightingWithReporterRow>, sqlx::Error> {
    let q = sql(
        "SELECT s.*, u.name AS reporter_name
         FROM sighting_reports s
         JOIN users u ON u.id = s.user_id
         WHERE s.lost_bird_id = ?
         ORDER BY s.id",
    );
    sqlx::query_as::<_, SightingWithReporterRow>(&q)
        .bind(lost_bird_id.as_i64())
        .fetch_all(pool)
        .await
}
