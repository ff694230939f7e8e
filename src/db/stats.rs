use chrono::{Duration, Utc};

use super::{Db, sql, to_timestamp};
use crate::types::LostBirdStatus;

/// Raw counts behind the stats endpoint, computed fresh on every call.
#[derive(Debug, Clone, Copy)]
pub struct StatCounts {
    pub total_lost: i64,
    pub total_found: i64,
    pub total_reunited: i64,
    pub total_sightings: i64,
    pub recent_lost: i64,
    pub recent_found: i64,
}

const RECENT_WINDOW_DAYS: i64 = 30;

#[tracing::instrument(skip(pool), err)]
pub async fn collect(pool: &Db) -> Result<StatCounts, sqlx::Error> {
    let cutoff = to_timestamp(Utc::now() - Duration::days(RECENT_WINDOW_DAYS));

    let total_lost: i64 = sqlx::query_scalar(&sql("SELECT COUNT(*) FROM lost_birds"))
        .fetch_one(pool)
        .await?;
    let total_found: i64 = sqlx::query_scalar(&sql("SELECT COUNT(*) FROM found_birds"))
        .fetch_one(pool)
        .await?;
    let total_reunited: i64 =
        sqlx::query_scalar(&sql("SELECT COUNT(*) FROM lost_birds WHERE status = ?"))
            .bind(LostBirdStatus::Reunited.as_str())
            .fetch_one(pool)
            .await?;
    let total_sightings: i64 = sqlx::query_scalar(&sql("SELECT COUNT(*) FROM sighting_reports"))
        .fetch_one(pool)
        .await?;
    let recent_lost: i64 =
        sqlx::query_scalar(&sql("SELECT COUNT(*) FROM lost_birds WHERE created_at >= ?"))
            .bind(cutoff.clone())
            .fetch_one(pool)
            .await?;
    let recent_found: i64 =
        sqlx::query_scalar(&sql("SELECT COUNT(*) FROM found_birds WHERE created_at >= ?"))
            .bind(cutoff)
            .fetch_one(pool)
            .await?;

    Ok(StatCounts {
        total_lost,
        total_found,
        total_reunited,
        total_sightings,
        recent_lost,
        recent_found,
    })
}
