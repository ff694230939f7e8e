use chrono::{DateTime, Utc};

use super::models::LostBirdRow;
use super::{Db, now, sql, to_timestamp};
use crate::types::{LostBirdId, LostBirdStatus, SpeciesId, UserId};

/// Degrees of latitude per kilometre, flat-earth approximation.
const DEGREES_PER_KM: f64 = 111.0;

pub struct NewLostBird {
    pub owner: UserId,
    pub species_id: Option<SpeciesId>,
    pub name: String,
    pub description: String,
    pub characteristics: serde_json::Value,
    pub photos: serde_json::Value,
    pub last_seen_location: String,
    pub last_seen_lat: Option<f64>,
    pub last_seen_lng: Option<f64>,
    pub lost_date: DateTime<Utc>,
    pub contact_info: serde_json::Value,
    pub reward_amount: i64,
}

#[derive(Debug, Default)]
pub struct LostBirdFilter {
    pub status: String,
    pub search: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: f64,
}

/// Rectangular bounding box around (lat, lng): (lat_min, lat_max, lng_min,
/// lng_max). Intentionally not great-circle distance; the box gets wider in
/// longitude as `|lat|` shrinks, and at the equator the longitude span falls
/// back to the latitude span.
pub fn geo_bounds(lat: f64, lng: f64, radius_km: f64) -> (f64, f64, f64, f64) {
    let lat_range = radius_km / DEGREES_PER_KM;
    let lng_range = if lat == 0.0 {
        lat_range
    } else {
        radius_km / (DEGREES_PER_KM * lat.abs())
    };
    (lat - lat_range, lat + lat_range, lng - lng_range, lng + lng_range)
}

#[tracing::instrument(skip(pool, bird), err)]
pub async fn create_lost_bird(pool: &Db, bird: NewLostBird) -> Result<LostBirdId, sqlx::Error> {
    let q = sql(
        "INSERT INTO lost_birds
            (user_id, species_id, name, description, characteristics, photos,
             last_seen_location, last_seen_lat, last_seen_lng, lost_date,
             contact_info, reward_amount, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
    );
    let created = now();
    let id: i64 = sqlx::query_scalar(&q)
        .bind(bird.owner.as_i64())
        .bind(bird.species_id.map(|s| s.as_i64()))
        .bind(&bird.name)
        .bind(&bird.description)
        .bind(bird.characteristics.to_string())
        .bind(bird.photos.to_string())
        .bind(&bird.last_seen_location)
        .bind(bird.last_seen_lat)
        .bind(bird.last_seen_lng)
        .bind(to_timestamp(bird.lost_date))
        .bind(bird.contact_info.to_string())
        .bind(bird.reward_amount)
        .bind(LostBirdStatus::Lost.as_str())
        .bind(created.clone())
        .bind(created)
        .fetch_one(pool)
        .await?;
    Ok(LostBirdId(id))
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_lost_bird(pool: &Db, id: LostBirdId) -> Result<Option<LostBirdRow>, sqlx::Error> {
    let q = sql("SELECT * FROM lost_birds WHERE id = ?");
    sqlx::query_as::<_, LostBirdRow>(&q)
        .bind(id.as_i64())
        .fetch_optional(pool)
        .await
}

/// Filtered page of lost-bird listings plus the total row count for the
/// same filter, newest first (id breaks created_at ties).
#[tracing::instrument(skip(pool, filter), err)]
pub async fn list_lost_birds(
    pool: &Db,
    filter: &LostBirdFilter,
    page: i64,
    per_page: i64,
) -> Result<(Vec<LostBirdRow>, i64), sqlx::Error> {
    let mut where_sql = String::from("status = ?");
    let search_pattern = filter
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s.to_lowercase()));
    if search_pattern.is_some() {
        where_sql.push_str(
            " AND (LOWER(name) LIKE ? OR LOWER(description) LIKE ? OR LOWER(last_seen_location) LIKE ?)",
        );
    }
    let bounds = match (filter.lat, filter.lng) {
        (Some(lat), Some(lng)) => {
            where_sql
                .push_str(" AND last_seen_lat BETWEEN ? AND ? AND last_seen_lng BETWEEN ? AND ?");
            Some(geo_bounds(lat, lng, filter.radius_km))
        }
        _ => None,
    };

    let count_raw = format!("SELECT COUNT(*) FROM lost_birds WHERE {where_sql}");
    let count_sql = sql(&count_raw);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql).bind(&filter.status);
    if let Some(pattern) = &search_pattern {
        count_q = count_q.bind(pattern).bind(pattern).bind(pattern);
    }
    if let Some((lat_min, lat_max, lng_min, lng_max)) = bounds {
        count_q = count_q.bind(lat_min).bind(lat_max).bind(lng_min).bind(lng_max);
    }
    let total = count_q.fetch_one(pool).await?;

    let list_raw = format!(
        "SELECT * FROM lost_birds WHERE {where_sql}
         ORDER BY created_at DESC, id DESC
         LIMIT ? OFFSET ?",
    );
    let list_sql = sql(&list_raw);
    let mut list_q = sqlx::query_as::<_, LostBirdRow>(&list_sql).bind(&filter.status);
    if let Some(pattern) = &search_pattern {
        list_q = list_q.bind(pattern).bind(pattern).bind(pattern);
    }
    if let Some((lat_min, lat_max, lng_min, lng_max)) = bounds {
        list_q = list_q.bind(lat_min).bind(lat_max).bind(lng_min).bind(lng_max);
    }
    let rows = list_q
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(pool)
        .await?;

    Ok((rows, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_bounds_contains_center() {
        let (lat_min, lat_max, lng_min, lng_max) = geo_bounds(13.75, 100.5, 50.0);
        assert!(lat_min < 13.75 && 13.75 < lat_max);
        assert!(lng_min < 100.5 && 100.5 < lng_max);
    }

    #[test]
    fn test_geo_bounds_symmetric() {
        let (lat_min, lat_max, lng_min, lng_max) = geo_bounds(13.75, 100.5, 50.0);
        assert!((13.75 - lat_min - (lat_max - 13.75)).abs() < 1e-9);
        assert!((100.5 - lng_min - (lng_max - 100.5)).abs() < 1e-9);
    }

    #[test]
    fn test_geo_bounds_widens_near_equator() {
        let (_, _, lng_min_low, lng_max_low) = geo_bounds(2.0, 0.0, 50.0);
        let (_, _, lng_min_high, lng_max_high) = geo_bounds(60.0, 0.0, 50.0);
        assert!(lng_max_low - lng_min_low > lng_max_high - lng_min_high);
    }

    #[test]
    fn test_geo_bounds_equator_no_division_by_zero() {
        let (lat_min, lat_max, lng_min, lng_max) = geo_bounds(0.0, 10.0, 50.0);
        assert!(lng_min.is_finite() && lng_max.is_finite());
        assert!((lng_max - lng_min - (lat_max - lat_min)).abs() < 1e-9);
    }

    #[test]
    fn test_geo_bounds_southern_hemisphere() {
        let north = geo_bounds(13.75, 100.5, 50.0);
        let south = geo_bounds(-13.75, 100.5, 50.0);
        assert!((north.3 - north.2 - (south.3 - south.2)).abs() < 1e-9);
    }
}
