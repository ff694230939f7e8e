use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::AppState;
use crate::db;
use crate::error::AppError;

pub fn routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

/// Share of lost birds that reached `reunited`, as a percentage rounded to
/// two decimals. Zero listings yields 0.0, not a division error.
fn success_rate(total_reunited: i64, total_lost: i64) -> f64 {
    let rate = total_reunited as f64 / total_lost.max(1) as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let counts = db::stats::collect(&state.pool).await?;

    Ok(Json(json!({
        "total_lost": counts.total_lost,
        "total_found": counts.total_found,
        "total_reunited": counts.total_reunited,
        "total_sightings": counts.total_sightings,
        "recent_lost": counts.recent_lost,
        "recent_found": counts.recent_found,
        "success_rate": success_rate(counts.total_reunited, counts.total_lost),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_no_lost_birds() {
        assert_eq!(success_rate(0, 0), 0.0);
    }

    #[test]
    fn test_success_rate_rounds_to_two_decimals() {
        assert_eq!(success_rate(1, 3), 33.33);
        assert_eq!(success_rate(2, 3), 66.67);
        assert_eq!(success_rate(3, 3), 100.0);
    }
}
