mod auth;
mod found_birds;
mod lost_birds;
mod sightings;
mod species;
mod stats;
mod upload;

use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::error::AppError;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth::routes())
        .merge(lost_birds::routes())
        .merge(found_birds::routes())
        .merge(sightings::routes())
        .merge(upload::routes(state.config.max_upload_bytes))
        .merge(species::routes())
        .merge(stats::routes());

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Required-field check for request bodies: present and non-empty.
pub(crate) fn require<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, AppError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(format!("{field} is required"))),
    }
}

pub(crate) fn require_id<T: Copy>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::BadRequest(format!("{field} is required")))
}

/// Wire shape of the pagination block on list responses. 1-indexed pages;
/// an empty result set has zero pages.
#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct Pagination {
    pub page: i64,
    pub pages: i64,
    pub total: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            page,
            pages,
            total,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_empty() {
        let p = Pagination::new(1, 20, 0);
        assert_eq!(p.pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_pagination_partial_last_page() {
        let p = Pagination::new(1, 20, 41);
        assert_eq!(p.pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);

        let last = Pagination::new(3, 20, 41);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn test_pagination_exact_fit() {
        let p = Pagination::new(2, 20, 40);
        assert_eq!(p.pages, 2);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_pagination_page_past_end() {
        let p = Pagination::new(9, 20, 41);
        assert_eq!(p.pages, 3);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn test_require() {
        assert!(require(&Some("x".into()), "name").is_ok());
        assert!(require(&Some(String::new()), "name").is_err());
        assert!(require(&None, "name").is_err());
        let err = require(&None, "email").unwrap_err();
        assert!(err.to_string().contains("email is required"));
    }
}
