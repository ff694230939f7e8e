pub mod found_birds;
pub mod lost_birds;
pub mod models;
pub mod sightings;
pub mod species;
pub mod stats;
pub mod users;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

#[cfg(not(feature = "postgres"))]
pub type Db = sqlx::SqlitePool;
#[cfg(feature = "postgres")]
pub type Db = sqlx::PgPool;

/// Storage format for timestamps in the SQLite backend. Lexicographic order
/// matches chronological order, so `ORDER BY created_at` works on the TEXT
/// column directly.
#[cfg(not(feature = "postgres"))]
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Convert `?` placeholders to PostgreSQL `$1, $2, ...`.
/// Returned unchanged for the SQLite build.
#[cfg(not(feature = "postgres"))]
pub(crate) fn sql(query: &str) -> std::borrow::Cow<'_, str> {
    std::borrow::Cow::Borrowed(query)
}

#[cfg(feature = "postgres")]
pub(crate) fn sql(query: &str) -> std::borrow::Cow<'_, str> {
    use std::fmt::Write;
    let mut result = String::with_capacity(query.len() + 16);
    let mut idx = 0u32;
    let mut in_literal = false;
    for ch in query.chars() {
        match ch {
            '\'' => {
                in_literal = !in_literal;
                result.push(ch);
            }
            '?' if !in_literal => {
                idx += 1;
                write!(result, "${idx}").unwrap();
            }
            _ => result.push(ch),
        }
    }
    std::borrow::Cow::Owned(result)
}

pub async fn connect(url: &str) -> Result<Db, sqlx::Error> {
    #[cfg(not(feature = "postgres"))]
    {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Ok(pool)
    }
    #[cfg(feature = "postgres")]
    {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Ok(pool)
    }
}

pub async fn migrate(pool: &Db) -> Result<(), sqlx::migrate::MigrateError> {
    #[cfg(not(feature = "postgres"))]
    {
        sqlx::migrate!("./migrations/sqlite").run(pool).await?;
    }
    #[cfg(feature = "postgres")]
    {
        sqlx::migrate!("./migrations/postgres").run(pool).await?;
    }
    Ok(())
}

/// Bindable timestamp value for the active backend.
#[cfg(not(feature = "postgres"))]
pub(crate) fn to_timestamp(dt: DateTime<Utc>) -> models::Timestamp {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(feature = "postgres")]
pub(crate) fn to_timestamp(dt: DateTime<Utc>) -> models::Timestamp {
    dt
}

pub(crate) fn now() -> models::Timestamp {
    to_timestamp(Utc::now())
}

/// Parse a client-supplied ISO-8601 date. A trailing `Z` is an explicit UTC
/// offset; a naive datetime or bare date is assumed UTC.
pub fn parse_client_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap()));
    }
    Err(format!("invalid ISO-8601 date: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_client_date_utc_designator() {
        let dt = parse_client_date("2024-06-01T12:30:00Z").unwrap();
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt, parse_client_date("2024-06-01T12:30:00+00:00").unwrap());
    }

    #[test]
    fn test_parse_client_date_offset() {
        let dt = parse_client_date("2024-06-01T12:30:00+07:00").unwrap();
        assert_eq!(dt.hour(), 5);
    }

    #[test]
    fn test_parse_client_date_naive_is_utc() {
        let dt = parse_client_date("2024-06-01T12:30:00").unwrap();
        assert_eq!(dt, parse_client_date("2024-06-01T12:30:00Z").unwrap());
        let day = parse_client_date("2024-06-01").unwrap();
        assert_eq!(day.hour(), 0);
    }

    #[test]
    fn test_parse_client_date_rejects_garbage() {
        assert!(parse_client_date("yesterday").is_err());
        assert!(parse_client_date("").is_err());
        assert!(parse_client_date("2024-13-01T00:00:00Z").is_err());
    }
}
