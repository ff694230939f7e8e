use serde::Serialize;

/// SQLite stores timestamps as TEXT, PostgreSQL as TIMESTAMPTZ.
#[cfg(not(feature = "postgres"))]
pub type Timestamp = String;
#[cfg(feature = "postgres")]
pub type Timestamp = chrono::DateTime<chrono::Utc>;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SpeciesRow {
    pub id: i64,
    pub name_th: String,
    pub name_en: Option<String>,
    pub description: Option<String>,
    /// JSON object text (size, colors, habitat, ...).
    pub characteristics: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LostBirdRow {
    pub id: i64,
    pub user_id: i64,
    pub species_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub characteristics: String,
    /// JSON array text; URL order is significant.
    pub photos: String,
    pub last_seen_location: String,
    pub last_seen_lat: Option<f64>,
    pub last_seen_lng: Option<f64>,
    pub lost_date: Timestamp,
    pub contact_info: String,
    pub reward_amount: i64,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FoundBirdRow {
    pub id: i64,
    pub user_id: i64,
    pub species_id: Option<i64>,
    pub description: String,
    pub characteristics: String,
    pub photos: String,
    pub found_location: String,
    pub found_lat: Option<f64>,
    pub found_lng: Option<f64>,
    pub found_date: Timestamp,
    pub contact_info: String,
    pub status: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SightingRow {
    pub id: i64,
    pub lost_bird_id: i64,
    pub user_id: i64,
    pub location: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub sighting_date: Timestamp,
    pub description: String,
    pub photos: String,
    pub confidence_level: i64,
    pub verified: bool,
    pub created_at: Timestamp,
}

/// Sighting with the reporter's display name joined in for the detail view.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SightingWithReporterRow {
    pub id: i64,
    pub lost_bird_id: i64,
    pub user_id: i64,
    pub location: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub sighting_date: Timestamp,
    pub description: String,
    pub photos: String,
    pub confidence_level: i64,
    pub verified: bool,
    pub created_at: Timestamp,
    pub reporter_name: String,
}

/// Deserialize a persisted JSON object column; malformed text degrades to `{}`.
pub fn json_object(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::json!({}))
}

/// Deserialize a persisted JSON array column; malformed text degrades to `[]`.
pub fn json_array(text: &str) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(v) if v.is_array() => v,
        _ => serde_json::json!([]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_column_fallbacks() {
        assert_eq!(
            json_object(r#"{"colors":["green"]}"#),
            serde_json::json!({"colors": ["green"]})
        );
        assert_eq!(json_object("not json"), serde_json::json!({}));
        assert_eq!(json_array(r#"["a.png","b.png"]"#), serde_json::json!(["a.png", "b.png"]));
        assert_eq!(json_array("{}"), serde_json::json!([]));
    }
}
