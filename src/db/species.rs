use super::models::SpeciesRow;
use super::{Db, sql};
use crate::types::SpeciesId;

#[tracing::instrument(skip(pool), err)]
pub async fn list_species(pool: &Db) -> Result<Vec<SpeciesRow>, sqlx::Error> {
    let q = sql("SELECT * FROM bird_species ORDER BY id");
    sqlx::query_as::<_, SpeciesRow>(&q).fetch_all(pool).await
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_species(pool: &Db, id: SpeciesId) -> Result<Option<SpeciesRow>, sqlx::Error> {
    let q = sql("SELECT * FROM bird_species WHERE id = ?");
    sqlx::query_as::<_, SpeciesRow>(&q)
        .bind(id.as_i64())
        .fetch_optional(pool)
        .await
}

/// Insert the sample reference species iff the table is empty. Idempotent.
#[tracing::instrument(skip(pool), err)]
pub async fn seed_defaults(pool: &Db) -> Result<(), sqlx::Error> {
    let count_q = sql("SELECT COUNT(*) FROM bird_species");
    let count: i64 = sqlx::query_scalar(&count_q).fetch_one(pool).await?;
    if count > 0 {
        return Ok(());
    }

    let samples = [
        (
            "นกแก้วโฟรพัส",
            "Rose-ringed Parakeet",
            "นกแก้วขนาดกลาง สีเขียว มีแถบสีชมพูรอบคอ",
            serde_json::json!({
                "size": "medium",
                "colors": ["green", "pink", "black"],
                "habitat": "urban, gardens",
            }),
        ),
        (
            "นกกรงหัวจุก",
            "Red-whiskered Bulbul",
            "นกขนาดเล็ก มีหงอกสีดำ แก้มสีแดง",
            serde_json::json!({
                "size": "small",
                "colors": ["brown", "white", "red", "black"],
                "habitat": "gardens, parks",
            }),
        ),
        (
            "นกขุนทอง",
            "Oriental Magpie-Robin",
            "นกสีดำขาว ร้องเพลงไพเราะ",
            serde_json::json!({
                "size": "small",
                "colors": ["black", "white"],
                "habitat": "gardens, urban areas",
            }),
        ),
    ];

    let mut tx = pool.begin().await?;
    let insert_q = sql(
        "INSERT INTO bird_species (name_th, name_en, description, characteristics)
         VALUES (?, ?, ?, ?)",
    );
    for (name_th, name_en, description, characteristics) in samples {
        sqlx::query(&insert_q)
            .bind(name_th)
            .bind(name_en)
            .bind(description)
            .bind(characteristics.to_string())
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!("seeded sample bird species");
    Ok(())
}
