use super::models::UserRow;
use super::{Db, now, sql};
use crate::types::UserId;

#[tracing::instrument(skip(pool), err)]
pub async fn get_user(pool: &Db, id: UserId) -> Result<Option<UserRow>, sqlx::Error> {
    let q = sql("SELECT * FROM users WHERE id = ?");
    sqlx::query_as::<_, UserRow>(&q)
        .bind(id.as_i64())
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool), err)]
pub async fn get_user_by_email(pool: &Db, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    let q = sql("SELECT * FROM users WHERE email = ?");
    sqlx::query_as::<_, UserRow>(&q)
        .bind(email)
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool, password_hash), err)]
pub async fn create_user(
    pool: &Db,
    email: &str,
    password_hash: &str,
    name: &str,
    phone: &str,
) -> Result<UserId, sqlx::Error> {
    let q = sql(
        "INSERT INTO users (email, password_hash, name, phone, created_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id",
    );
    let id: i64 = sqlx::query_scalar(&q)
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(phone)
        .bind(now())
        .fetch_one(pool)
        .await?;
    Ok(UserId(id))
}
