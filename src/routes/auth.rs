use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use super::require;
use crate::AppState;
use crate::auth;
use crate::db;
use crate::error::AppError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Deserialize)]
struct RegisterBody {
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
    phone: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let email = require(&body.email, "email")?;
    let password = require(&body.password, "password")?;
    let name = require(&body.name, "name")?;
    let phone = body.phone.as_deref().unwrap_or("");

    if db::users::get_user_by_email(&state.pool, email).await?.is_some() {
        return Err(AppError::Conflict("email already registered".into()));
    }

    let password_hash = auth::hash_password(password)?;
    let user_id = db::users::create_user(&state.pool, email, &password_hash, name, phone).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "user registered successfully",
            "user_id": user_id,
        })),
    ))
}

#[derive(Deserialize)]
struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

/// Missing fields and unknown emails fail the same way as a wrong password.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let invalid = || AppError::Unauthorized("invalid credentials".into());
    let (Some(email), Some(password)) = (body.email.as_deref(), body.password.as_deref()) else {
        return Err(invalid());
    };

    let user = db::users::get_user_by_email(&state.pool, email)
        .await?
        .ok_or_else(invalid)?;
    if !auth::verify_password(password, &user.password_hash) {
        return Err(invalid());
    }

    Ok(Json(serde_json::json!({
        "message": "login successful",
        "user_id": user.id,
        "name": user.name,
    })))
}
