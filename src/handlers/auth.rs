use crate::{
    error::{AppError, Result},
    models::{LoginRequest, RegisterRequest, User},
    token::generate_jwt_token,
    AppState,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let user = state
        .users
        .find_by_username(&body.username)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid username or password".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Stored hash is invalid: {}", e)))?;
    Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::AuthError("Invalid username or password".to_string()))?;

    let token = generate_jwt_token(user.id, &state.env.jwt_secret, &state.env.jwt_expires_in)?;

    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(time::Duration::minutes(state.env.jwt_maxage as i64))
        .same_site(SameSite::Lax)
        .http_only(true);

    info!("user {} logged in", user.username);

    let mut response = Json(json!({
        "success": true,
        "data": {"token": token},
        "message": "Login successful."
    }))
    .into_response();

    response.headers_mut().insert(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| AppError::InternalServerError("Failed to build cookie".to_string()))?,
    );

    Ok(response)
}

pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    if body.username.is_empty() || body.password.len() < 8 {
        return Err(AppError::ValidationError(
            "Username is required and password must be at least 8 characters.".to_string(),
        ));
    }

    if state.users.find_by_username(&body.username).await?.is_some() {
        return Err(AppError::BadRequest("Username is already taken.".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(body.password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))?
        .to_string();

    let user = User {
        id: Uuid::new_v4(),
        username: body.username,
        password_hash,
        created_at: Utc::now(),
    };
    state.users.create(&user).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": user.filter_user(),
            "message": "Account created successfully."
        })),
    ))
}

pub async fn logout_handler() -> Result<impl IntoResponse> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::hours(-1))
        .same_site(SameSite::Lax)
        .http_only(true);

    let mut response = Json(json!({
        "success": true,
        "data": null,
        "message": "Logged out."
    }))
    .into_response();

    response.headers_mut().insert(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| AppError::InternalServerError("Failed to build cookie".to_string()))?,
    );

    Ok(response)
}
