use crate::{
    error::{AppError, Result},
    token::verify_jwt_token,
    AppState,
};
use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;
use uuid::Uuid;

pub async fn auth(
    cookie_jar: CookieJar,
    State(data): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    auth_value
                        .strip_prefix("Bearer ")
                        .map(|token| token.to_owned())
                })
        });

    let token = token.ok_or_else(|| {
        AppError::AuthError("You are not logged in, please provide token".to_string())
    })?;

    let claims = verify_jwt_token(&data.env.jwt_secret, &token)
        .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    let user_id = Uuid::parse_str(&claims.claims.sub)
        .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    debug!("token verified for user ID {}", user_id);

    // Make the caller's identity available to handlers
    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}
