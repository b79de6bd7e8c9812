use axum::{extract::State, response::Json, Extension};

use crate::{
    error::{Error, Result},
    middleware::auth::Claims,
    models::user::User,
    AppState,
};

#[axum::debug_handler]
pub async fn sync(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<User>> {
    let email = claims
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| Error::BadRequest("Token carries no email".into()))?;

    let user = state.user_service.create_user(&claims.sub, email).await?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<User>> {
    Ok(Json(state.user_service.get_user(&claims.sub).await?))
}
