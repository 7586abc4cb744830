//! Registration, login, profile and logout.

use actix_web::{HttpResponse, web};

use quill_core::domain::User;
use quill_shared::dto::{LoginRequest, LoginResponse, RegisterResponse, RegisterUserRequest, UserResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::Identity;
use crate::state::AppState;

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        created_at: user.created_at.to_rfc3339(),
    }
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state.accounts.register(&req.username, &req.password).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        user: user_response(&user),
    }))
}

/// POST /login - sets the session cookie on success.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let outcome = state.accounts.login(&req.username, &req.password).await?;
    let cookie = state.sessions.issue(&outcome.token)?;

    tracing::info!(user_id = %outcome.user.id, "User logged in");

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        user_id: outcome.user.id.to_string(),
        username: outcome.user.username,
    }))
}

/// GET /profile - Protected route, echoes the token payload.
pub async fn profile(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    // A valid token for a user that no longer exists is still a credential error.
    if state.accounts.find_user(identity.user_id).await?.is_none() {
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(identity))
}

/// POST /logout
pub async fn logout(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let cookie = state.sessions.logout()?;

    Ok(HttpResponse::Ok().cookie(cookie).json("logged-out"))
}
