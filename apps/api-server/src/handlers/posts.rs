//! Post CRUD.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use super::multipart::PostForm;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::{AuthenticationError, Identity};
use crate::state::AppState;

fn post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Post with id {raw} not found")))
}

/// GET /post - newest first.
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /post/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = post_id(&path)?;
    let post = state.posts.get(id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /post - multipart with `title`, `summary`, `content` and a `file` cover.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = PostForm::read(payload, state.max_upload_bytes).await?;
    let draft = form.draft()?;
    let cover = form
        .file
        .ok_or_else(|| AppError::BadRequest("Missing field 'file'".to_string()))?;

    let post = state.posts.create(identity.user_id, draft, cover).await?;

    Ok(HttpResponse::Created().json(post))
}

/// PUT /post - multipart with `id`, `title`, `summary`, `content` and an optional `file`.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = PostForm::read(payload, state.max_upload_bytes).await?;
    let id = Uuid::parse_str(form.required("id")?)
        .map_err(|_| AppError::BadRequest("Field 'id' is not a valid post id".to_string()))?;
    let draft = form.draft()?;

    let post = state
        .posts
        .update(identity.user_id, id, draft, form.file)
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /post/{id}
///
/// Every failure is reported as 401. An id that matches no post is not a failure.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Result<Identity, AuthenticationError>,
    path: web::Path<String>,
) -> HttpResponse {
    let outcome = match (identity, Uuid::parse_str(&path)) {
        (Ok(identity), Ok(id)) => state
            .posts
            .delete(identity.user_id, id)
            .await
            .map_err(|e| e.to_string()),
        (Err(e), _) => Err(e.to_string()),
        (_, Err(e)) => Err(e.to_string()),
    };

    match outcome {
        Ok(()) => HttpResponse::Ok().json("ok"),
        Err(e) => {
            tracing::error!(error = %e, post_id = %path, "Delete failed");
            HttpResponse::Unauthorized().json("Not authorised")
        }
    }
}
