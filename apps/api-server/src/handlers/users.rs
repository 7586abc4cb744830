//! Author pages.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /user/{id} - the author and their posts, newest first.
pub async fn author_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = Uuid::parse_str(&path)
        .map_err(|_| AppError::NotFound(format!("User with id {} not found", path)))?;

    let page = state.posts.list_by_author(id).await?;

    Ok(HttpResponse::Ok().json(page))
}
