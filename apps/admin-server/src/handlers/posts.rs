//! Post management handlers.

use actix_web::{HttpResponse, web};

use press_core::analysis::analyze;
use press_core::domain::Post;
use press_shared::ApiResponse;
use press_shared::dto::{Empty, PostListResponse, PostResponse, SavePostResponse, SlugQuery};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn required_slug(query: &SlugQuery) -> AppResult<&str> {
    query
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .ok_or_else(|| AppError::BadRequest("No slug provided".to_string()))
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostListResponse::from(posts))))
}

/// GET /api/posts/load?slug=...
pub async fn load_post(
    state: web::Data<AppState>,
    query: web::Query<SlugQuery>,
) -> AppResult<HttpResponse> {
    let slug = required_slug(&query)?;
    let post = state.posts.load(slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostResponse { post })))
}

/// POST /api/posts/save
pub async fn save_post(
    state: web::Data<AppState>,
    body: web::Json<Post>,
) -> AppResult<HttpResponse> {
    let saved = state.posts.save(body.into_inner()).await?;

    let message = if saved.status.is_draft() {
        "Post saved as draft successfully!"
    } else {
        "Post published successfully!"
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        SavePostResponse {
            filepath: saved.path.display().to_string(),
            slug: saved.slug,
        },
        message,
    )))
}

/// DELETE /api/posts/delete?slug=...
pub async fn delete_post(
    state: web::Data<AppState>,
    query: web::Query<SlugQuery>,
) -> AppResult<HttpResponse> {
    let slug = required_slug(&query)?;
    state.posts.delete(slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        Empty::default(),
        "Post deleted successfully",
    )))
}

/// POST /api/posts/analyze - statistics, readability, SEO and JSON-LD for
/// an unsaved post.
pub async fn analyze_post(body: web::Json<Post>) -> AppResult<HttpResponse> {
    let report = analyze(&body, chrono::Utc::now());
    Ok(HttpResponse::Ok().json(ApiResponse::ok(report)))
}
