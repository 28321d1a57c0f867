//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::{DomainError, PostsHook};
use quill_core::domain::{DEFAULT_CATEGORY, NewPost, PageRequest, Post, PostId, PostPatch};
use quill_shared::ApiResponse;
use quill_shared::dto::{
    CreatePostRequest, HomeFeed, ListPostsQuery, PostListResponse, PostSummary, UpdatePostRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

const EXCERPT_CHARS: usize = 150;
const FEATURED_COUNT: usize = 2;
const POPULAR_COUNT: usize = 6;
const FALLBACK_IMAGE: &str = "https://picsum.photos/600/300";

fn summarize(post: &Post) -> PostSummary {
    let category = match post.category.trim() {
        "" => DEFAULT_CATEGORY.to_uppercase(),
        c => c.to_uppercase(),
    };

    PostSummary {
        id: post.id.to_string(),
        title: post.title.clone(),
        excerpt: post.excerpt(EXCERPT_CHARS),
        category,
        image: post.image.clone().unwrap_or_else(|| FALLBACK_IMAGE.to_string()),
        author: post.user_id.clone(),
        created_at: post.created_at.to_rfc3339(),
    }
}

/// GET /api/posts?page=1&limit=10
///
/// Refetches the requested page. A failed fetch still answers 200 with the
/// previous posts and the failure in `error`.
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(state.page_size),
    )?;

    let hook = PostsHook::attach(state.store.clone(), page).await;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostListResponse {
        posts: hook.posts(),
        total_posts: hook.total_posts(),
        page: page.page(),
        limit: page.limit(),
        loading: hook.loading(),
        error: hook.error(),
    })))
}

/// GET /api/posts/local - posts authored on this server.
pub async fn local(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(state.store.local_posts()))
}

/// GET /api/posts/home - featured and popular sections.
pub async fn home(state: web::Data<AppState>) -> HttpResponse {
    if state.store.posts().is_empty() {
        state.store.fetch_posts(PageRequest::default()).await;
    }

    let posts = state.store.posts();
    let feed = HomeFeed {
        featured: posts.iter().take(FEATURED_COUNT).map(summarize).collect(),
        popular: posts.iter().take(POPULAR_COUNT).map(summarize).collect(),
    };

    HttpResponse::Ok().json(ApiResponse::ok(feed))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = PostId::parse(&path);

    let post = state
        .store
        .find(&id)
        .ok_or_else(|| not_found(&id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate().map_err(AppError::Validation)?;

    let input = NewPost {
        title: req.title,
        body: req.body,
        user_id: req
            .user_id
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| state.default_author.clone()),
        category: Some(req.category),
    };

    let post = state.store.create_post(input).await?;
    tracing::info!(request_id = %request_id.as_str(), post_id = %post.id, "Created post");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(post, "Post created")))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    request_id: RequestId,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate().map_err(AppError::Validation)?;

    let patch = PostPatch {
        title: req.title,
        body: req.body,
        user_id: None,
        category: req.category,
        image: req.image,
    };
    if patch.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let id = PostId::parse(&path);
    let post = state
        .store
        .update_post(&id, patch)
        .await?
        .ok_or_else(|| not_found(&id))?;
    tracing::info!(request_id = %request_id.as_str(), post_id = %id, "Updated post");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(post, "Post updated")))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    request_id: RequestId,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = PostId::parse(&path);

    if !state.store.delete_post(&id).await? {
        return Err(not_found(&id));
    }
    tracing::info!(request_id = %request_id.as_str(), post_id = %id, "Deleted post");

    Ok(HttpResponse::NoContent().finish())
}

fn not_found(id: &PostId) -> AppError {
    DomainError::NotFound {
        entity_type: "Post",
        id: id.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use quill_core::SourceError;
    use quill_core::ports::{PostSource, RemotePage};
    use quill_core::{PostStorage, PostStore};
    use quill_infra::{InMemoryKeyValueStore, StaticPostSource};
    use quill_shared::ErrorResponse;
    use serde_json::json;

    use super::*;
    use crate::config::PostsConfig;
    use crate::handlers::configure_routes;
    use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};

    struct DownSource;

    #[async_trait]
    impl PostSource for DownSource {
        async fn fetch_page(&self, _page: PageRequest) -> Result<RemotePage, SourceError> {
            Err(SourceError::Status(503))
        }
    }

    fn state_with(source: Arc<dyn PostSource>) -> AppState {
        let storage = PostStorage::new(Arc::new(InMemoryKeyValueStore::new()));
        let store = PostStore::new(source, storage);
        AppState::from_store(Arc::new(store), &PostsConfig::default())
    }

    fn placeholder_state(count: u64) -> AppState {
        state_with(Arc::new(StaticPostSource::placeholder(count)))
    }

    macro_rules! init_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .wrap(RequestIdMiddleware)
                    .app_data(web::Data::new($state))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn form(title: &str) -> serde_json::Value {
        json!({
            "title": title,
            "body": "<p>Plenty of words here</p>",
            "category": "Tech",
        })
    }

    #[actix_rt::test]
    async fn test_list_second_page() {
        let app = init_app!(placeholder_state(25));

        let req = test::TestRequest::get()
            .uri("/api/posts?page=2&limit=10")
            .to_request();
        let resp: ApiResponse<PostListResponse<Post>> = test::call_and_read_body_json(&app, req).await;

        let list = resp.data.unwrap();
        assert_eq!(list.total_posts, 25);
        assert_eq!(list.posts.len(), 10);
        assert_eq!(list.posts[0].id, PostId::Remote(11));
        assert_eq!(list.error, None);
    }

    #[actix_rt::test]
    async fn test_list_rejects_page_zero() {
        let app = init_app!(placeholder_state(5));

        let req = test::TestRequest::get().uri("/api/posts?page=0").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_list_reports_fetch_failure() {
        let app = init_app!(state_with(Arc::new(DownSource)));

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let resp: ApiResponse<PostListResponse<Post>> = test::call_and_read_body_json(&app, req).await;

        let list = resp.data.unwrap();
        assert!(list.posts.is_empty());
        assert_eq!(list.error.as_deref(), Some("Failed to fetch posts"));
        assert!(!list.loading);
    }

    #[actix_rt::test]
    async fn test_create_then_get_and_list() {
        let app = init_app!(placeholder_state(25));

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(form("Hello world"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: ApiResponse<Post> = test::read_body_json(resp).await;
        let created = created.data.unwrap();
        assert!(created.id.is_local());
        assert_eq!(created.user_id, "1");
        assert_eq!(created.category, "Tech");

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", created.id))
            .to_request();
        let fetched: ApiResponse<Post> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched.data.unwrap(), created);

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let list: ApiResponse<PostListResponse<Post>> = test::call_and_read_body_json(&app, req).await;
        let list = list.data.unwrap();
        assert_eq!(list.posts[0], created);
        assert_eq!(list.posts.len(), 11);

        let req = test::TestRequest::get().uri("/api/posts/local").to_request();
        let local: ApiResponse<Vec<Post>> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(local.data.unwrap(), vec![created]);
    }

    #[actix_rt::test]
    async fn test_create_rejects_invalid_form() {
        let app = init_app!(placeholder_state(0));

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "Hi", "body": "short", "category": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let problem: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(problem.errors.len(), 3);
    }

    #[actix_rt::test]
    async fn test_update_and_missing_update() {
        let app = init_app!(placeholder_state(0));
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(form("Original"))
            .to_request();
        let created: ApiResponse<Post> = test::call_and_read_body_json(&app, req).await;
        let created = created.data.unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", created.id))
            .set_json(json!({ "title": "Renamed" }))
            .to_request();
        let updated: ApiResponse<Post> = test::call_and_read_body_json(&app, req).await;
        let updated = updated.data.unwrap();
        assert_eq!(updated.title, "Renamed");
        assert!(updated.updated_at.unwrap() >= updated.created_at);

        let req = test::TestRequest::put()
            .uri("/api/posts/local-1")
            .set_json(json!({ "title": "Nobody" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let problem: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(problem.detail.as_deref(), Some("Post with id local-1 not found"));
    }

    #[actix_rt::test]
    async fn test_update_without_fields_is_bad_request() {
        let app = init_app!(placeholder_state(3));

        let req = test::TestRequest::put()
            .uri("/api/posts/1")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_delete_then_delete_again() {
        let app = init_app!(placeholder_state(0));
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(form("Short lived"))
            .to_request();
        let created: ApiResponse<Post> = test::call_and_read_body_json(&app, req).await;
        let uri = format!("/api/posts/{}", created.data.unwrap().id);

        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_home_feed_sections() {
        let app = init_app!(placeholder_state(25));

        let req = test::TestRequest::get().uri("/api/posts/home").to_request();
        let resp: ApiResponse<HomeFeed> = test::call_and_read_body_json(&app, req).await;

        let feed = resp.data.unwrap();
        assert_eq!(feed.featured.len(), FEATURED_COUNT);
        assert_eq!(feed.popular.len(), POPULAR_COUNT);
        assert_eq!(feed.popular[0].category, "GENERAL");
        assert_eq!(feed.popular[0].image, FALLBACK_IMAGE);
    }

    #[actix_rt::test]
    async fn test_request_id_is_echoed() {
        let app = init_app!(placeholder_state(0));

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header((REQUEST_ID_HEADER, "abc-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");
    }

    #[::core::prelude::v1::test]
    fn test_summary_uppercases_category_and_trims_body() {
        let post = Post {
            id: PostId::local(42),
            title: "T".into(),
            body: format!("<h1>{}</h1>", "a".repeat(400)),
            user_id: "7".into(),
            category: "lifestyle".into(),
            image: Some("https://picsum.photos/seed/42/600/300".into()),
            created_at: chrono::Utc::now(),
            updated_at: None,
        };

        let summary = summarize(&post);

        assert_eq!(summary.id, "local-42");
        assert_eq!(summary.category, "LIFESTYLE");
        assert_eq!(summary.excerpt.chars().count(), EXCERPT_CHARS);
        assert_eq!(summary.image, "https://picsum.photos/seed/42/600/300");
    }
}
