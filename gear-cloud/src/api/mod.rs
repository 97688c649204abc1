//! HTTP API routes for gear-cloud

pub mod catalog;
pub mod category;
pub mod health;
pub mod image;
pub mod import;
pub mod item;
pub mod pack;
pub mod resources;
pub mod trip;
pub mod user;

use axum::http::{HeaderValue, Method, header};
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use shared::error::{AppError, ErrorCode};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit::{login_rate_limit, password_reset_rate_limit, register_rate_limit};
use crate::auth::user_auth::user_auth_middleware;
use crate::state::AppState;

/// Request body cap; uploads are checked against their own limit
const MAX_BODY_SIZE: usize = 25 * 1024 * 1024;

/// Bulk imports running at once across all users
const MAX_CONCURRENT_IMPORTS: usize = 8;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Log an infrastructure failure and hide it behind InternalError
pub(crate) fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Internal error: {e}");
    AppError::new(ErrorCode::InternalError)
}

/// Create the combined router
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let register = Router::new()
        .route("/user", post(user::register))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));

    let login = Router::new()
        .route("/user/login", post(user::login))
        .layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    let password_reset = Router::new()
        .route("/user/password-reset", post(user::request_password_reset))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            password_reset_rate_limit,
        ));

    // Public, no auth
    let public = Router::new()
        .route("/health-check", get(health::health_check))
        .route("/resources", get(resources::get_resources))
        .route(
            "/user/password-reset/confirm",
            post(user::confirm_password_reset),
        )
        .route("/trip", get(trip::feed))
        .route("/trip/sitemap", get(trip::sitemap))
        .route("/trip/info/{trip_id}", get(trip::info))
        .route("/trip/{trip_id}", get(trip::get_trip))
        .route("/trip/{trip_id}/images", get(trip::list_images))
        .route("/pack/{pack_id}", get(pack::get_pack))
        .route("/pack/trip/{trip_id}", get(pack::list_trip_packs))
        .merge(register)
        .merge(login)
        .merge(password_reset);

    let imports = Router::new()
        .route("/item/import", post(import::import_items))
        .route("/item/import/rows", post(import::import_item_rows))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_IMPORTS));

    // Bearer-token authenticated
    let authenticated = Router::new()
        .route("/user", get(user::get_profile).put(user::update_profile))
        .route("/user/avatar", post(image::upload_avatar))
        // Items
        .route("/item", post(item::create_item))
        .route("/items", get(item::list_items))
        .route("/item/sort", put(item::sort_items))
        .route(
            "/item/{item_id}",
            put(item::update_item).delete(item::delete_item),
        )
        .route("/item/{item_id}/image", post(image::upload_item_image))
        // Categories
        .route("/category", post(category::create_category))
        .route("/categories", get(category::list_categories))
        .route("/category/sort", put(category::sort_categories))
        .route("/category/{item_category_id}", put(category::update_category))
        // Catalog browsing
        .route("/catalog/brands", get(catalog::search_brands))
        .route("/catalog/brands/{brand_id}/products", get(catalog::list_products))
        .route(
            "/catalog/products/{product_id}/variants",
            get(catalog::list_variants),
        )
        // Packs
        .route("/packs", get(pack::list_packs))
        .route("/pack", post(pack::create_pack))
        .route(
            "/pack/{pack_id}",
            put(pack::update_pack).delete(pack::delete_pack),
        )
        .route("/pack/{pack_id}/item/{item_id}", put(pack::toggle_item))
        .route("/pack/{pack_id}/assign", put(pack::assign_pack))
        .route("/pack/{pack_id}/generate", post(pack::generate_trip))
        // Trips
        .route("/trips", get(trip::list_trips))
        .route("/trip", post(trip::create_trip))
        .route(
            "/trip/{trip_id}",
            put(trip::update_trip).delete(trip::delete_trip),
        )
        .route("/trip/{trip_id}/clone", post(trip::clone_trip))
        .route("/trip/{trip_id}/publish", put(trip::toggle_publish))
        .route("/trip/{trip_id}/upload-image", post(image::upload_trip_image))
        .route("/trip/{trip_id}/sort-photos", post(trip::sort_images))
        .route(
            "/trip/{trip_id}/image/{image_id}",
            put(trip::update_image).delete(trip::delete_image),
        )
        .route("/image/{image_id}", delete(image::delete_image))
        .merge(imports)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            user_auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors_layer(cors_origins))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = origins.to_vec();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .is_ok_and(|o| origins.iter().any(|allowed| origin_matches(allowed, o)))
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// `https://*.example.com` matches any subdomain of example.com over https
fn origin_matches(allowed: &str, origin: &str) -> bool {
    if let Some((scheme, domain)) = allowed.split_once("://*.") {
        return origin
            .strip_prefix(scheme)
            .and_then(|rest| rest.strip_prefix("://"))
            .and_then(|host| host.strip_suffix(domain))
            .is_some_and(|sub| sub.ends_with('.') && sub.len() > 1);
    }
    allowed == origin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_matches() {
        assert!(origin_matches("http://localhost:3000", "http://localhost:3000"));
        assert!(!origin_matches("http://localhost:3000", "http://localhost:5173"));
        assert!(origin_matches("https://*.packstack.io", "https://www.packstack.io"));
        assert!(!origin_matches("https://*.packstack.io", "https://packstack.io"));
        assert!(!origin_matches("https://*.packstack.io", "http://www.packstack.io"));
        assert!(!origin_matches("https://*.packstack.io", "https://evilpackstack.io"));
    }
}
