//! Route definitions for the StudyHub HTTP API.
//!
//! All routes are organized by area and mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Multipart framing allowance on top of the configured upload limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    let api_routes = Router::new()
        .merge(base_routes())
        .merge(materials_routes())
        .merge(planner_routes())
        .merge(contact_routes())
        .merge(admin_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Health probe and the caller's own profile
fn base_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/me", get(handlers::profile::me))
}

/// Folder tree, files, and moves
fn materials_routes() -> Router<AppState> {
    use handlers::materials;

    Router::new()
        .route("/materials/tree", get(materials::get_tree))
        .route("/materials/search", get(materials::search))
        .route("/materials/folders", post(materials::create_folder))
        .route(
            "/materials/folders/{id}",
            get(materials::get_folder)
                .put(materials::update_folder)
                .delete(materials::delete_folder),
        )
        .route(
            "/materials/folders/{id}/breadcrumbs",
            get(materials::breadcrumbs),
        )
        .route("/materials/folders/{id}/files", post(materials::upload_file))
        .route(
            "/materials/folders/{id}/files/{file_id}",
            get(materials::download_file).delete(materials::delete_file),
        )
        .route("/materials/files/{file_id}/move", post(materials::move_file))
}

fn planner_routes() -> Router<AppState> {
    use handlers::planner;

    Router::new()
        .route("/planner", get(planner::get_user_data))
        .route("/planner/dashboard", get(planner::dashboard))
        .route("/planner/{section}", post(planner::add_entry))
        .route(
            "/planner/{section}/{index}",
            axum::routing::delete(planner::delete_entry),
        )
        .route(
            "/planner/{section}/{index}/progress",
            put(planner::set_progress),
        )
}

fn contact_routes() -> Router<AppState> {
    Router::new().route("/contact", post(handlers::contact::submit))
}

/// Admin panel; every handler requires the admin role
fn admin_routes() -> Router<AppState> {
    use handlers::admin;

    Router::new()
        .route("/admin/users", get(admin::list_users))
        .route(
            "/admin/users/{id}",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/admin/folders", get(admin::list_folders))
        .route(
            "/admin/folders/{id}",
            put(admin::update_folder).delete(admin::delete_folder),
        )
        .route("/admin/stats", get(admin::stats))
        .route("/admin/contact", get(admin::list_contact))
        .route("/admin/contact/{id}", put(admin::set_contact_status))
}
