use axum::{
    Router,
    routing::{get, post},
};

pub mod build;
pub mod catalog;
pub mod stock;
pub mod system;

/// Router for the inventory and build endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/stock", get(stock::list_stock).post(stock::add_stock))
        .route("/build", post(build::attempt_build))
        .route("/build/check", post(build::check_build))
        .route("/builds", get(build::list_builds))
        .route("/catalog", get(catalog::get_catalog))
        .route("/options/colors", get(catalog::color_options))
        .route("/options/backplates", get(catalog::backplate_options))
        .route("/options/thickness", get(catalog::thickness_options))
        .route("/options/storage", get(catalog::storage_options))
        .route("/options/batteries", get(catalog::battery_options))
}
