// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{common::response, config::AppState, handlers, middleware::auth::auth_guard};

pub fn app_router(app_state: AppState) -> Router {
    let lead_routes = Router::new()
        .route("/leads"
               ,get(handlers::leads::list_leads)
               .post(handlers::leads::create_lead)
        )
        .route("/leads/{id}"
               ,get(handlers::leads::get_lead)
               .put(handlers::leads::update_lead)
               .delete(handlers::leads::delete_lead)
        )
        .route("/leads/{id}/items"
               ,get(handlers::leads::list_items)
               .post(handlers::leads::add_item)
        )
        .route("/leads/{id}/items/{item_id}"
               ,put(handlers::leads::update_item)
               .delete(handlers::leads::remove_item)
        )
        .route("/leads/{id}/totals", get(handlers::leads::get_totals))
        .route("/leads/{id}/convert", post(handlers::leads::convert_lead))
        .route("/orders/{id}", get(handlers::orders::get_order));

    let metadata_routes = Router::new()
        .route("/metadata/refresh", post(handlers::metadata::refresh))
        .route("/metadata/customers/{id}/transporter", get(handlers::metadata::customer_transporter))
        .route("/metadata/{kind}", get(handlers::metadata::list_reference));

    // Tudo exige token, exceto o /health
    let protected = lead_routes
        .merge(metadata_routes)
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .route("/health", get(|| async { response::ok(json!({ "status": "ok" })) }))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
