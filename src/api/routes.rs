//! API route configuration.

use crate::api::handlers::{
    add_item_handler, analytics_handler, clicks_over_time_handler, create_link_handler,
    create_list_handler, delete_item_handler, delete_link_handler, delete_list_handler,
    get_link_handler, get_list_handler, list_links_handler, list_lists_handler, overview_handler,
    top_items_handler, top_links_handler, track_click_handler, update_item_handler,
    update_link_handler, update_list_handler,
};
use crate::api::middleware::admission;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

/// Management and analytics routes.
///
/// # Endpoints
///
/// - `GET    /analytics`               - Overview, daily series, leaderboards
/// - `GET    /analytics/overview`      - Summary totals
/// - `GET    /analytics/clicks`        - Daily click series
/// - `GET    /analytics/top-links`     - Short links by clicks
/// - `GET    /analytics/top-items`     - List items by clicks
/// - `GET    /links`, `POST /links`    - List / create short links
/// - `GET    /links/{id}`              - Fetch one link
/// - `PATCH  /links/{id}`, `DELETE`    - Update / delete a link
/// - `GET    /lists`, `POST /lists`    - List / create pages
/// - `GET    /lists/{id}`, `PUT`, `DELETE` - Fetch / update / delete a page
/// - `POST   /lists/{id}/items`        - Append an item
/// - `PATCH  /list-items/{id}`, `DELETE` - Update / delete an item
pub fn management_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(analytics_handler))
        .route("/analytics/overview", get(overview_handler))
        .route("/analytics/clicks", get(clicks_over_time_handler))
        .route("/analytics/top-links", get(top_links_handler))
        .route("/analytics/top-items", get(top_items_handler))
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/lists", get(list_lists_handler).post(create_list_handler))
        .route(
            "/lists/{id}",
            get(get_list_handler)
                .put(update_list_handler)
                .delete(delete_list_handler),
        )
        .route("/lists/{id}/items", post(add_item_handler))
        .route(
            "/list-items/{id}",
            patch(update_item_handler).delete(delete_item_handler),
        )
}

/// Public click tracking, behind the tracking admission policy.
pub fn tracking_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/track-click/{item_id}", post(track_click_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admission::track_guard,
        ))
}
