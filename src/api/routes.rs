//! Shorty resource route configuration.

use crate::api::handlers::{
    create_shorty_handler, delete_shorty_by_pair_handler, delete_shorty_handler,
    find_shorty_handler, get_shorty_handler, list_shorties_handler, update_shorty_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Routes for the shorty resource, mounted under `/api/shorties`.
///
/// # Endpoints
///
/// - `GET    /`       - List resources (filter + pagination)
/// - `POST   /`       - Create a resource
/// - `DELETE /`       - Delete a resource by its `uid` + `url` pair (body)
/// - `GET    /find`   - First resource matching a filter
/// - `GET    /{id}`   - Retrieve a resource
/// - `PATCH  /{id}`   - Partially update a resource
/// - `DELETE /{id}`   - Delete a resource
pub fn shorty_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_shorties_handler)
                .post(create_shorty_handler)
                .delete(delete_shorty_by_pair_handler),
        )
        .route("/find", get(find_shorty_handler))
        .route(
            "/{id}",
            get(get_shorty_handler)
                .patch(update_shorty_handler)
                .delete(delete_shorty_handler),
        )
}
