use crate::{
    handlers::{
        create_medicine, delete_medicine, get_medicine, list_medicines, login_handler,
        logout_handler, register_handler, search_medicines, update_medicine,
    },
    middleware::auth,
    AppState,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_handler))
        .route("/register", post(register_handler))
        .route("/logout", post(logout_handler))
}

/// Catalog routes; every one sits behind the JWT middleware.
pub fn medicine_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_medicines).post(create_medicine))
        .route("/search", get(search_medicines))
        .route(
            "/:id",
            get(get_medicine).put(update_medicine).delete(delete_medicine),
        )
        .route_layer(middleware::from_fn_with_state(state, auth))
}
