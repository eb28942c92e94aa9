use crate::handlers::{book, escrow, order, trades};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/orders", post(order::submit_order))
        .route(
            "/orders/{fingerprint}",
            get(order::get_order).delete(order::cancel_order),
        )
        .route("/book/{base}/{quote}", get(book::get_book))
        .route("/trades", get(trades::get_trades))
        .route("/escrow", post(escrow::create_instance))
        .route("/escrow/balances", post(escrow::fund_party))
        .route("/escrow/{id}", get(escrow::get_instance))
        .route("/escrow/{id}/deposit", post(escrow::deposit))
        .route("/escrow/{id}/confirm", post(escrow::confirm))
        .route("/escrow/{id}/release", post(escrow::release))
        .route("/escrow/{id}/refund", post(escrow::refund))
        .route("/escrow/{id}/events", get(escrow::get_events));

    Router::new()
        .nest("/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
