//! HTTP route composition.
//!
//! | Method | Path                      | Handler                 |
//! |--------|---------------------------|-------------------------|
//! | GET    | /products                 | full catalog            |
//! | POST   | /products                 | create product          |
//! | GET    | /products/on-sale         | sale listing            |
//! | GET    | /products/{id}            | point read              |
//! | PUT    | /products/{id}            | shallow update          |
//! | DELETE | /products/{id}            | delete                  |
//! | GET    | /products/{id}/related    | same-type products      |
//! | GET    | /categories               | distinct categories     |
//! | GET    | /brands                   | distinct brands         |
//! | GET    | /revalidate               | cache status            |
//! | POST   | /revalidate               | force refresh           |
//! | DELETE | /revalidate               | clear cache             |
//!
//! `/products/on-sale` is registered alongside `/products/{id}`; the static
//! segment takes precedence over the capture.

mod products;
mod revalidate;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the API router. State is attached by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index).post(products::create))
        .route("/products/on-sale", get(products::on_sale))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/products/{id}/related", get(products::related))
        .route("/categories", get(products::categories))
        .route("/brands", get(products::brands))
        .route(
            "/revalidate",
            get(revalidate::status)
                .post(revalidate::refresh)
                .delete(revalidate::clear),
        )
}
