//! # Navratna API Library
//!
//! REST/JSON service for the gemstone trading back office.
//!
//! ## Module Organization
//! ```text
//! navratna_api/
//! ├── lib.rs            ◄─── You are here (state & router)
//! ├── config.rs         ◄─── Environment configuration
//! ├── error.rs          ◄─── ApiError + JSON/query extractors
//! ├── invoice.rs        ◄─── Sale invoice JSON + printable A4 HTML
//! └── routes/
//!     ├── inventory.rs, clients.rs, suppliers.rs   ◄─── CRUD
//!     ├── sales.rs      ◄─── Sales + invoices
//!     ├── certifications.rs, consultations.rs, tasks.rs
//!     ├── calculators.rs, astrological.rs, demand.rs
//!     ├── tax.rs        ◄─── HSN, GST, filing calendar, invoice preview
//!     ├── dashboard.rs
//!     └── health.rs
//! ```
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP request                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer (request span) ─► CorsLayer                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Handler ─► navratna-core (validation, arithmetic)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  navratna-db repository ─► SQLite                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Json<T>  or  ApiError { code, message }                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod invoice;
pub mod routes;

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use navratna_db::Database;

pub use config::{Config, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    let crud = Router::new()
        .route(
            "/api/inventory",
            get(routes::inventory::list).post(routes::inventory::create),
        )
        .route(
            "/api/inventory/:id",
            get(routes::inventory::get)
                .put(routes::inventory::update)
                .delete(routes::inventory::delete),
        )
        .route(
            "/api/inventory/:id/certifications",
            get(routes::certifications::list_for_stone),
        )
        .route(
            "/api/clients",
            get(routes::clients::list).post(routes::clients::create),
        )
        .route(
            "/api/clients/:id",
            get(routes::clients::get)
                .put(routes::clients::update)
                .delete(routes::clients::delete),
        )
        .route("/api/clients/:id/sales", get(routes::sales::list_for_client))
        .route(
            "/api/clients/:id/consultations",
            get(routes::consultations::list_for_client),
        )
        .route(
            "/api/suppliers",
            get(routes::suppliers::list).post(routes::suppliers::create),
        )
        .route(
            "/api/suppliers/:id",
            get(routes::suppliers::get)
                .put(routes::suppliers::update)
                .delete(routes::suppliers::delete),
        )
        .route(
            "/api/sales",
            get(routes::sales::list).post(routes::sales::create),
        )
        .route(
            "/api/sales/:id",
            get(routes::sales::get)
                .put(routes::sales::update)
                .delete(routes::sales::delete),
        )
        .route("/api/sales/:id/invoice", get(routes::sales::invoice))
        .route("/api/sales/:id/invoice.html", get(routes::sales::invoice_html))
        .route(
            "/api/certifications",
            get(routes::certifications::list).post(routes::certifications::create),
        )
        .route(
            "/api/certifications/:id",
            get(routes::certifications::get)
                .put(routes::certifications::update)
                .delete(routes::certifications::delete),
        )
        .route(
            "/api/certifications/:id/advance",
            post(routes::certifications::advance),
        )
        .route(
            "/api/consultations",
            get(routes::consultations::list).post(routes::consultations::create),
        )
        .route(
            "/api/consultations/follow-ups",
            get(routes::consultations::follow_ups),
        )
        .route(
            "/api/consultations/:id",
            get(routes::consultations::get)
                .put(routes::consultations::update)
                .delete(routes::consultations::delete),
        )
        .route(
            "/api/tasks",
            get(routes::tasks::list).post(routes::tasks::create),
        )
        .route("/api/tasks/overdue", get(routes::tasks::overdue))
        .route(
            "/api/tasks/:id",
            get(routes::tasks::get)
                .put(routes::tasks::update)
                .delete(routes::tasks::delete),
        );

    let tools = Router::new()
        .route("/api/calculators/valuation", post(routes::calculators::valuation))
        .route("/api/calculators/bulk-quote", post(routes::calculators::bulk_quote))
        .route(
            "/api/calculators/bulk-optimize",
            post(routes::calculators::bulk_optimize),
        )
        .route(
            "/api/calculators/quality-compare",
            post(routes::calculators::quality_compare),
        )
        .route("/api/calculators/margin", post(routes::calculators::margin))
        .route(
            "/api/astrological/zodiac/:sign",
            get(routes::astrological::zodiac),
        )
        .route(
            "/api/astrological/planet/:planet",
            get(routes::astrological::planet),
        )
        .route(
            "/api/astrological/recommend",
            post(routes::astrological::recommend),
        )
        .route(
            "/api/analysis/:inventory_id",
            post(routes::astrological::analyze),
        )
        .route("/api/demand/:gem_type", get(routes::demand::forecast))
        .route("/api/tax/hsn", get(routes::tax::hsn_codes))
        .route("/api/tax/gst", post(routes::tax::gst))
        .route("/api/tax/calendar", get(routes::tax::calendar))
        .route("/api/invoice/preview", post(routes::tax::invoice_preview))
        .route("/api/dashboard", get(routes::dashboard::dashboard));

    Router::new()
        .merge(crud)
        .merge(tools)
        .merge(routes::health::health_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            warn!("NAVRATNA_CORS_ORIGIN is not a valid header value, allowing any origin");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
