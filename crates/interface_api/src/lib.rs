//! HTTP API Layer
//!
//! This crate provides the REST API for the vehicle-service billing system
//! using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for bills and health checks
//! - **Middleware**: JWT authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects in the client wire format
//! - **Error Handling**: Consistent `status`/`error` envelopes
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let service = BillService::new(Arc::new(PostgresBillAdapter::new(pool)));
//! let app = create_router(AppState::new(service, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_billing::BillService;

use crate::config::ApiConfig;
use crate::handlers::{bill, health};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub bills: Arc<BillService>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(bills: BillService, config: ApiConfig) -> Self {
        Self {
            bills: Arc::new(bills),
            config,
        }
    }
}

/// Creates the main API router
///
/// `/health` and `/health/ready` are public; every bill route requires a
/// bearer token.
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Protected bill routes
    let bill_routes = Router::new()
        .route("/bill", post(bill::create_bill))
        .route(
            "/bill/:id",
            get(bill::get_bill).put(bill::update_bill).delete(bill::delete_bill),
        )
        .route("/bills", get(bill::list_bills))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(bill_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
