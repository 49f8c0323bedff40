//! Quote Server
//!
//! HTTP surface over quote sessions. The caller is identified by the
//! `x-user-id` header; every document route checks ownership.
//!
//! # Routes
//!
//! - `POST /quotes`: create from company info (201, 400 on validation)
//! - `GET /quotes/{id}`: fetch (404 absent, 403 not owner)
//! - `PATCH /quotes/{id}`: apply a partial update and commit (204, 409 while saving)
//! - `GET /quotes?owner=`: list the caller's quotes
//! - `GET /quotes/{id}/preview`: formatted preview
//! - `GET /healthz`

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use quote_document::MemoryStore;
use std::sync::Arc;

pub use config::{ConfigError, LogFormat, ServerConfig};
pub use error::ApiError;
pub use handlers::USER_HEADER;
pub use state::AppState;

/// Build the REST API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/quotes",
            post(handlers::create_quote).get(handlers::list_quotes),
        )
        .route(
            "/quotes/{id}",
            get(handlers::get_quote).patch(handlers::patch_quote),
        )
        .route("/quotes/{id}/preview", get(handlers::preview_quote))
        .with_state(state)
}

/// Router backed by an in-memory store
pub fn app(config: &ServerConfig) -> Router {
    router(AppState::new(
        Arc::new(MemoryStore::new()),
        config.quote.clone(),
    ))
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
