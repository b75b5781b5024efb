//! HTTP API for fasting plan records.
//!
//! # Overview
//! Four JSON endpoints under `/fasting/plans` (list, create, update, delete),
//! each a single call into the record store, plus placeholder auth routes under
//! `/api/auth`. The store is opened once at startup from `DATABASE_URL` and
//! handed to the router through [`AppState`].

pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod routes;
pub mod schema;
pub mod serve;
pub mod store;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

pub use error::{AppError, MessageResponse};
pub use models::{FastingPlan, NewUser, PlanChanges, PlanId, PlanInput, User};
pub use store::{Database, PlanStore, StoreError, UserStore};

/// Shared by every handler; cloning only bumps the store's refcount.
#[derive(Clone)]
pub struct AppState {
    pub plans: Arc<dyn PlanStore>,
}

impl AppState {
    pub fn new(database: &Database) -> Self {
        Self {
            plans: Arc::clone(&database.plans),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(&Database::in_memory())
    }
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
