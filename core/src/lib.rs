//! Synchronous client core for the fasting plans service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host supplies a
//! [`Transport`] that performs the actual round-trip, so everything above it
//! is deterministic and testable with closures.
//!
//! # Design
//! - `PlanClient` is stateless and holds only the base URL.
//! - Each CRUD operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `PlanApi` pairs a client with a transport; every call returns
//!   `Result<T, ApiError>` and never panics on a response.
//! - The `ui` module holds form and list state on top of `PlanApi`, refetching
//!   the full list after every mutation.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod types;
pub mod ui;

pub use api::PlanApi;
pub use client::PlanClient;
pub use error::{ApiError, ErrorCode};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use types::{FastingPlan, Message, NewPlan, PlanUpdate};
