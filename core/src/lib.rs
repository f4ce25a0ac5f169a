//! Client core for the job board API.
//!
//! # Overview
//! Fetches job listings, companies and labor-market distributions from a
//! REST backend, normalizes the backend's varying list shapes, and keeps the
//! results in a client-side store that a view layer reads from.
//!
//! # Design
//! - `JobsClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse` (host-does-IO pattern).
//! - `Transport` is the single effect executor; `ReqwestTransport` is the
//!   production one, tests script their own.
//! - `normalize` turns any list response into `(items, total)`.
//! - `Store` holds `AppState`, changes it only through `Mutation`s, and
//!   exposes the async actions.
//! - `routes` maps paths to views and keeps the document title.
//! - DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod options;
pub mod routes;
pub mod store;
pub mod transport;
pub mod types;

pub use client::JobsClient;
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use normalize::{normalize, Page};
pub use routes::{Router, View};
pub use store::{AppState, Mutation, Store};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    AnalysisKind, Company, FilterPatch, Filters, Job, OptionField, Pagination, PaginationPatch,
    SelectOption,
};

/// A store wired to the network from configuration.
pub fn connect(config: &ApiConfig) -> Result<Store<ReqwestTransport>, TransportError> {
    let transport = ReqwestTransport::new(config.timeout())?;
    Ok(Store::new(JobsClient::new(&config.base_url()), transport))
}
