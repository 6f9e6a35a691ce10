//! Synchronous client core for the accounts API.
//!
//! # Overview
//! Two layers: `Endpoint` resolves a URL template, query parameters and body
//! into an `HttpRequest` and hands it to an injected `HttpTransport`;
//! `AccountClient` composes one endpoint per operation, encodes and decodes
//! the `{"data": ...}` envelope and maps status codes to `ApiError`.
//!
//! # Design
//! - The core depends only on the `HttpTransport` trait. `UreqTransport`
//!   (feature `ureq`, on by default) is the bundled implementation.
//! - Clients and endpoints are immutable after construction.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use client::AccountClient;
pub use config::{ClientConfig, ConfigError, Environment};
pub use endpoint::{Endpoint, RequestOptions};
pub use error::{ApiError, ParamError, Result};
pub use http::{Body, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Account, AccountAttributes, AccountData};
