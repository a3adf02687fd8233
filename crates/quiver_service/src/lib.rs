//! Transport-agnostic package service.
//!
//! [`PackageService`] owns the configuration, the marker set, the code
//! transformer and the current [`Registry`](quiver_registry::Registry). It
//! answers [`ResolveRequest`]s either with a structured [`ResolveResponse`]
//! or with an assembled [`Bundle`](quiver_bundle::Bundle), and can reload
//! its sources at any time without disturbing resolutions in flight.

#![warn(missing_docs)]

pub mod error;
pub mod request;
pub mod service;

pub use error::ServiceError;
pub use request::{DeliveredPackage, RequestPath, ResolveRequest, ResolveResponse};
pub use service::PackageService;
