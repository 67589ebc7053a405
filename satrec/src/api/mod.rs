//! HTTP transport layer.
//!
//! Thin translation between the request/response protocol and the
//! recorder/scheduler services. All business rules live in the
//! services; validation here is defense-in-depth only.

pub mod error;
pub mod models;
pub mod routes;
pub mod server;
