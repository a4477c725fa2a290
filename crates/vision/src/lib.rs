//! Upstream gateway for the Face++ vision API.
//!
//! One authenticated request per analysis, no retries. Failures are mapped
//! onto the closed [`UpstreamError`] set before they reach the HTTP layer.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::{Credentials, FaceppClient};
pub use error::{GatewayError, UpstreamError};
pub use gateway::VisionGateway;
