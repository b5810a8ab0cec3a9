//! # API Shared
//!
//! Shared request/response definitions for the Regu-Biz HTTP API.
//!
//! Contains:
//! - Wire DTOs (`dto` module) with `serde` and `utoipa` schemas
//! - Conversions from core domain values into those DTOs
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the `regubiz-run` binary.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
