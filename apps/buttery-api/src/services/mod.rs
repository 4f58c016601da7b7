//! HTTP handlers, one module per resource.
//!
//! Each module exposes `routes()`; [`crate::build_router`] merges them.

pub mod auth_service;
pub mod catalog_service;
pub mod health_service;
pub mod inventory_service;
pub mod product_service;
pub mod report_service;
pub mod sale_service;
pub mod user_service;
