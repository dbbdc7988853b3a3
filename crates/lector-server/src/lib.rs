#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::handler::{Error, ErrorKind, Result, routes};
pub use crate::middleware::{MiddlewareConfig, RouterMiddlewareExt};
pub use crate::service::{ServiceConfig, ServiceError, ServiceState};

/// Tracing target for handler operations.
pub const TRACING_TARGET_HANDLER: &str = "lector_server::handler";

/// Tracing target for middleware operations.
pub const TRACING_TARGET_MIDDLEWARE: &str = "lector_server::middleware";
