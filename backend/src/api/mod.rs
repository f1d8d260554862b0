//! HTTP API module.
//!
//! This module provides the HTTP server, its JSON types and logging setup.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::init_logging;
pub use server::{router, start_server};
pub use types::*;
