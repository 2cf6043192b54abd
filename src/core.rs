//! Core abstractions for the shop-floor gateway.
//!
//! This module provides the foundational types that all protocol subsystems
//! build on: the decoded value model and the crate-wide error type.

pub mod data;
pub mod error;

pub use data::*;
pub use error::{GatewayError, Result};
