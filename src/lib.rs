//! # Shop-Floor Gateway (sfgw)
//!
//! A protocol library for industrial shop-floor-to-cloud data collection,
//! providing wire-level decoders that turn raw device data into typed
//! values.
//!
//! ## Features
//!
//! - **Typed decoding**: raw payloads become [`PhysicalValue`]s sized to
//!   the decoded field
//! - **Best-effort database parsing**: malformed entries are skipped, not
//!   fatal
//! - **Pure decode path**: no I/O, no locking, safe for concurrent use
//! - **Feature gated**: compile only the protocols you need
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sfgw::protocols::can::j1939::J1939Dbc;
//!
//! // Parse the DBC database once at startup.
//! let mut dbc = J1939Dbc::new("config/engine.dbc");
//! dbc.load()?;
//!
//! // For each frame delivered by the transport:
//! let decoded = dbc.database().decode_frame(can_id, &payload);
//! ```
//!
//! ## Supported Protocols
//!
//! | Protocol | Feature | Status |
//! |----------|---------|--------|
//! | J1939 (CAN bus) | `j1939` | Available |
//! | Modbus TCP | - | Planned |
//! | OPC UA | - | Planned |

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod core;

#[cfg(feature = "j1939")]
#[cfg_attr(docsrs, doc(cfg(feature = "j1939")))]
pub mod protocols;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        data::PhysicalValue,
        error::{GatewayError, Result},
    };

    #[cfg(feature = "j1939")]
    pub use crate::protocols::can::j1939::{J1939Database, J1939Dbc};
}

// Re-export core types at crate root for convenience
pub use crate::core::data::PhysicalValue;
pub use crate::core::error::{GatewayError, Result};
