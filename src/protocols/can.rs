//! CAN bus protocol support.
//!
//! Shop-floor devices on a CAN bus are read through higher-level protocols
//! layered on the raw frames. This module hosts those decoders; transports
//! (SocketCAN or otherwise) live with the application, which feeds raw
//! `(identifier, payload)` pairs into the decoders here.

pub mod j1939;

pub use j1939::{J1939Database, J1939Dbc};
