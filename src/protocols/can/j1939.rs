//! SAE J1939 decoding for CAN bus data.
//!
//! This module turns raw CAN frames into typed physical values:
//!
//! - **Identifier decomposition**: splits a 29-bit CAN identifier into
//!   priority, PGN, source and destination address ([`parse_can_id`],
//!   [`extract_pgn`]).
//! - **DBC database**: parses the DBC text format into message, signal and
//!   SPN lookup tables ([`J1939Dbc`], [`J1939Database`]).
//! - **Signal decoding**: extracts a signal's bits from a payload and
//!   scales them to a physical value ([`decode_signal`]).
//!
//! The database is built once (or on demand) and then read concurrently;
//! decoding itself is pure and needs no synchronization. Frame I/O is not
//! handled here: callers feed `(can_id, payload)` pairs from whatever
//! transport they use.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfgw::protocols::can::j1939::J1939Dbc;
//!
//! let mut dbc = J1939Dbc::new("config/engine.dbc");
//! dbc.load()?;
//!
//! // From the frame source: identifier + payload.
//! for decoded in dbc.database().decode_frame(0x0CF00400, &payload) {
//!     println!("{} (SPN {:?}) = {:?}", decoded.name, decoded.spn, decoded.value);
//! }
//! ```

mod dbc;
mod decoder;
mod descriptor;
mod identifier;

pub use dbc::{DecodedSignal, J1939Database, J1939Dbc};
pub use decoder::decode_signal;
pub use descriptor::{ByteOrder, J1939Message, J1939Signal, J1939Spn, ValueType};
pub use identifier::{extract_pgn, extract_source_address, parse_can_id, CanFrameId};
