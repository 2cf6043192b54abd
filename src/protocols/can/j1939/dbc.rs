//! DBC database loading and lookup tables.
//!
//! The parser consumes the line-oriented DBC text format and recognizes
//! three line shapes: message definitions (`BO_`), signal definitions
//! (`SG_`) attached to the most recently opened message, and SPN attribute
//! bindings (`BA_ "SPN" SG_`). Everything else is ignored. A line whose
//! prefix matches but whose fields do not parse is skipped with a
//! diagnostic; only an unreadable file aborts a load.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::data::PhysicalValue;
use crate::core::error::{GatewayError, Result};

use super::decoder::decode_signal;
use super::descriptor::{ByteOrder, J1939Message, J1939Signal, J1939Spn, ValueType};
use super::identifier::extract_pgn;

const MESSAGE_PREFIX: &str = "BO_";
const SIGNAL_PREFIX: &str = "SG_";
const SPN_PREFIX: &str = "BA_ \"SPN\" SG_";

static MESSAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // BO_ <id> <name>: <dlc> <source>
    Regex::new(r#"BO_\s+(\d+)\s+(\w+):\s*(\d+)\s+(\w+)"#).expect("message pattern")
});

static SIGNAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // SG_ <name> : <start>|<length>@<order><sign> (<factor>,<offset>) [<min>|<max>] "<unit>" <receivers>
    Regex::new(
        r#"SG_\s+(\S+)\s+:\s*(\d+)\|(\d+)(@[01])([+-])\s*\(([-+]?[0-9]*\.?[0-9]+),([-+]?[0-9]*\.?[0-9]+)\)\s*\[([-+]?[0-9]*\.?[0-9]+)\|([-+]?[0-9]*\.?[0-9]+)\]\s*"([^"]*)"\s*(\S.*)"#,
    )
    .expect("signal pattern")
});

static SPN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // BA_ "SPN" SG_ <message id> <name> <spn id>;
    Regex::new(r#"BA_\s"SPN"\sSG_\s(\d+)\s(\w+)\s(\d+);"#).expect("SPN pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    ReadMessage,
    ReadSignals,
}

/// One signal decoded from a full CAN frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedSignal {
    /// Signal name from the database.
    pub name: String,
    /// SPN bound to the signal, when the database carries a binding.
    pub spn: Option<u32>,
    /// Decoded physical value.
    pub value: PhysicalValue,
}

/// Lookup tables built from a DBC file.
///
/// The tables are immutable once built; share them freely across readers
/// and rebuild the whole value to pick up a new file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct J1939Database {
    /// Messages keyed by derived PGN.
    pgn_by_pgn: HashMap<u32, J1939Message>,
    /// The literal CAN identifier each PGN was derived from. The PGN
    /// derivation is lossy for PDU1 identifiers, so SPN lookups need the
    /// literal id back.
    can_id_by_pgn: HashMap<u32, u32>,
    /// SPN bindings keyed by raw CAN identifier, then by SPN id.
    spn_by_message: HashMap<u32, HashMap<u32, J1939Spn>>,
}

impl J1939Database {
    /// Build a database from DBC text.
    ///
    /// Malformed `BO_`/`SG_`/`BA_` lines are skipped with a diagnostic;
    /// unrecognized lines are ignored. Text that contains no recognizable
    /// entries yields an empty database.
    pub fn from_dbc_str(text: &str) -> Self {
        let mut db = Self::default();
        let mut state = ParseState::ReadMessage;
        let mut candidate: Option<J1939Message> = None;

        for raw_line in text.lines() {
            let line = raw_line.trim();

            match state {
                ParseState::ReadMessage => {
                    if line.starts_with(MESSAGE_PREFIX) {
                        if let Some(message) = parse_message_line(line) {
                            candidate = Some(message);
                            state = ParseState::ReadSignals;
                        }
                    }
                }
                ParseState::ReadSignals => {
                    let appended = line.starts_with(SIGNAL_PREFIX)
                        && match parse_signal_line(line) {
                            Some(signal) => {
                                if let Some(message) = candidate.as_mut() {
                                    message.add_signal(signal);
                                }
                                true
                            }
                            None => false,
                        };

                    if !appended {
                        state = ParseState::ReadMessage;
                        db.commit(candidate.take());
                    }
                }
            }

            // SPN bindings are matched on every line, independent of the
            // message state machine.
            if line.starts_with(SPN_PREFIX) {
                if let Some(spn) = parse_spn_line(line) {
                    db.spn_by_message
                        .entry(spn.message_id)
                        .or_default()
                        .insert(spn.spn, spn);
                }
            }
        }

        // A message still open at end of input is committed the same way.
        db.commit(candidate.take());

        db
    }

    fn commit(&mut self, candidate: Option<J1939Message>) {
        if let Some(message) = candidate {
            if message.signals.is_empty() {
                #[cfg(feature = "tracing-support")]
                tracing::debug!(
                    message = %message.name,
                    can_id = message.can_id,
                    "Discarding message without signals"
                );
                return;
            }
            // Last write wins when two identifiers derive the same PGN.
            self.can_id_by_pgn.insert(message.pgn, message.can_id);
            self.pgn_by_pgn.insert(message.pgn, message);
        }
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Look up the message matching a raw CAN identifier.
    ///
    /// The identifier is reduced to its PGN first, so any source address
    /// (and, for PDU1 frames, any destination address) matches.
    pub fn message_by_can_id(&self, can_id: u32) -> Option<&J1939Message> {
        self.message_by_pgn(extract_pgn(can_id))
    }

    /// Look up a message by PGN.
    pub fn message_by_pgn(&self, pgn: u32) -> Option<&J1939Message> {
        self.pgn_by_pgn.get(&pgn)
    }

    /// Look up a message by name (linear scan).
    pub fn message_by_name(&self, name: &str) -> Option<&J1939Message> {
        self.pgn_by_pgn.values().find(|m| m.name == name)
    }

    /// Look up an SPN binding by PGN and SPN id.
    pub fn spn_by_id(&self, pgn: u32, spn_id: u32) -> Option<&J1939Spn> {
        let message_id = self.can_id_by_pgn.get(&pgn)?;
        self.spn_by_message.get(message_id)?.get(&spn_id)
    }

    /// All SPN bindings for a PGN, keyed by SPN id.
    pub fn spns_for_pgn(&self, pgn: u32) -> Option<&HashMap<u32, J1939Spn>> {
        let message_id = self.can_id_by_pgn.get(&pgn)?;
        self.spn_by_message.get(message_id)
    }

    /// Number of messages in the database.
    pub fn pgn_count(&self) -> usize {
        self.pgn_by_pgn.len()
    }

    /// Number of SPN bindings in the database.
    pub fn spn_count(&self) -> usize {
        self.spn_by_message.values().map(|m| m.len()).sum()
    }

    /// Check whether the database holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.pgn_by_pgn.is_empty() && self.spn_by_message.is_empty()
    }

    /// Decode every signal of the message matching a raw CAN identifier.
    ///
    /// Signals that do not fit the payload, carry the "not available"
    /// sentinel or fall outside their physical range are skipped. Each
    /// decoded signal carries its SPN when the database binds one to the
    /// signal name. An unknown identifier yields an empty vector.
    pub fn decode_frame(&self, can_id: u32, payload: &[u8]) -> Vec<DecodedSignal> {
        let Some(message) = self.message_by_can_id(can_id) else {
            return Vec::new();
        };
        let bindings = self.spn_by_message.get(&message.can_id);

        message
            .signals
            .iter()
            .filter_map(|signal| {
                let value = decode_signal(signal, payload, true)?;
                let spn = bindings
                    .and_then(|map| map.values().find(|b| b.name == signal.name))
                    .map(|b| b.spn);
                Some(DecodedSignal {
                    name: signal.name.clone(),
                    spn,
                    value,
                })
            })
            .collect()
    }
}

// ============================================================================
// Line parsers
// ============================================================================

fn parse_message_line(line: &str) -> Option<J1939Message> {
    let parsed = MESSAGE_PATTERN.captures(line).and_then(|captures| {
        // dlc (group 3) and source (group 4) are matched but not used.
        let can_id: u32 = captures[1].parse().ok()?;
        Some(J1939Message::new(&captures[2], can_id))
    });

    #[cfg(feature = "tracing-support")]
    if parsed.is_none() {
        tracing::warn!(line = %line, "Skipping malformed message line");
    }

    parsed
}

fn parse_signal_line(line: &str) -> Option<J1939Signal> {
    let parsed = SIGNAL_PATTERN.captures(line).and_then(signal_from_captures);

    #[cfg(feature = "tracing-support")]
    if parsed.is_none() {
        tracing::warn!(line = %line, "Skipping malformed signal line");
    }

    parsed
}

fn signal_from_captures(captures: regex::Captures<'_>) -> Option<J1939Signal> {
    Some(J1939Signal {
        name: captures[1].to_string(),
        start_bit: captures[2].parse().ok()?,
        length: captures[3].parse().ok()?,
        byte_order: if &captures[4] == "@1" {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        },
        value_type: if &captures[5] == "+" {
            ValueType::Unsigned
        } else {
            ValueType::Signed
        },
        factor: captures[6].parse().ok()?,
        offset: captures[7].parse().ok()?,
        minimum: captures[8].parse().ok()?,
        maximum: captures[9].parse().ok()?,
        // unit (group 10) and receivers (group 11) are not used.
    })
}

fn parse_spn_line(line: &str) -> Option<J1939Spn> {
    let parsed = SPN_PATTERN.captures(line).and_then(|captures| {
        Some(J1939Spn {
            message_id: captures[1].parse().ok()?,
            name: captures[2].to_string(),
            spn: captures[3].parse().ok()?,
        })
    });

    #[cfg(feature = "tracing-support")]
    if parsed.is_none() {
        tracing::warn!(line = %line, "Skipping malformed SPN line");
    }

    parsed
}

// ============================================================================
// Loader
// ============================================================================

/// A DBC file and the database built from it.
///
/// `load` may be called again at any time to re-read the file; the
/// published tables are cleared before the file is touched, so a failed
/// read leaves the database empty rather than stale. Reloading needs
/// `&mut self`, which keeps loads and lookups from overlapping.
#[derive(Debug)]
pub struct J1939Dbc {
    path: PathBuf,
    database: J1939Database,
}

impl J1939Dbc {
    /// Create a loader for the given DBC file. No I/O happens until
    /// [`load`](Self::load) is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            database: J1939Database::default(),
        }
    }

    /// The path this loader reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The currently published database. Empty until the first successful
    /// [`load`](Self::load).
    pub fn database(&self) -> &J1939Database {
        &self.database
    }

    /// Read and parse the DBC file, replacing the published tables.
    ///
    /// The previous tables are cleared before the file is read. An
    /// unreadable file is the only fatal condition; a readable file with
    /// no recognizable content publishes an empty database.
    pub fn load(&mut self) -> Result<&J1939Database> {
        #[cfg(feature = "tracing-support")]
        tracing::info!(path = %self.path.display(), "Loading DBC file");

        self.database = J1939Database::default();

        let text = fs::read_to_string(&self.path).map_err(|source| GatewayError::DbcRead {
            path: self.path.display().to_string(),
            source,
        })?;

        self.database = J1939Database::from_dbc_str(&text);

        #[cfg(feature = "tracing-support")]
        tracing::info!(
            path = %self.path.display(),
            pgn_count = self.database.pgn_count(),
            spn_count = self.database.spn_count(),
            "Loaded DBC database"
        );

        Ok(&self.database)
    }
}
