//! Signal and message descriptors parsed from a DBC database.

use serde::{Deserialize, Serialize};

use super::identifier::extract_pgn;

/// Byte order of a signal on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Intel byte order, `@1` in DBC notation.
    LittleEndian,
    /// Motorola byte order, `@0` in DBC notation.
    BigEndian,
}

/// Signedness of a signal's raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// `+` in DBC notation.
    Unsigned,
    /// `-` in DBC notation.
    Signed,
}

/// A decodable signal within a CAN message.
///
/// `start_bit` uses the DBC bit numbering; the decoder maps it onto the
/// payload with reversed byte and bit indexing. `minimum` and `maximum`
/// bound the physical (scaled) value; they are taken from the database as-is
/// and not validated against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct J1939Signal {
    /// Signal name, unique within its message.
    pub name: String,
    /// Start bit position in DBC numbering.
    pub start_bit: u16,
    /// Number of bits occupied, 1 to 64.
    pub length: u8,
    /// Wire byte order.
    pub byte_order: ByteOrder,
    /// Raw value signedness.
    pub value_type: ValueType,
    /// Scale applied to the raw value.
    pub factor: f64,
    /// Shift applied after scaling.
    pub offset: f64,
    /// Inclusive lower bound on the physical value.
    pub minimum: f64,
    /// Inclusive upper bound on the physical value.
    pub maximum: f64,
}

/// A CAN message (parameter group) and the signals it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct J1939Message {
    /// Message name from the database.
    pub name: String,
    /// The literal 29-bit identifier from the `BO_` line.
    pub can_id: u32,
    /// Parameter Group Number derived from `can_id`.
    pub pgn: u32,
    /// Signals in database file order.
    pub signals: Vec<J1939Signal>,
}

impl J1939Message {
    /// Create an empty message; the PGN is derived from the identifier.
    pub fn new(name: impl Into<String>, can_id: u32) -> Self {
        Self {
            name: name.into(),
            can_id,
            pgn: extract_pgn(can_id),
            signals: Vec::new(),
        }
    }

    /// Append a signal, keeping file order.
    pub fn add_signal(&mut self, signal: J1939Signal) {
        self.signals.push(signal);
    }

    /// Find an owned signal by name.
    pub fn signal_by_name(&self, name: &str) -> Option<&J1939Signal> {
        self.signals.iter().find(|s| s.name == name)
    }
}

/// An SPN attribute binding from a `BA_ "SPN"` line.
///
/// Associated with a message only through the shared raw CAN identifier;
/// the binding has no lifecycle tie to [`J1939Message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct J1939Spn {
    /// Raw CAN identifier of the message the signal belongs to.
    pub message_id: u32,
    /// Signal name the SPN is attached to.
    pub name: String,
    /// Suspect Parameter Number.
    pub spn: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_derives_pgn() {
        // 0x18FEEE00, ET1 broadcast frame
        let message = J1939Message::new("ET1", 0x18FE_EE00);
        assert_eq!(message.pgn, 65262);
        assert!(message.signals.is_empty());
    }

    #[test]
    fn test_signal_order_preserved() {
        let mut message = J1939Message::new("EEC1", 0x0CF0_0400);
        for name in ["EngTorqueMode", "DriverDemandTorque", "ActualEngTorque"] {
            message.add_signal(J1939Signal {
                name: name.to_string(),
                start_bit: 0,
                length: 8,
                byte_order: ByteOrder::LittleEndian,
                value_type: ValueType::Unsigned,
                factor: 1.0,
                offset: 0.0,
                minimum: 0.0,
                maximum: 255.0,
            });
        }

        let names: Vec<&str> = message.signals.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["EngTorqueMode", "DriverDemandTorque", "ActualEngTorque"]
        );
        assert!(message.signal_by_name("ActualEngTorque").is_some());
        assert!(message.signal_by_name("Missing").is_none());
    }
}
