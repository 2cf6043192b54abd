//! J1939 signal decode engine.
//!
//! Turns a raw CAN payload plus a signal descriptor into a typed physical
//! value. Decoding is pure and allocation-free; every failure mode
//! (signal does not fit the payload, "not available" sentinel, value out of
//! range) degrades to `None` rather than an error.

use crate::core::data::PhysicalValue;

use super::descriptor::{ByteOrder, J1939Signal, ValueType};

const NOT_AVAILABLE_8: u8 = 0xFF;
const NOT_AVAILABLE_16: [u8; 2] = [0xFF; 2];
const NOT_AVAILABLE_32: [u8; 4] = [0xFF; 4];

/// Decode one signal from a raw CAN payload.
///
/// With `range_check` enabled, a physical value outside the signal's
/// `[minimum, maximum]` bounds yields `None`. The returned representation
/// depends on the scaling: an integral factor and offset select an integer
/// type sized by the signal length (a single bit becomes a boolean), while
/// a fractional factor or offset always yields [`PhysicalValue::F32`].
pub fn decode_signal(
    signal: &J1939Signal,
    payload: &[u8],
    range_check: bool,
) -> Option<PhysicalValue> {
    let raw = extract_raw_value(signal, payload)?;

    let value = raw as f64 * signal.factor + signal.offset;
    if range_check && (value < signal.minimum || value > signal.maximum) {
        return None;
    }

    if !has_fractional(signal.factor) && !has_fractional(signal.offset) {
        let value = match signal.length {
            1 => PhysicalValue::Bool(value as i64 == 1),
            2..=8 => match signal.value_type {
                ValueType::Signed => PhysicalValue::I8(value as i64 as i8),
                ValueType::Unsigned => PhysicalValue::U8(value as u64 as u8),
            },
            9..=16 => match signal.value_type {
                ValueType::Signed => PhysicalValue::I16(value as i64 as i16),
                ValueType::Unsigned => PhysicalValue::U16(value as u64 as u16),
            },
            17..=32 => match signal.value_type {
                ValueType::Signed => PhysicalValue::I32(value as i64 as i32),
                ValueType::Unsigned => PhysicalValue::U32(value as u64 as u32),
            },
            _ => match signal.value_type {
                ValueType::Signed => PhysicalValue::I64(value as i64),
                ValueType::Unsigned => PhysicalValue::U64(value as u64),
            },
        };
        return Some(value);
    }

    Some(PhysicalValue::F32(value as f32))
}

fn has_fractional(value: f64) -> bool {
    value % 1.0 != 0.0
}

/// Extract the raw unsigned accumulator for a signal, or `None` if the
/// signal does not fit the payload or carries a "not available" sentinel.
fn extract_raw_value(signal: &J1939Signal, payload: &[u8]) -> Option<u64> {
    // Both bytes and bits are indexed in reverse on this wire format.
    let byte_index = payload.len() as isize - (signal.start_bit / 8) as isize - 1;
    if byte_index < 0 || byte_index >= payload.len() as isize {
        return None;
    }
    let byte_index = byte_index as usize;

    // "Signal not available" sentinels, checked before extraction.
    match signal.length {
        8 => {
            if payload[byte_index] == NOT_AVAILABLE_8 {
                return None;
            }
        }
        16 => {
            if byte_index > 0 && payload[byte_index - 1..=byte_index] == NOT_AVAILABLE_16 {
                return None;
            }
        }
        32 => {
            if byte_index > 2 && payload[byte_index - 3..=byte_index] == NOT_AVAILABLE_32 {
                return None;
            }
        }
        _ => {}
    }

    let mut raw: u64 = 0;
    let mut remaining = signal.length as u32;
    let mut current_byte = byte_index as isize;
    let mut current_bit = (7 - signal.start_bit % 8) as i32;

    match signal.byte_order {
        ByteOrder::LittleEndian => {
            // Intel: first visited bit lands at accumulator position 0.
            while remaining > 0 {
                if current_byte < 0 {
                    break;
                }
                let bit = (payload[current_byte as usize] >> current_bit) & 1;
                let shift = signal.length as u32 - remaining;
                raw |= (bit as u64) << shift;

                current_bit -= 1;
                if current_bit < 0 {
                    current_bit = 7;
                    current_byte -= 1;
                }
                remaining -= 1;
            }
        }
        ByteOrder::BigEndian => {
            // Motorola: accumulator built MSB-first.
            while remaining > 0 {
                if current_byte < 0 {
                    break;
                }
                let bit = (payload[current_byte as usize] >> current_bit) & 1;
                raw = (raw << 1) | bit as u64;

                current_bit -= 1;
                if current_bit < 0 {
                    current_bit = 7;
                    current_byte -= 1;
                }
                remaining -= 1;
            }
        }
    }

    Some(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(length: u8, byte_order: ByteOrder, value_type: ValueType) -> J1939Signal {
        J1939Signal {
            name: "TestSignal".to_string(),
            start_bit: 0,
            length,
            byte_order,
            value_type,
            factor: 1.0,
            offset: 0.0,
            minimum: 0.0,
            maximum: f64::MAX,
        }
    }

    #[test]
    fn test_not_available_sentinel_8bit() {
        let sig = signal(8, ByteOrder::BigEndian, ValueType::Unsigned);
        assert_eq!(decode_signal(&sig, &[0x00, 0xFF], true), None);
        assert_eq!(decode_signal(&sig, &[0x00, 0xFF], false), None);
    }

    #[test]
    fn test_not_available_sentinel_16bit() {
        let sig = signal(16, ByteOrder::BigEndian, ValueType::Unsigned);
        assert_eq!(decode_signal(&sig, &[0x00, 0xFF, 0xFF], true), None);
        // A 16-bit all-ones pattern cannot be flagged when only one byte
        // precedes the origin, so extraction proceeds.
        let sig_short = signal(16, ByteOrder::BigEndian, ValueType::Unsigned);
        assert!(decode_signal(&sig_short, &[0xFF], false).is_some());
    }

    #[test]
    fn test_not_available_sentinel_32bit() {
        let sig = signal(32, ByteOrder::BigEndian, ValueType::Unsigned);
        let payload = [0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(decode_signal(&sig, &payload, true), None);
    }

    #[test]
    fn test_range_rejection() {
        let mut sig = signal(8, ByteOrder::BigEndian, ValueType::Unsigned);
        sig.minimum = 0.0;
        sig.maximum = 100.0;
        // Raw accumulator 150 scales to 150.0, outside [0, 100].
        let payload = [0x00, 150];
        assert_eq!(decode_signal(&sig, &payload, true), None);
        assert_eq!(
            decode_signal(&sig, &payload, false),
            Some(PhysicalValue::U8(150))
        );
    }

    #[test]
    fn test_integral_scaling_selects_sized_integer() {
        let mut sig = signal(8, ByteOrder::LittleEndian, ValueType::Unsigned);
        sig.maximum = 255.0;
        // Intel accumulation is LSB-first in visitation order: bit 7 of the
        // origin byte lands at position 0, so 0x54 reads back as 42.
        assert_eq!(decode_signal(&sig, &[0x54], true), Some(PhysicalValue::U8(42)));
    }

    #[test]
    fn test_fractional_factor_forces_float() {
        let mut sig = signal(8, ByteOrder::LittleEndian, ValueType::Unsigned);
        sig.maximum = 255.0;
        sig.factor = 0.5;
        assert_eq!(
            decode_signal(&sig, &[0x54], true),
            Some(PhysicalValue::F32(21.0))
        );
    }

    #[test]
    fn test_fractional_offset_forces_float() {
        let mut sig = signal(8, ByteOrder::BigEndian, ValueType::Unsigned);
        sig.maximum = 255.0;
        sig.offset = 0.5;
        assert_eq!(
            decode_signal(&sig, &[0x00, 10], true),
            Some(PhysicalValue::F32(10.5))
        );
    }

    #[test]
    fn test_single_bit_is_bool() {
        let mut sig = signal(1, ByteOrder::LittleEndian, ValueType::Unsigned);
        sig.maximum = 1.0;
        // start_bit 0 means bit 7 of the last payload byte.
        assert_eq!(decode_signal(&sig, &[0x80], true), Some(PhysicalValue::Bool(true)));
        assert_eq!(decode_signal(&sig, &[0x00], true), Some(PhysicalValue::Bool(false)));
    }

    #[test]
    fn test_motorola_16bit_spans_downward() {
        let mut sig = signal(16, ByteOrder::BigEndian, ValueType::Unsigned);
        sig.maximum = 65535.0;
        // Origin byte first (MSB), then the byte below it.
        let payload = [0x20, 0x4E];
        assert_eq!(
            decode_signal(&sig, &payload, true),
            Some(PhysicalValue::U16(0x4E20))
        );
    }

    #[test]
    fn test_engine_speed_scaling() {
        let mut sig = signal(16, ByteOrder::BigEndian, ValueType::Unsigned);
        sig.factor = 0.125;
        sig.maximum = 8031.875;
        // Raw 0x4E20 = 20000 -> 2500 rpm.
        let payload = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x4E];
        assert_eq!(
            decode_signal(&sig, &payload, true),
            Some(PhysicalValue::F32(2500.0))
        );
    }

    #[test]
    fn test_signed_wraps_to_negative() {
        let mut sig = signal(8, ByteOrder::BigEndian, ValueType::Signed);
        sig.minimum = f64::MIN;
        let payload = [0x00, 200];
        assert_eq!(decode_signal(&sig, &payload, true), Some(PhysicalValue::I8(-56)));
    }

    #[test]
    fn test_signal_outside_payload() {
        let mut sig = signal(8, ByteOrder::BigEndian, ValueType::Unsigned);
        sig.start_bit = 64;
        // start_bit 64 needs a ninth byte below the payload start.
        assert_eq!(decode_signal(&sig, &[0u8; 8], true), None);
        assert_eq!(decode_signal(&sig, &[], true), None);
    }

    #[test]
    fn test_partial_read_stops_at_payload_start() {
        let mut sig = signal(16, ByteOrder::BigEndian, ValueType::Unsigned);
        sig.start_bit = 8;
        sig.maximum = 65535.0;
        // Origin is byte 0 of a two-byte payload; only 8 of 16 bits exist.
        assert_eq!(
            decode_signal(&sig, &[0x12, 0x00], true),
            Some(PhysicalValue::U16(0x12))
        );
    }

    #[test]
    fn test_wide_signal_selects_u64() {
        let mut sig = signal(64, ByteOrder::BigEndian, ValueType::Unsigned);
        let payload = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        sig.start_bit = 56;
        // Origin at byte 0, partial single-byte read.
        assert_eq!(decode_signal(&sig, &payload, false), Some(PhysicalValue::U64(1)));
    }

    #[test]
    fn test_mid_width_selects_u32() {
        let mut sig = signal(24, ByteOrder::BigEndian, ValueType::Unsigned);
        sig.maximum = 16_777_215.0;
        let payload = [0x56, 0x34, 0x12];
        // 24-bit Motorola from the top byte down: 0x12 0x34 0x56.
        assert_eq!(
            decode_signal(&sig, &payload, true),
            Some(PhysicalValue::U32(0x0012_3456))
        );
    }
}
