//! Data types for the shop-floor gateway.
//!
//! This module defines the value model shared by the protocol decoders.
//! Wire-level decoders produce a [`PhysicalValue`] sized to the decoded
//! field; the application layer decides how to route and store it.

use serde::{Deserialize, Serialize};

/// A decoded physical value.
///
/// Protocol decoders pick the narrowest representation that holds the
/// decoded field: a 1-bit signal becomes [`PhysicalValue::Bool`], an 8-bit
/// unsigned field becomes [`PhysicalValue::U8`], and so on. Values scaled
/// by a fractional factor or offset are carried as [`PhysicalValue::F32`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhysicalValue {
    /// Single-bit flag
    Bool(bool),

    /// Unsigned 8-bit value
    U8(u8),

    /// Signed 8-bit value
    I8(i8),

    /// Unsigned 16-bit value
    U16(u16),

    /// Signed 16-bit value
    I16(i16),

    /// Unsigned 32-bit value
    U32(u32),

    /// Signed 32-bit value
    I32(i32),

    /// Unsigned 64-bit value
    U64(u64),

    /// Signed 64-bit value
    I64(i64),

    /// Scaled floating-point value
    F32(f32),
}

impl PhysicalValue {
    /// Get the value as f64.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Bool(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            Self::U8(v) => *v as f64,
            Self::I8(v) => *v as f64,
            Self::U16(v) => *v as f64,
            Self::I16(v) => *v as f64,
            Self::U32(v) => *v as f64,
            Self::I32(v) => *v as f64,
            Self::U64(v) => *v as f64,
            Self::I64(v) => *v as f64,
            Self::F32(v) => *v as f64,
        }
    }

    /// Try to get the value as i64.
    ///
    /// Floating values are truncated; `None` for floats outside the i64
    /// range and for unsigned values that do not fit.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Bool(v) => Some(if *v { 1 } else { 0 }),
            Self::U8(v) => Some(*v as i64),
            Self::I8(v) => Some(*v as i64),
            Self::U16(v) => Some(*v as i64),
            Self::I16(v) => Some(*v as i64),
            Self::U32(v) => Some(*v as i64),
            Self::I32(v) => Some(*v as i64),
            Self::U64(v) => i64::try_from(*v).ok(),
            Self::I64(v) => Some(*v),
            Self::F32(v) => {
                if v.is_finite() && (i64::MIN as f32..=i64::MAX as f32).contains(v) {
                    Some(*v as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Try to get the value as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            other => other.as_i64().map(|v| v != 0),
        }
    }

    /// Check if this value carries a floating-point representation.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32(_))
    }
}

// Convenient From implementations
impl From<bool> for PhysicalValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for PhysicalValue {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<i8> for PhysicalValue {
    fn from(v: i8) -> Self {
        Self::I8(v)
    }
}

impl From<u16> for PhysicalValue {
    fn from(v: u16) -> Self {
        Self::U16(v)
    }
}

impl From<i16> for PhysicalValue {
    fn from(v: i16) -> Self {
        Self::I16(v)
    }
}

impl From<u32> for PhysicalValue {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<i32> for PhysicalValue {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<u64> for PhysicalValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<i64> for PhysicalValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<f32> for PhysicalValue {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}
