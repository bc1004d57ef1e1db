//! Pack formats: how a parsed token becomes bytes in the output buffer.
//!
//! Formats are written the way Python's `struct` module writes a single
//! value: an optional byte-order prefix followed by one type code, e.g. `B`,
//! `<h` or `!f`. Only single-value formats are accepted; repeat counts and
//! padding codes are not.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A numeric value parsed out of a source token, before packing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i128),
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Native,
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    fn from_code(code: char) -> Option<Self> {
        Some(match code {
            'b' => ScalarKind::I8,
            'B' => ScalarKind::U8,
            'h' => ScalarKind::I16,
            'H' => ScalarKind::U16,
            'i' => ScalarKind::I32,
            'I' => ScalarKind::U32,
            'q' => ScalarKind::I64,
            'Q' => ScalarKind::U64,
            'f' => ScalarKind::F32,
            'd' => ScalarKind::F64,
            _ => return None,
        })
    }

    fn code(self) -> char {
        match self {
            ScalarKind::I8 => 'b',
            ScalarKind::U8 => 'B',
            ScalarKind::I16 => 'h',
            ScalarKind::U16 => 'H',
            ScalarKind::I32 => 'i',
            ScalarKind::U32 => 'I',
            ScalarKind::I64 => 'q',
            ScalarKind::U64 => 'Q',
            ScalarKind::F32 => 'f',
            ScalarKind::F64 => 'd',
        }
    }

    /// Encoded width in bytes.
    pub fn size(self) -> usize {
        match self {
            ScalarKind::I8 | ScalarKind::U8 => 1,
            ScalarKind::I16 | ScalarKind::U16 => 2,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => 4,
            ScalarKind::I64 | ScalarKind::U64 | ScalarKind::F64 => 8,
        }
    }
}

/// Byte width, signedness and byte order of one packed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackFormat {
    pub order: ByteOrder,
    pub kind: ScalarKind,
}

#[derive(Debug, Error, PartialEq)]
pub enum PackError {
    /// `value` is kept as text so literals wider than [`Value::Int`] can be reported.
    #[error("value {value} is out of range for format '{format}'")]
    OutOfRange { value: String, format: PackFormat },
    #[error("format '{format}' requires an integer, got {value}")]
    NotInteger { value: Value, format: PackFormat },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid pack format '{0}': expected an optional byte order (@ = < > !) and one of b B h H i I q Q f d")]
pub struct FormatError(pub String);

macro_rules! put {
    ($out:expr, $order:expr, $v:expr) => {
        $out.extend_from_slice(&match $order {
            ByteOrder::Native => $v.to_ne_bytes(),
            ByteOrder::Little => $v.to_le_bytes(),
            ByteOrder::Big => $v.to_be_bytes(),
        })
    };
}

impl PackFormat {
    /// One unsigned byte (`B`).
    pub const UNSIGNED_BYTE: PackFormat = PackFormat {
        order: ByteOrder::Native,
        kind: ScalarKind::U8,
    };

    /// Big-endian IEEE-754 single precision (`!f`).
    pub const BIG_ENDIAN_F32: PackFormat = PackFormat {
        order: ByteOrder::Big,
        kind: ScalarKind::F32,
    };

    /// Little-endian signed 16-bit (`<h`), used for PCM audio samples.
    pub const LITTLE_ENDIAN_I16: PackFormat = PackFormat {
        order: ByteOrder::Little,
        kind: ScalarKind::I16,
    };

    pub fn size(&self) -> usize {
        self.kind.size()
    }

    /// Append the encoding of `value` to `out`. Nothing is appended on error.
    pub fn pack(&self, value: Value, out: &mut Vec<u8>) -> Result<(), PackError> {
        let out_of_range = |_: std::num::TryFromIntError| PackError::OutOfRange {
            value: value.to_string(),
            format: *self,
        };

        match (value, self.kind) {
            (Value::Float(v), ScalarKind::F32) => return self.pack_f32(v, value, out),
            (Value::Int(v), ScalarKind::F32) => return self.pack_f32(v as f64, value, out),
            (Value::Float(v), ScalarKind::F64) => put!(out, self.order, v),
            (Value::Int(v), ScalarKind::F64) => put!(out, self.order, v as f64),
            (Value::Float(_), _) => {
                return Err(PackError::NotInteger {
                    value,
                    format: *self,
                });
            }
            (Value::Int(v), ScalarKind::I8) => put!(out, self.order, i8::try_from(v).map_err(out_of_range)?),
            (Value::Int(v), ScalarKind::U8) => put!(out, self.order, u8::try_from(v).map_err(out_of_range)?),
            (Value::Int(v), ScalarKind::I16) => put!(out, self.order, i16::try_from(v).map_err(out_of_range)?),
            (Value::Int(v), ScalarKind::U16) => put!(out, self.order, u16::try_from(v).map_err(out_of_range)?),
            (Value::Int(v), ScalarKind::I32) => put!(out, self.order, i32::try_from(v).map_err(out_of_range)?),
            (Value::Int(v), ScalarKind::U32) => put!(out, self.order, u32::try_from(v).map_err(out_of_range)?),
            (Value::Int(v), ScalarKind::I64) => put!(out, self.order, i64::try_from(v).map_err(out_of_range)?),
            (Value::Int(v), ScalarKind::U64) => put!(out, self.order, u64::try_from(v).map_err(out_of_range)?),
        }
        Ok(())
    }

    fn pack_f32(&self, v: f64, value: Value, out: &mut Vec<u8>) -> Result<(), PackError> {
        let narrowed = v as f32;
        if v.is_finite() && narrowed.is_infinite() {
            return Err(PackError::OutOfRange {
                value: value.to_string(),
                format: *self,
            });
        }
        put!(out, self.order, narrowed);
        Ok(())
    }
}

impl FromStr for PackFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || FormatError(s.to_string());
        let mut chars = s.chars();
        let first = chars.next().ok_or_else(err)?;
        let (order, code) = match first {
            '@' | '=' => (ByteOrder::Native, chars.next().ok_or_else(err)?),
            '<' => (ByteOrder::Little, chars.next().ok_or_else(err)?),
            '>' | '!' => (ByteOrder::Big, chars.next().ok_or_else(err)?),
            c => (ByteOrder::Native, c),
        };
        if chars.next().is_some() {
            return Err(err());
        }
        let kind = ScalarKind::from_code(code).ok_or_else(err)?;
        Ok(PackFormat { order, kind })
    }
}

impl fmt::Display for PackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.order {
            ByteOrder::Native => "",
            ByteOrder::Little => "<",
            ByteOrder::Big => ">",
        };
        write!(f, "{prefix}{}", self.kind.code())
    }
}
