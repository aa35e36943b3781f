//! Parser for the pack/unpack format mini-language.
//!
//! A format string is an optional byte-order marker followed by field
//! tokens, each an optional decimal repeat count and a single type code:
//!
//! ```text
//! "<bxh"   little-endian: int8, one padding byte, int16
//! ">3i"    big-endian: three int32 fields
//! "<5s"    little-endian: one 5-byte string field
//! ```

use crate::error::{PackError, Result};

/// Byte order of multi-byte fields in a format.
///
/// `Standard` is the `=` marker (standard sizes, no alignment); it orders
/// bytes the same way as `Little` and exists only so the marker round-trips
/// through the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
    Standard,
}

impl Endianness {
    /// Whether multi-byte fields are written most-significant byte first.
    pub fn is_big(self) -> bool {
        matches!(self, Endianness::Big)
    }
}

impl Default for Endianness {
    fn default() -> Self {
        Endianness::Little
    }
}

/// Field data type. Closed set; the codec matches exhaustively on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float16,
    Float32,
    Float64,
    /// Fixed-length byte string; the field's count is its total byte length.
    Bytes,
    /// Value-less padding; one byte per unit of count.
    Pad,
}

impl TypeKind {
    /// Byte width of a single unit of this kind.
    pub fn width(self) -> usize {
        match self {
            TypeKind::Int8 | TypeKind::UInt8 => 1,
            TypeKind::Int16 | TypeKind::UInt16 | TypeKind::Float16 => 2,
            TypeKind::Int32 | TypeKind::UInt32 | TypeKind::Float32 => 4,
            TypeKind::Int64 | TypeKind::UInt64 | TypeKind::Float64 => 8,
            TypeKind::Bytes | TypeKind::Pad => 1,
        }
    }

    /// Whether a field of this kind consumes/produces a value.
    pub fn carries_value(self) -> bool {
        !matches!(self, TypeKind::Pad)
    }

    fn from_code(code: char) -> Option<TypeKind> {
        match code {
            'b' => Some(TypeKind::Int8),
            'B' => Some(TypeKind::UInt8),
            'h' => Some(TypeKind::Int16),
            'H' => Some(TypeKind::UInt16),
            'i' => Some(TypeKind::Int32),
            'I' => Some(TypeKind::UInt32),
            'q' => Some(TypeKind::Int64),
            'Q' => Some(TypeKind::UInt64),
            'e' => Some(TypeKind::Float16),
            'f' => Some(TypeKind::Float32),
            'd' => Some(TypeKind::Float64),
            's' => Some(TypeKind::Bytes),
            'x' => Some(TypeKind::Pad),
            _ => None,
        }
    }
}

/// A single field in a parsed format.
///
/// For scalar kinds the parser has already expanded repeat counts, so
/// `count` is always 1. For `Bytes` it is the total byte length of the
/// field; for `Pad` it is the number of padding bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub count: usize,
    pub kind: TypeKind,
}

impl FieldSpec {
    /// Total bytes this field occupies in the buffer.
    pub fn byte_len(&self) -> usize {
        self.kind.width() * self.count
    }
}

/// The parsed, immutable representation of a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    endianness: Endianness,
    fields: Vec<FieldSpec>,
}

impl FormatDescriptor {
    /// Parse a format string into a descriptor.
    ///
    /// A repeat count on a scalar type code expands to that many
    /// independent single-value fields, matching Python `struct` semantics:
    /// `"3h"` is three int16 fields. The `s` and `x` codes are the
    /// exception: their count is the field's byte length, so `"5s"` is one
    /// 5-byte string field, not five 1-byte fields.
    pub fn parse(format: &str) -> Result<FormatDescriptor> {
        let bytes = format.as_bytes();
        let mut pos = 0;

        let endianness = match bytes.first() {
            Some(b'<') => {
                pos += 1;
                Endianness::Little
            }
            Some(b'>') => {
                pos += 1;
                Endianness::Big
            }
            Some(b'=') => {
                pos += 1;
                Endianness::Standard
            }
            _ => Endianness::default(),
        };

        if pos == bytes.len() {
            return Err(PackError::MalformedFormat {
                position: pos,
                reason: "format string has no fields".to_string(),
            });
        }

        let mut fields = Vec::new();
        while pos < bytes.len() {
            let count_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }

            let count = if pos > count_start {
                let digits = &format[count_start..pos];
                digits
                    .parse::<usize>()
                    .map_err(|_| PackError::MalformedFormat {
                        position: count_start,
                        reason: format!("repeat count '{}' is too large", digits),
                    })?
            } else {
                1
            };

            let code = match bytes.get(pos) {
                Some(&c) => c as char,
                None => {
                    return Err(PackError::MalformedFormat {
                        position: count_start,
                        reason: "repeat count with no type code".to_string(),
                    })
                }
            };

            let kind = TypeKind::from_code(code).ok_or_else(|| PackError::MalformedFormat {
                position: pos,
                reason: format!("unknown type code '{}'", code),
            })?;

            match kind {
                // Explicit branch: the count of a string or padding field is
                // its byte length, never a repetition.
                TypeKind::Bytes | TypeKind::Pad => fields.push(FieldSpec { count, kind }),
                _ => {
                    for _ in 0..count {
                        fields.push(FieldSpec { count: 1, kind });
                    }
                }
            }
            pos += 1;
        }

        Ok(FormatDescriptor { endianness, fields })
    }

    /// Byte order of multi-byte fields.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// The ordered field sequence.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Total buffer size in bytes required by this format.
    pub fn size(&self) -> usize {
        crate::layout::total_size(self)
    }

    /// Number of values pack consumes and unpack produces (padding fields
    /// carry no value).
    pub fn value_count(&self) -> usize {
        self.fields.iter().filter(|f| f.kind.carries_value()).count()
    }

    /// Byte range of the field at `index` in descriptor order (padding
    /// fields included). `None` if the index is out of range.
    pub fn field_range(&self, index: usize) -> Option<std::ops::Range<usize>> {
        crate::layout::field_range(self, index)
    }
}
