//! Byte-level transcoding between value sequences and packed buffers.
//!
//! `pack_into` validates the whole call (buffer capacity, value count,
//! value kinds, integer ranges, byte string lengths) before it writes
//! anything, so a failed pack never leaves a partial prefix in the
//! destination buffer.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{PackError, Result};
use crate::format::{FormatDescriptor, TypeKind};
use crate::half;
use crate::value::Value;

/// Pack `values` into `buffer` according to `descriptor`.
///
/// Returns the number of bytes written, which is always
/// `descriptor.size()`. Field indices in errors refer to the value's
/// position in the supplied sequence (padding fields consume no value and
/// are not counted).
pub fn pack_into(
    descriptor: &FormatDescriptor,
    values: &[Value],
    buffer: &mut [u8],
) -> Result<usize> {
    let needed = descriptor.size();
    if buffer.len() < needed {
        return Err(PackError::BufferTooSmall {
            needed,
            available: buffer.len(),
        });
    }

    let expected = descriptor.value_count();
    if values.len() != expected {
        return Err(PackError::ValueCountMismatch {
            expected,
            supplied: values.len(),
        });
    }

    // Validation pass: coerce every value without touching the buffer.
    let mut index = 0;
    for field in descriptor.fields() {
        if !field.kind.carries_value() {
            continue;
        }
        coerce(field.kind, field.count, &values[index], index)?;
        index += 1;
    }

    // Write pass: every coercion below is the same one that just succeeded.
    let big = descriptor.endianness().is_big();
    let mut offset = 0;
    let mut index = 0;
    for field in descriptor.fields() {
        let len = field.byte_len();
        let dest = &mut buffer[offset..offset + len];

        if field.kind == TypeKind::Pad {
            dest.fill(0);
            offset += len;
            continue;
        }

        match coerce(field.kind, field.count, &values[index], index)? {
            Coerced::Signed(v) => match field.kind {
                TypeKind::Int8 => dest[0] = v as i8 as u8,
                TypeKind::Int16 => write_u16(dest, v as i16 as u16, big),
                TypeKind::Int32 => write_u32(dest, v as i32 as u32, big),
                TypeKind::Int64 => write_u64(dest, v as u64, big),
                _ => unreachable!("signed coercion only for signed kinds"),
            },
            Coerced::Unsigned(v) => match field.kind {
                TypeKind::UInt8 => dest[0] = v as u8,
                TypeKind::UInt16 => write_u16(dest, v as u16, big),
                TypeKind::UInt32 => write_u32(dest, v as u32, big),
                TypeKind::UInt64 => write_u64(dest, v, big),
                _ => unreachable!("unsigned coercion only for unsigned kinds"),
            },
            Coerced::Float(v) => match field.kind {
                TypeKind::Float16 => write_u16(dest, half::f32_to_f16_bits(v as f32), big),
                TypeKind::Float32 => write_f32(dest, v as f32, big),
                TypeKind::Float64 => write_f64(dest, v, big),
                _ => unreachable!("float coercion only for float kinds"),
            },
            Coerced::Bytes(src) => {
                // Shorter input zero-fills the remainder of the field
                dest[..src.len()].copy_from_slice(src);
                dest[src.len()..].fill(0);
            }
        }

        offset += len;
        index += 1;
    }

    Ok(needed)
}

/// Unpack `data` into a value sequence according to `descriptor`.
///
/// Padding fields are skipped and produce no value. Integers are
/// sign/zero-extended per their signedness; binary16 fields are promoted to
/// f32 on read; byte-string fields yield exactly `count` raw bytes with no
/// terminator semantics.
pub fn unpack(descriptor: &FormatDescriptor, data: &[u8]) -> Result<Vec<Value>> {
    let needed = descriptor.size();
    if data.len() < needed {
        return Err(PackError::BufferTooSmall {
            needed,
            available: data.len(),
        });
    }

    let big = descriptor.endianness().is_big();
    let mut values = Vec::with_capacity(descriptor.value_count());
    let mut offset = 0;

    for field in descriptor.fields() {
        let len = field.byte_len();
        let src = &data[offset..offset + len];

        match field.kind {
            TypeKind::Pad => {}
            TypeKind::Bytes => values.push(Value::Bytes(src.to_vec())),
            TypeKind::Int8 => values.push(Value::Int(src[0] as i8 as i64)),
            TypeKind::UInt8 => values.push(Value::UInt(src[0] as u64)),
            TypeKind::Int16 => values.push(Value::Int(read_u16(src, big) as i16 as i64)),
            TypeKind::UInt16 => values.push(Value::UInt(read_u16(src, big) as u64)),
            TypeKind::Int32 => values.push(Value::Int(read_u32(src, big) as i32 as i64)),
            TypeKind::UInt32 => values.push(Value::UInt(read_u32(src, big) as u64)),
            TypeKind::Int64 => values.push(Value::Int(read_u64(src, big) as i64)),
            TypeKind::UInt64 => values.push(Value::UInt(read_u64(src, big))),
            TypeKind::Float16 => {
                let bits = read_u16(src, big);
                values.push(Value::Float(half::f16_bits_to_f32(bits) as f64));
            }
            TypeKind::Float32 => values.push(Value::Float(read_f32(src, big) as f64)),
            TypeKind::Float64 => values.push(Value::Float(read_f64(src, big))),
        }

        offset += len;
    }

    Ok(values)
}

/// A value coerced to the concrete representation a field kind encodes.
enum Coerced<'a> {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Bytes(&'a [u8]),
}

fn coerce<'a>(
    kind: TypeKind,
    count: usize,
    value: &'a Value,
    field: usize,
) -> Result<Coerced<'a>> {
    match kind {
        TypeKind::Int8 => coerce_signed(value, i8::MIN as i64, i8::MAX as i64, field, "int8"),
        TypeKind::Int16 => coerce_signed(value, i16::MIN as i64, i16::MAX as i64, field, "int16"),
        TypeKind::Int32 => coerce_signed(value, i32::MIN as i64, i32::MAX as i64, field, "int32"),
        TypeKind::Int64 => coerce_signed(value, i64::MIN, i64::MAX, field, "int64"),
        TypeKind::UInt8 => coerce_unsigned(value, u8::MAX as u64, field, "uint8"),
        TypeKind::UInt16 => coerce_unsigned(value, u16::MAX as u64, field, "uint16"),
        TypeKind::UInt32 => coerce_unsigned(value, u32::MAX as u64, field, "uint32"),
        TypeKind::UInt64 => coerce_unsigned(value, u64::MAX, field, "uint64"),
        TypeKind::Float16 | TypeKind::Float32 | TypeKind::Float64 => match value {
            Value::Int(i) => Ok(Coerced::Float(*i as f64)),
            Value::UInt(u) => Ok(Coerced::Float(*u as f64)),
            Value::Float(f) => Ok(Coerced::Float(*f)),
            Value::Bytes(_) => Err(PackError::ValueKindMismatch {
                field,
                expected: "float",
                supplied: value.kind_name(),
            }),
        },
        TypeKind::Bytes => match value {
            Value::Bytes(b) => {
                if b.len() > count {
                    Err(PackError::StringTooLong {
                        field,
                        length: b.len(),
                        declared: count,
                    })
                } else {
                    Ok(Coerced::Bytes(b))
                }
            }
            _ => Err(PackError::ValueKindMismatch {
                field,
                expected: "byte string",
                supplied: value.kind_name(),
            }),
        },
        TypeKind::Pad => unreachable!("padding fields are never coerced"),
    }
}

fn coerce_signed<'a>(
    value: &Value,
    min: i64,
    max: i64,
    field: usize,
    target: &'static str,
) -> Result<Coerced<'a>> {
    match value {
        Value::Int(i) => {
            if *i < min || *i > max {
                Err(overflow(field, i.to_string(), target))
            } else {
                Ok(Coerced::Signed(*i))
            }
        }
        Value::UInt(u) => {
            if *u > max as u64 {
                Err(overflow(field, u.to_string(), target))
            } else {
                Ok(Coerced::Signed(*u as i64))
            }
        }
        Value::Float(f) => {
            // Fractional floats never silently truncate into integer fields
            if f.fract() != 0.0 {
                return Err(PackError::ValueKindMismatch {
                    field,
                    expected: target,
                    supplied: "float",
                });
            }
            // Compare as i128: `min as f64`/`max as f64` round at the i64
            // boundaries, letting 2^63 slip past an f64 comparison
            let i = *f as i128;
            if i < min as i128 || i > max as i128 {
                return Err(overflow(field, f.to_string(), target));
            }
            Ok(Coerced::Signed(i as i64))
        }
        Value::Bytes(_) => Err(PackError::ValueKindMismatch {
            field,
            expected: target,
            supplied: value.kind_name(),
        }),
    }
}

fn coerce_unsigned<'a>(
    value: &Value,
    max: u64,
    field: usize,
    target: &'static str,
) -> Result<Coerced<'a>> {
    match value {
        Value::Int(i) => {
            if *i < 0 || *i as u64 > max {
                Err(overflow(field, i.to_string(), target))
            } else {
                Ok(Coerced::Unsigned(*i as u64))
            }
        }
        Value::UInt(u) => {
            if *u > max {
                Err(overflow(field, u.to_string(), target))
            } else {
                Ok(Coerced::Unsigned(*u))
            }
        }
        Value::Float(f) => {
            if f.fract() != 0.0 {
                return Err(PackError::ValueKindMismatch {
                    field,
                    expected: target,
                    supplied: "float",
                });
            }
            if *f < 0.0 {
                return Err(overflow(field, f.to_string(), target));
            }
            // u128 comparison for the same reason as the signed path:
            // `u64::MAX as f64` rounds up to exactly 2^64
            let u = *f as u128;
            if u > max as u128 {
                return Err(overflow(field, f.to_string(), target));
            }
            Ok(Coerced::Unsigned(u as u64))
        }
        Value::Bytes(_) => Err(PackError::ValueKindMismatch {
            field,
            expected: target,
            supplied: value.kind_name(),
        }),
    }
}

fn overflow(field: usize, value: String, target: &'static str) -> PackError {
    PackError::IntegerOverflow {
        field,
        value,
        target,
    }
}

fn write_u16(buf: &mut [u8], v: u16, big: bool) {
    if big {
        BigEndian::write_u16(buf, v)
    } else {
        LittleEndian::write_u16(buf, v)
    }
}

fn write_u32(buf: &mut [u8], v: u32, big: bool) {
    if big {
        BigEndian::write_u32(buf, v)
    } else {
        LittleEndian::write_u32(buf, v)
    }
}

fn write_u64(buf: &mut [u8], v: u64, big: bool) {
    if big {
        BigEndian::write_u64(buf, v)
    } else {
        LittleEndian::write_u64(buf, v)
    }
}

fn write_f32(buf: &mut [u8], v: f32, big: bool) {
    if big {
        BigEndian::write_f32(buf, v)
    } else {
        LittleEndian::write_f32(buf, v)
    }
}

fn write_f64(buf: &mut [u8], v: f64, big: bool) {
    if big {
        BigEndian::write_f64(buf, v)
    } else {
        LittleEndian::write_f64(buf, v)
    }
}

fn read_u16(buf: &[u8], big: bool) -> u16 {
    if big {
        BigEndian::read_u16(buf)
    } else {
        LittleEndian::read_u16(buf)
    }
}

fn read_u32(buf: &[u8], big: bool) -> u32 {
    if big {
        BigEndian::read_u32(buf)
    } else {
        LittleEndian::read_u32(buf)
    }
}

fn read_u64(buf: &[u8], big: bool) -> u64 {
    if big {
        BigEndian::read_u64(buf)
    } else {
        LittleEndian::read_u64(buf)
    }
}

fn read_f32(buf: &[u8], big: bool) -> f32 {
    if big {
        BigEndian::read_f32(buf)
    } else {
        LittleEndian::read_f32(buf)
    }
}

fn read_f64(buf: &[u8], big: bool) -> f64 {
    if big {
        BigEndian::read_f64(buf)
    } else {
        LittleEndian::read_f64(buf)
    }
}
