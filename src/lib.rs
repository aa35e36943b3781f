//! Format-string-driven packing and unpacking of fixed-layout binary
//! records, wire-compatible with Python's `struct` module for the supported
//! type codes.
//!
//! A format string is an optional byte-order marker (`<` little-endian, `>`
//! big-endian, `=` standard; default little) followed by field tokens, each
//! an optional decimal repeat count and one type code:
//!
//! | Code | Type | Bytes |
//! |------|------|-------|
//! | `b` / `B` | int8 / uint8 | 1 |
//! | `h` / `H` | int16 / uint16 | 2 |
//! | `i` / `I` | int32 / uint32 | 4 |
//! | `q` / `Q` | int64 / uint64 | 8 |
//! | `e` | float16 (binary16) | 2 |
//! | `f` | float32 | 4 |
//! | `d` | float64 | 8 |
//! | `s` | byte string | count |
//! | `x` | padding | count |
//!
//! A repeat count on a scalar code expands to that many independent fields
//! (`"3h"` packs three values); on `s` and `x` it is the field's byte
//! length (`"5s"` packs one 5-byte string).
//!
//! # Example
//!
//! ```
//! use structpack::{pack, unpack, Value};
//!
//! let packed = pack("<bxh", &[Value::Int(120), Value::Int(32000)])?;
//! assert_eq!(packed, [0x78, 0x00, 0x00, 0x7d]);
//!
//! let values = unpack("<bxh", &packed)?;
//! assert_eq!(values, [Value::Int(120), Value::Int(32000)]);
//! # Ok::<(), structpack::PackError>(())
//! ```
//!
//! Every operation is a pure, synchronous function of its inputs: no shared
//! state, no I/O, no allocation beyond the returned buffer or value
//! sequence. Parse a [`FormatDescriptor`] once and reuse it when packing
//! many records with the same layout.

pub mod codec;
pub mod error;
pub mod format;
pub mod half;
pub mod layout;
pub mod value;

pub use error::{PackError, Result};
pub use format::{Endianness, FieldSpec, FormatDescriptor, TypeKind};
pub use value::Value;

/// Pack `values` per `format` into a freshly allocated buffer.
pub fn pack(format: &str, values: &[Value]) -> Result<Vec<u8>> {
    let descriptor = FormatDescriptor::parse(format)?;
    let mut buffer = vec![0u8; descriptor.size()];
    codec::pack_into(&descriptor, values, &mut buffer)?;
    Ok(buffer)
}

/// Pack `values` per `format` into a caller-supplied buffer; returns the
/// number of bytes written. The buffer may be larger than the layout needs;
/// trailing capacity is left untouched.
pub fn pack_into(format: &str, values: &[Value], buffer: &mut [u8]) -> Result<usize> {
    let descriptor = FormatDescriptor::parse(format)?;
    codec::pack_into(&descriptor, values, buffer)
}

/// Unpack `data` per `format` into a value sequence.
pub fn unpack(format: &str, data: &[u8]) -> Result<Vec<Value>> {
    let descriptor = FormatDescriptor::parse(format)?;
    codec::unpack(&descriptor, data)
}

/// Total buffer size in bytes required by `format`.
pub fn calc_size(format: &str) -> Result<usize> {
    Ok(FormatDescriptor::parse(format)?.size())
}
