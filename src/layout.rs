//! Layout calculation for parsed formats.
//!
//! Pure byte arithmetic over a descriptor: total buffer size and per-field
//! offsets. A validly parsed descriptor always has a computable layout, so
//! nothing here returns an error.

use std::ops::Range;

use crate::format::FormatDescriptor;

/// Total number of bytes a buffer must hold for this format, padding
/// included.
pub fn total_size(descriptor: &FormatDescriptor) -> usize {
    descriptor.fields().iter().map(|f| f.byte_len()).sum()
}

/// Byte range occupied by the field at `index` in descriptor order.
///
/// Padding fields count toward the index the same way value fields do;
/// this mirrors how fields are located in the packed buffer, not in the
/// value sequence. Returns `None` when `index` is past the last field.
pub fn field_range(descriptor: &FormatDescriptor, index: usize) -> Option<Range<usize>> {
    let mut offset = 0;
    for (i, field) in descriptor.fields().iter().enumerate() {
        let len = field.byte_len();
        if i == index {
            return Some(offset..offset + len);
        }
        offset += len;
    }
    None
}

/// Byte ranges of every field in descriptor order.
pub fn field_ranges(descriptor: &FormatDescriptor) -> Vec<Range<usize>> {
    let mut ranges = Vec::with_capacity(descriptor.fields().len());
    let mut offset = 0;
    for field in descriptor.fields() {
        let len = field.byte_len();
        ranges.push(offset..offset + len);
        offset += len;
    }
    ranges
}
