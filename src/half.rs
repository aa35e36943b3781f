//! IEEE 754-2008 binary16 conversion.
//!
//! The `e` type code stores floats in the 16-bit layout: 1 sign bit, 5
//! exponent bits (bias 15), 10 mantissa bits. Narrowing uses
//! round-to-nearest-even on the truncated mantissa bits; magnitudes above
//! the binary16 range round to signed infinity and magnitudes below the
//! subnormal range flush to signed zero. NaN payloads survive in the high
//! mantissa bits.

const HALF_SIGN_MASK: u16 = 0x8000;
const HALF_EXP_MASK: u16 = 0x7c00;
const HALF_MAN_MASK: u16 = 0x03ff;

/// Narrow an f32 to its binary16 bit pattern.
pub fn f32_to_f16_bits(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) as u16) & HALF_SIGN_MASK;
    let exp = ((bits >> 23) & 0xff) as i32;
    let mantissa = bits & 0x007f_ffff;

    if exp == 0xff {
        if mantissa == 0 {
            return sign | HALF_EXP_MASK;
        }
        // NaN: carry the high payload bits, keeping at least one mantissa
        // bit set so it stays a NaN
        let payload = ((mantissa >> 13) as u16) & HALF_MAN_MASK;
        return sign | HALF_EXP_MASK | if payload == 0 { 0x0200 } else { payload };
    }

    let unbiased = exp - 127;
    if unbiased > 15 {
        // Above the binary16 range, rounds to infinity
        return sign | HALF_EXP_MASK;
    }

    if unbiased >= -14 {
        // Normal range: rebias and round-to-nearest-even on the 13
        // truncated bits. A mantissa carry rolls into the exponent and the
        // result is still correct, including the roll to infinity.
        let mut half = (((unbiased + 15) as u32) << 10) | (mantissa >> 13);
        let dropped = mantissa & 0x1fff;
        if dropped > 0x1000 || (dropped == 0x1000 && half & 1 == 1) {
            half += 1;
        }
        return sign | half as u16;
    }

    if unbiased >= -25 {
        // Representable only as a binary16 subnormal
        let full = mantissa | 0x0080_0000;
        let shift = (13 + (-14 - unbiased)) as u32;
        let mut half = (full >> shift) as u16;
        let dropped = full & ((1u32 << shift) - 1);
        let halfway = 1u32 << (shift - 1);
        if dropped > halfway || (dropped == halfway && half & 1 == 1) {
            half += 1;
        }
        return sign | half;
    }

    // Too small for a subnormal, flushes to signed zero
    sign
}

/// Widen a binary16 bit pattern to f32.
pub fn f16_bits_to_f32(bits: u16) -> f32 {
    let sign = ((bits & HALF_SIGN_MASK) as u32) << 16;
    let exp = ((bits >> 10) & 0x1f) as u32;
    let mantissa = (bits & HALF_MAN_MASK) as u32;

    let out = match (exp, mantissa) {
        (0, 0) => sign,
        (0, _) => {
            // Subnormal: renormalize into the f32 exponent range
            let mut e = -14i32;
            let mut m = mantissa;
            while m & 0x0400 == 0 {
                m <<= 1;
                e -= 1;
            }
            sign | (((e + 127) as u32) << 23) | ((m & 0x03ff) << 13)
        }
        (0x1f, 0) => sign | 0x7f80_0000,
        (0x1f, _) => sign | 0x7f80_0000 | (mantissa << 13),
        _ => sign | ((exp + 127 - 15) << 23) | (mantissa << 13),
    };
    f32::from_bits(out)
}
