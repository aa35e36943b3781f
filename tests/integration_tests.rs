//! End-to-end tests for the structpack codec, including wire-compatibility
//! vectors against Python's `struct` module output.

use structpack::{calc_size, codec, pack, unpack, FormatDescriptor, PackError, Value};

/// Assert that packing produces exactly the given hex string.
fn assert_packs_to(format: &str, values: &[Value], expected_hex: &str) {
    let packed = pack(format, values).unwrap();
    assert_eq!(
        hex::encode(&packed),
        expected_hex,
        "format {:?} values {:?}",
        format,
        values
    );
}

#[test]
fn test_python_struct_integer_vectors() {
    // Outputs of struct.pack() for the same format/value pairs
    assert_packs_to("<b", &[Value::Int(42)], "2a");
    assert_packs_to(">b", &[Value::Int(42)], "2a");
    assert_packs_to("<b", &[Value::Int(-12)], "f4");
    assert_packs_to("<B", &[Value::UInt(200)], "c8");
    assert_packs_to("<h", &[Value::Int(0x3039)], "3930");
    assert_packs_to(">h", &[Value::Int(0x3039)], "3039");
    assert_packs_to("<i", &[Value::Int(1)], "01000000");
    assert_packs_to(">i", &[Value::Int(1)], "00000001");
    assert_packs_to("<I", &[Value::UInt(0xdeadbeef)], "efbeadde");
    assert_packs_to(">I", &[Value::UInt(0xdeadbeef)], "deadbeef");
}

#[test]
fn test_wide_integers_against_std_byte_order() {
    // i64/u64 lanes checked against the standard library's byte encoding
    let v: i64 = -0x0123_4567_89ab_cdef;
    assert_eq!(pack("<q", &[Value::Int(v)]).unwrap(), v.to_le_bytes());
    assert_eq!(pack(">q", &[Value::Int(v)]).unwrap(), v.to_be_bytes());

    let u: u64 = 0xfedc_ba98_7654_3210;
    assert_eq!(pack("<Q", &[Value::UInt(u)]).unwrap(), u.to_le_bytes());
    assert_eq!(pack(">Q", &[Value::UInt(u)]).unwrap(), u.to_be_bytes());
}

#[test]
fn test_floats_against_std_byte_order() {
    let f: f32 = 3.14159;
    assert_eq!(pack("<f", &[Value::from(f)]).unwrap(), f.to_le_bytes());
    assert_eq!(pack(">f", &[Value::from(f)]).unwrap(), f.to_be_bytes());

    let d: f64 = 2.71828182845904;
    assert_eq!(pack("<d", &[Value::Float(d)]).unwrap(), d.to_le_bytes());
    assert_eq!(pack(">d", &[Value::Float(d)]).unwrap(), d.to_be_bytes());
}

#[test]
fn test_compound_format_with_padding() {
    // struct.pack("<bxh", 120, 32000) == b"\x78\x00\x00\x7d"
    assert_packs_to("<bxh", &[Value::Int(120), Value::Int(32000)], "7800007d");
    assert_packs_to(">bxh", &[Value::Int(120), Value::Int(32000)], "78007d00");
    assert_eq!(calc_size("<bxh").unwrap(), 4);
}

#[test]
fn test_byte_string_vectors() {
    // struct.pack("<5s", b"Hi") == b"Hi\x00\x00\x00"
    assert_packs_to("<5s", &[Value::from(b"Hi")], "4869000000");
    assert_packs_to("<5s", &[Value::from(b"Hello")], "48656c6c6f");
    assert_packs_to(">10s", &[Value::from(b"Python123")], "507974686f6e31323300");
}

#[test]
fn test_expansion_law() {
    assert_eq!(
        FormatDescriptor::parse("<3b").unwrap(),
        FormatDescriptor::parse("<bbb").unwrap()
    );

    let string_field = FormatDescriptor::parse("<5s").unwrap();
    assert_eq!(string_field.fields().len(), 1);
    assert_eq!(string_field.size(), 5);

    // Same values pack identically through both spellings
    let values = [Value::Int(10), Value::Int(20), Value::Int(30)];
    assert_eq!(
        pack("<3b", &values).unwrap(),
        pack("<bbb", &values).unwrap()
    );
}

#[test]
fn test_round_trip_all_kinds() {
    let format = "<bBhHiIqQd5s";
    let values = vec![
        Value::Int(-12),
        Value::UInt(0x12),
        Value::Int(-1234),
        Value::UInt(0x3456),
        Value::Int(-12345678),
        Value::UInt(0x789a_bcde),
        Value::Int(-0x0123_4567_89ab_cdef),
        Value::UInt(0xfedc_ba98_7654_3210),
        Value::Float(2.71828182845904),
        Value::Bytes(b"abcde".to_vec()),
    ];

    let packed = pack(format, &values).unwrap();
    assert_eq!(unpack(format, &packed).unwrap(), values);

    // Big-endian round-trips identically at the value level
    let packed = pack(">bBhHiIqQd5s", &values).unwrap();
    assert_eq!(unpack(">bBhHiIqQd5s", &packed).unwrap(), values);
}

#[test]
fn test_round_trip_random_integers() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let values = vec![
            Value::Int(rng.gen_range(i8::MIN as i64..=i8::MAX as i64)),
            Value::UInt(rng.gen_range(0..=u16::MAX as u64)),
            Value::Int(rng.gen_range(i32::MIN as i64..=i32::MAX as i64)),
            Value::UInt(rng.gen()),
            Value::Int(rng.gen()),
        ];
        for format in ["<bHiQq", ">bHiQq"] {
            let packed = pack(format, &values).unwrap();
            assert_eq!(unpack(format, &packed).unwrap(), values, "format {}", format);
        }
    }
}

#[test]
fn test_half_float_within_one_ulp() {
    let packed = pack("<e", &[Value::Float(3.14)]).unwrap();
    let values = unpack("<e", &packed).unwrap();
    match values[0] {
        // binary16 nearest to 3.14; one ulp here is 2^-9
        Value::Float(v) => assert!((v - 3.140625).abs() <= f64::from(2.0f32.powi(-9))),
        ref other => panic!("expected float, got {:?}", other),
    }
}

#[test]
fn test_half_float_exact_values_round_trip() {
    for &input in &[0.0f64, -0.0, 1.0, -1.0, 0.5, -0.5, 65504.0, -65504.0] {
        let packed = pack("<e", &[Value::Float(input)]).unwrap();
        let values = unpack("<e", &packed).unwrap();
        assert_eq!(values, vec![Value::Float(input)], "input {}", input);
    }
}

#[test]
fn test_half_float_special_values() {
    // Overflow beyond the binary16 maximum rounds to signed infinity
    let packed = pack("<e", &[Value::Float(65536.0)]).unwrap();
    match unpack("<e", &packed).unwrap()[0] {
        Value::Float(v) => assert!(v.is_infinite() && v > 0.0),
        ref other => panic!("expected float, got {:?}", other),
    }

    let packed = pack("<e", &[Value::Float(f64::NEG_INFINITY)]).unwrap();
    match unpack("<e", &packed).unwrap()[0] {
        Value::Float(v) => assert!(v.is_infinite() && v < 0.0),
        ref other => panic!("expected float, got {:?}", other),
    }

    let packed = pack("<e", &[Value::Float(f64::NAN)]).unwrap();
    match unpack("<e", &packed).unwrap()[0] {
        Value::Float(v) => assert!(v.is_nan()),
        ref other => panic!("expected float, got {:?}", other),
    }

    // Below the subnormal range flushes to zero
    let packed = pack("<e", &[Value::Float(1.0e-12)]).unwrap();
    assert_eq!(hex::encode(&packed), "0000");
}

#[test]
fn test_half_float_subnormal_unpack() {
    // Raw subnormal bit patterns decode to small positive floats
    for buf in [[0x01u8, 0x00], [0x00, 0x02]] {
        match unpack("<e", &buf).unwrap()[0] {
            Value::Float(v) => assert!(v > 0.0 && v < 6.2e-5, "bits {:02x?} -> {}", buf, v),
            ref other => panic!("expected float, got {:?}", other),
        }
    }
}

#[test]
fn test_field_ranges_locate_packed_fields() {
    let format = "<bBhHiIqQefd4x";
    let descriptor = FormatDescriptor::parse(format).unwrap();
    let values = vec![
        Value::Int(-12),
        Value::UInt(0x12),
        Value::Int(-1234),
        Value::UInt(0x3456),
        Value::Int(-12345678),
        Value::UInt(0x789a_bcde),
        Value::Int(-1),
        Value::UInt(u64::MAX),
        Value::Float(1.0),
        Value::Float(3.14159),
        Value::Float(2.71828182845904),
    ];
    let packed = pack(format, &values).unwrap();

    // Scalar fields are addressable by descriptor index
    let range = descriptor.field_range(0).unwrap();
    assert_eq!(packed[range][0] as i8, -12);
    let range = descriptor.field_range(1).unwrap();
    assert_eq!(packed[range][0], 0x12);

    // The trailing padding field is index 11 and spans its full count
    let range = descriptor.field_range(11).unwrap();
    assert_eq!(range.len(), 4);
    assert_eq!(range.end, descriptor.size());
    assert_eq!(&packed[range], &[0, 0, 0, 0]);

    // Past the last field there is nothing to address
    assert_eq!(descriptor.field_range(12), None);
    assert_eq!(descriptor.field_range(100), None);
}

#[test]
fn test_error_vectors() {
    assert!(matches!(
        pack("Z", &[Value::Int(0)]).unwrap_err(),
        PackError::MalformedFormat { position: 0, .. }
    ));
    assert!(matches!(
        pack("<", &[]).unwrap_err(),
        PackError::MalformedFormat { .. }
    ));
    assert_eq!(
        pack("<B", &[Value::UInt(300)]).unwrap_err(),
        PackError::IntegerOverflow {
            field: 0,
            value: "300".to_string(),
            target: "uint8",
        }
    );
    assert_eq!(
        pack("<5s", &[Value::from(b"toolong")]).unwrap_err(),
        PackError::StringTooLong {
            field: 0,
            length: 7,
            declared: 5,
        }
    );
    assert!(matches!(
        unpack("<iI", &[0u8; 4]).unwrap_err(),
        PackError::BufferTooSmall {
            needed: 8,
            available: 4,
        }
    ));
}

#[test]
fn test_descriptor_reuse_across_calls() {
    // One descriptor, many records: the descriptor is immutable and the
    // codec takes it by shared reference
    let descriptor = FormatDescriptor::parse("<Hd").unwrap();
    let mut buffer = vec![0u8; descriptor.size()];

    for i in 0..10u64 {
        let values = [Value::UInt(i), Value::Float(i as f64 * 0.25)];
        let written = codec::pack_into(&descriptor, &values, &mut buffer).unwrap();
        assert_eq!(written, 10);
        assert_eq!(codec::unpack(&descriptor, &buffer).unwrap(), values);
    }
}
