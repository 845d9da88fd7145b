use cim_golden::codec::{decode, encode, sign_extend, truncate, DecodeError, HexCase, HexFormat};
use proptest::prelude::*;

fn mask(w: u32) -> u64 {
    if w == 64 { u64::MAX } else { (1u64 << w) - 1 }
}

/// A width together with a value representable in it (signed or unsigned reading).
fn representable() -> impl Strategy<Value = (u32, i64)> {
    (1u32..=62).prop_flat_map(|w| (Just(w), -(1i64 << (w - 1))..(1i64 << w)))
}

proptest! {
    #[test]
    fn decode_inverts_encode((w, v) in representable()) {
        let text = encode(v, w).unwrap();
        prop_assert_eq!(text.len(), ((w + 3) / 4) as usize);
        prop_assert_eq!(decode(&text).unwrap(), (v as u64) & mask(w));
    }

    #[test]
    fn signed_values_survive_sign_extension(v in any::<i32>()) {
        let raw = decode(&encode(v as i64, 32).unwrap()).unwrap();
        prop_assert_eq!(sign_extend(raw, 32), v as i64);
    }

    #[test]
    fn negative_inputs_always_carry_sign_bit(v in i64::MIN..0, w in 1u32..=64) {
        prop_assert!(truncate(v, w) >> (w - 1) & 1 == 1);
    }

    #[test]
    fn case_only_changes_letters(v in any::<i64>(), w in 1u32..=64) {
        let upper = HexFormat::new(w, HexCase::Upper).unwrap().encode(v);
        let lower = HexFormat::new(w, HexCase::Lower).unwrap().encode(v);
        prop_assert_eq!(upper.to_ascii_lowercase(), lower.clone());
        prop_assert_eq!(decode(&upper).unwrap(), decode(&lower).unwrap());
    }
}

#[test]
fn accumulator_22_bit_negative_sets_bit_21() {
    for v in [-1i64, -2, -1000, -(1 << 21)] {
        let text = HexFormat::ACC22_UPPER.encode(v);
        assert_eq!(text.len(), 6);
        let raw = decode(&text).unwrap();
        assert_ne!(raw & (1 << 21), 0, "{v} -> {text}");
        assert_eq!(raw >> 22, 0);
    }
    assert_eq!(decode(&HexFormat::ACC22_UPPER.encode(1000)).unwrap() & (1 << 21), 0);
}

#[test]
fn explicit_sign_bit_differs_from_masking_when_out_of_range() {
    // -(2^22) + 5 masks to 5 under pure masking; the sign bit is forced on top.
    let v = -(1i64 << 22) + 5;
    assert_eq!((v as u64) & mask(22), 5);
    assert_eq!(truncate(v, 22), (1 << 21) | 5);
    assert_eq!(HexFormat::ACC22_UPPER.encode(v), "200005");
}

#[test]
fn wide_lower_case_results() {
    let f = HexFormat::new(26, HexCase::Lower).unwrap().with_digits(8).unwrap();
    assert_eq!(f, HexFormat::ACC26_WIDE_LOWER);
    assert_eq!(f.encode(-1), "03ffffff");
    assert_eq!(f.to_string(), "26-bit/8 digits (lower)");
}

#[test]
fn decode_failures() {
    assert_eq!(decode(""), Err(DecodeError::Empty));
    assert_eq!(decode("0g"), Err(DecodeError::InvalidDigit { ch: 'g', column: 2 }));
    assert!(matches!(decode(" 1"), Err(DecodeError::InvalidDigit { column: 1, .. })));
    assert!(matches!(decode("-1"), Err(DecodeError::InvalidDigit { .. })));
}
