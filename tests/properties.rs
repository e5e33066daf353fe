//! Property tests for coercion and default resolution.

use std::collections::HashMap;

use flagbind::{CoerceError, Environment, FieldValue, Kind, coerce, resolve};
use proptest::prelude::*;

macro_rules! round_trip {
    ($($name:ident: $ty:ty),* $(,)?) => {
        proptest! {
            $(
                #[test]
                fn $name(v in any::<$ty>()) {
                    let mut field: $ty = Default::default();
                    coerce(&mut field, &v.to_string()).unwrap();
                    prop_assert_eq!(field, v);
                }
            )*
        }
    };
}

round_trip!(
    round_trip_i8: i8,
    round_trip_i16: i16,
    round_trip_i32: i32,
    round_trip_i64: i64,
    round_trip_isize: isize,
    round_trip_u8: u8,
    round_trip_u16: u16,
    round_trip_u32: u32,
    round_trip_u64: u64,
    round_trip_usize: usize,
);

proptest! {
    #[test]
    fn f64_round_trip(v in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
        let mut field = 0.0f64;
        coerce(&mut field, &v.to_string()).unwrap();
        prop_assert_eq!(field, v);
    }

    #[test]
    fn f32_round_trip(v in proptest::num::f32::NORMAL | proptest::num::f32::ZERO) {
        let mut field = 0.0f32;
        coerce(&mut field, &v.to_string()).unwrap();
        prop_assert_eq!(field, v);
    }

    #[test]
    fn f32_beyond_max_overflows(v in (f32::MAX as f64 * 2.0)..f64::MAX, negative in any::<bool>()) {
        let v = if negative { -v } else { v };
        let mut field = 1.5f32;
        let err = coerce(&mut field, &v.to_string()).unwrap_err();
        prop_assert!(matches!(err, CoerceError::ValueOverflow { .. }), "{err:?}");
        prop_assert_eq!(field, 1.5);
    }

    #[test]
    fn usize_above_range_overflows(extra in 1u32..1000) {
        let raw = format!("{}{extra}", usize::MAX);
        let mut field: usize = 0;
        let err = coerce(&mut field, &raw).unwrap_err();
        prop_assert!(matches!(err, CoerceError::ValueOverflow { .. }), "{err:?}");
    }

    #[test]
    fn u8_above_range_overflows(v in 256u64..=u64::MAX) {
        let mut field: u8 = 0;
        let err = coerce(&mut field, &v.to_string()).unwrap_err();
        prop_assert!(matches!(err, CoerceError::ValueOverflow { .. }), "{err:?}");
        prop_assert_eq!(field, 0);
    }

    #[test]
    fn i16_outside_range_overflows(v in prop_oneof![i64::MIN..-32768i64, 32768i64..=i64::MAX]) {
        let mut field: i16 = 0;
        let err = coerce(&mut field, &v.to_string()).unwrap_err();
        prop_assert!(matches!(err, CoerceError::ValueOverflow { .. }), "{err:?}");
    }

    #[test]
    fn i32_beyond_i64_overflows(extra in 1u32..1000) {
        let raw = format!("9223372036854775807{extra}");
        let mut field: i32 = 0;
        let err = coerce(&mut field, &raw).unwrap_err();
        prop_assert!(matches!(err, CoerceError::ValueOverflow { .. }), "{err:?}");
    }

    #[test]
    fn sequence_preserves_call_order(values in proptest::collection::vec(any::<u32>(), 0..32)) {
        let mut field: Vec<u32> = Vec::new();
        for v in &values {
            coerce(&mut field, &v.to_string()).unwrap();
        }
        prop_assert_eq!(field, values);
    }

    #[test]
    fn map_keeps_latest_value_per_key(
        pairs in proptest::collection::vec(("[a-d]", "[a-z0-9]{0,4}"), 1..24)
    ) {
        let mut field: HashMap<String, String> = HashMap::new();
        let mut expected: HashMap<String, String> = HashMap::new();
        for (k, v) in &pairs {
            coerce(&mut field, &format!("{k}={v}")).unwrap();
            expected.insert(k.clone(), v.clone());
        }
        prop_assert_eq!(field, expected);
    }

    #[test]
    fn interpolation_substitutes_variable(value in "[a-z/]{0,12}") {
        let env = Environment::fixed([("DIR", value.as_str())]);
        let resolved = resolve("$DIR/bin", &Kind::String, &env).unwrap();
        prop_assert_eq!(resolved, format!("{value}/bin"));
    }

    #[test]
    fn integer_default_adds_offset(base in 0i64..1_000_000, offset in 0i64..1000) {
        let env = Environment::fixed([("BASE", base.to_string())]);
        let expr = format!("$BASE+{offset}");
        let resolved = resolve(&expr, &i64::kind(), &env).unwrap();
        prop_assert_eq!(resolved, (base + offset).to_string());
    }
}
