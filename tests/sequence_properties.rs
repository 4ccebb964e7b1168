//! Property tests for bounded sequences and multi-valued fields

use proptest::prelude::*;

use xsdtypes::{
    BuiltinType, ComplexType, Element, Error, MaxOccurs, ModelGroup, Occurs, TypedSequence, Value,
};

proptest! {
    #[test]
    fn push_never_exceeds_max_len(max in 0u32..8, values in prop::collection::vec(any::<i64>(), 0..16)) {
        let mut seq = TypedSequence::with_max_len(BuiltinType::Integer, MaxOccurs::Bounded(max));
        for v in &values {
            let before = seq.len();
            match seq.push(*v) {
                Ok(()) => prop_assert_eq!(seq.len(), before + 1),
                Err(Error::OutOfBounds(_)) => {
                    prop_assert_eq!(before, max as usize);
                    prop_assert_eq!(seq.len(), before);
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
        prop_assert_eq!(seq.len(), values.len().min(max as usize));
    }

    #[test]
    fn indexed_set_keeps_length(values in prop::collection::vec(any::<i64>(), 1..8), replacement in any::<i64>()) {
        let max = values.len() as u32;
        let mut seq = TypedSequence::with_max_len(BuiltinType::Integer, MaxOccurs::Bounded(max));
        seq.extend(values.iter().copied()).unwrap();

        for index in 0..values.len() {
            seq.set(index, replacement).unwrap();
            prop_assert_eq!(seq.len(), values.len());
        }
        prop_assert!(seq.iter().all(|v| v.as_i64() == Some(replacement)));
    }

    #[test]
    fn integer_and_float_items_compare_equal(values in prop::collection::vec(-1_000_000i64..1_000_000, 0..8)) {
        let mut ints = TypedSequence::new(BuiltinType::Integer);
        let mut floats = TypedSequence::new(BuiltinType::Integer);
        ints.extend(values.iter().copied()).unwrap();
        floats.extend(values.iter().map(|v| *v as f64)).unwrap();
        prop_assert_eq!(&ints, &floats);

        let mut positives = TypedSequence::new(BuiltinType::PositiveInteger);
        positives.extend(values.iter().filter(|v| **v > 0).copied()).unwrap();
        prop_assert_ne!(&positives, &ints);
    }

    #[test]
    fn set_replaces_previous_items(
        first in prop::collection::vec("[a-z]{1,8}", 0..6),
        second in prop::collection::vec("[a-z]{1,8}", 0..6),
    ) {
        let ct = ComplexType::builder("Tags")
            .content(ModelGroup::sequence([Element::builder()
                .name("tag")
                .data_type(BuiltinType::String)
                .occurs(Occurs::zero_or_more())
                .build()
                .unwrap()]))
            .build()
            .unwrap();
        let mut tags = ct.instantiate();

        tags.set_all("tag", first.clone()).unwrap();
        tags.set_all("tag", second.clone()).unwrap();

        let stored = tags.get("tag").unwrap().and_then(Value::as_sequence).unwrap();
        let expected: Vec<Value> = second.into_iter().map(Value::from).collect();
        prop_assert_eq!(stored, &expected);
    }
}
