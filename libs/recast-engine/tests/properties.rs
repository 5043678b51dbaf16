//! Property tests for chain dispatch and copy semantics.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use recast_api::Record;
use recast_api::converter::{ConvertContext, ConverterKind, from_fn, typed};
use recast_api::schema::TypeInfo;
use recast_api::value::{BoxedValue, Value};
use recast_engine::chain::{Converted, ConverterChain, ResolvedConverter};
use recast_engine::Mapper;

#[derive(Record, Debug, Clone, Default, PartialEq)]
struct Source {
    label: Option<String>,
    count: i32,
}

#[derive(Record, Debug, Clone, Default, PartialEq)]
struct Target {
    label: Option<String>,
    count: Option<i64>,
    extra: u8,
}

/// Converter for `i32 -> i64` that adds `offset`, tagged `tag`.
fn offset(tag: &'static str, offset: i64) -> ResolvedConverter {
    typed(tag, move |v: &i32| Ok(i64::from(*v) + offset)).into()
}

const TAGS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

proptest! {
    #[test]
    fn same_type_never_consults_converters(n in any::<i64>()) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let probe = from_fn(
            "probe",
            move |_v: &Value<'_>, _t: TypeInfo| {
                seen.fetch_add(1, Ordering::SeqCst);
                true
            },
            |_v: &Value<'_>, _t: TypeInfo, _c: &ConvertContext<'_>| Ok(Box::new(0_i64) as BoxedValue),
        );
        let chain = ConverterChain::from_converters([probe]);

        let out = chain
            .convert(Some(Value::of(&n)), TypeInfo::of::<i64>(), &ConvertContext::detached())
            .unwrap();
        match out {
            Converted::Same(v) => {
                prop_assert_eq!(v.downcast_ref::<i64>(), Some(&n));
            }
            other => {
                prop_assert!(false, "expected Same, got {:?}", other);
            }
        }
        prop_assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn first_registered_supporting_converter_wins(
        offsets in proptest::collection::vec(-1000_i64..1000, 1..TAGS.len()),
        n in -10_000_i32..10_000,
    ) {
        let chain = ConverterChain::from_converters(
            offsets.iter().zip(TAGS).map(|(o, tag)| offset(tag, *o)),
        );

        for _ in 0..3 {
            let out = chain
                .convert(Some(Value::of(&n)), TypeInfo::of::<i64>(), &ConvertContext::detached())
                .unwrap();
            match out {
                Converted::Value(b) => {
                    prop_assert_eq!(b.downcast_ref::<i64>(), Some(&(i64::from(n) + offsets[0])));
                }
                other => {
                    prop_assert!(false, "expected Value, got {:?}", other);
                }
            }
        }
    }

    #[test]
    fn registration_is_idempotent(picks in proptest::collection::vec(0..TAGS.len(), 0..20)) {
        let mut chain = ConverterChain::new();
        let mut expected: Vec<ConverterKind> = Vec::new();
        for &i in &picks {
            let added = chain.register(offset(TAGS[i], 0));
            let kind = ConverterKind::new(TAGS[i]);
            prop_assert_eq!(added, !expected.contains(&kind));
            if added {
                expected.push(kind);
            }
        }
        prop_assert_eq!(chain.kinds(), expected.clone());

        // Registering everything again changes nothing.
        let again = chain.extend(picks.iter().map(|&i| offset(TAGS[i], 0)));
        prop_assert_eq!(again.kinds(), expected);
    }

    #[test]
    fn additional_converters_keep_origin_first(
        first in proptest::collection::vec(0..TAGS.len(), 0..8),
        extra in proptest::collection::vec(0..TAGS.len(), 0..8),
    ) {
        let origin = Mapper::with_converters(first.iter().map(|&i| offset(TAGS[i], 0)));
        let before = origin.chain().kinds();
        let derived = origin.with_additional_converters(extra.iter().map(|&i| offset(TAGS[i], 0)));

        prop_assert_eq!(origin.chain().kinds(), before.clone());
        let kinds = derived.chain().kinds();
        prop_assert_eq!(&kinds[..before.len()], &before[..]);
        for &i in extra.iter().chain(&first) {
            prop_assert!(kinds.contains(&ConverterKind::new(TAGS[i])));
        }
        let mut unique = kinds.clone();
        unique.sort_by_key(|k| k.as_str());
        unique.dedup();
        prop_assert_eq!(unique.len(), kinds.len());
    }

    #[test]
    fn copy_overwrites_linked_fields_only(
        label in proptest::option::of("[a-z]{0,8}"),
        count in any::<i32>(),
        old_label in proptest::option::of("[a-z]{0,8}"),
        old_count in proptest::option::of(any::<i64>()),
        extra in any::<u8>(),
    ) {
        let mapper = Mapper::with_converters([offset("widen", 0)]);
        let source = Source { label: label.clone(), count };
        let mut target = Target { label: old_label, count: old_count, extra };

        mapper.copy_into(&source, &mut target).unwrap();
        prop_assert_eq!(target.label, label);
        prop_assert_eq!(target.count, Some(i64::from(count)));
        prop_assert_eq!(target.extra, extra);
    }

    #[test]
    fn null_source_nulls_destination(old in proptest::option::of("[a-z]{1,8}")) {
        let mapper = Mapper::new();
        let mut target = Target { label: old, ..Target::default() };
        mapper.copy_into(&Source::default(), &mut target).unwrap();
        prop_assert_eq!(target.label, None);
    }
}
