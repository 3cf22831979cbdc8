use std::collections::HashMap;

use classtype_core::lang::types::{generics, scalars};

#[test]
fn scalar_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, scalars::ScalarTypeId> = HashMap::new();

    for info in scalars::SCALAR_TYPES {
        assert_eq!(
            scalars::from_str(info.canonical),
            Some(info.id),
            "scalar canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(scalars::as_str(info.id), info.canonical);

        for &spelling in std::iter::once(&info.canonical).chain(info.aliases.iter()) {
            if let Some(prev) = seen.insert(spelling, info.id) {
                panic!("duplicate scalar spelling {:?}: {:?} and {:?}", spelling, prev, info.id);
            }
            assert_eq!(scalars::from_str(spelling), Some(info.id));
        }
    }
}

#[test]
fn generic_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, generics::GenericBaseId> = HashMap::new();

    for info in generics::GENERIC_BASES {
        assert_eq!(generics::as_str(info.id), info.canonical);
        for &spelling in std::iter::once(&info.canonical).chain(info.aliases.iter()) {
            if let Some(prev) = seen.insert(spelling, info.id) {
                panic!("duplicate generic spelling {:?}: {:?} and {:?}", spelling, prev, info.id);
            }
            assert_eq!(generics::from_str(spelling), Some(info.id));
        }
    }
}

#[test]
fn scalar_and_generic_vocabularies_do_not_overlap() {
    for info in generics::GENERIC_BASES {
        for &spelling in std::iter::once(&info.canonical).chain(info.aliases.iter()) {
            assert!(
                scalars::from_str(spelling).is_none(),
                "{spelling} is both a scalar and a generic base"
            );
        }
    }
}
