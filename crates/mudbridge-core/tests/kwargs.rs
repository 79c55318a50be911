//! Typed kwarg access tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use mudbridge_core::protocol::{decode, KwargMap, KwargStore, KwargValue, MessageEnvelope};
use mudbridge_core::BridgeError;

#[test]
fn bool_kwarg_reads_back_as_bool_only() {
    let mut store = KwargStore::new();
    store.set("NOCOLOR", true);

    assert!(store.get::<bool>("NOCOLOR").unwrap());

    let err = store.get::<String>("NOCOLOR").unwrap_err();
    match err {
        BridgeError::KwargType { key, expected, found } => {
            assert_eq!(key, "NOCOLOR");
            assert_eq!(expected, "string");
            assert_eq!(found, "bool");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_key_is_an_error_not_a_default() {
    let store = KwargStore::new();
    let err = store.get::<bool>("NOCOLOR").unwrap_err();
    assert_eq!(err.code().as_str(), "KWARG_MISSING");
    assert!(store.get_opt::<bool>("NOCOLOR").unwrap().is_none());
}

#[test]
fn falsy_value_is_distinct_from_absent() {
    let env = decode(r#"["client_options", [], {"NOCOLOR": false}]"#).unwrap();
    assert!(env.has_kwarg("NOCOLOR"));
    assert!(!env.get_kwarg::<bool>("NOCOLOR").unwrap());
    assert!(!env.has_kwarg("INPUTDEBUG"));
}

#[test]
fn empty_store_never_fails() {
    let env = MessageEnvelope::new("text");
    assert_eq!(env.kwarg_count(), 0);
    assert!(!env.has_kwarg("anything"));
    assert!(env.kwargs().is_empty());
}

#[test]
fn set_replaces_prior_entry() {
    let mut store = KwargStore::new();
    store.set("ENCODING", "latin-1");
    store.set("ENCODING", "utf-8");
    assert_eq!(store.count(), 1);
    assert_eq!(store.get::<String>("ENCODING").unwrap(), "utf-8");
}

#[test]
fn numbers_coerce_only_when_they_fit() {
    let env = decode(r#"["x", [], {"n": 3, "neg": -2, "f": 1.5}]"#).unwrap();
    assert_eq!(env.get_kwarg::<u64>("n").unwrap(), 3);
    assert_eq!(env.get_kwarg::<i64>("neg").unwrap(), -2);
    assert_eq!(env.get_kwarg::<f64>("f").unwrap(), 1.5);
    assert_eq!(env.get_kwarg::<f64>("n").unwrap(), 3.0);
    assert!(env.get_kwarg::<u64>("neg").is_err());
    assert!(env.get_kwarg::<i64>("f").is_err());
}

#[test]
fn nested_map_is_preserved() {
    let env = decode(r#"["x", [], {"options": {"raw": true, "depth": 2}}]"#).unwrap();
    let opts = env.get_kwarg::<KwargMap>("options").unwrap();
    assert_eq!(opts.get("raw"), Some(&KwargValue::Bool(true)));
    assert_eq!(opts.get("depth"), Some(&KwargValue::from(2_u64)));
    assert!(env.get_kwarg::<bool>("options").is_err());
}

#[test]
fn non_finite_float_becomes_null() {
    assert_eq!(KwargValue::from(f64::NAN), KwargValue::Null);
}
