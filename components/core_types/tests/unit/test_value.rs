//! Unit tests for Value, GcRef and StrView

use core_types::{DictKind, GcRef, StrView, Tag, Value};

#[test]
fn test_default_value_is_none() {
    assert_eq!(Value::default(), Value::None);
    assert!(Value::default().is_none());
}

#[test]
fn test_bool_conversion() {
    assert_eq!(Value::from_bool(false), Value::FALSE);
    assert_eq!(Value::from_bool(true).as_number(), Some(1.0));
}

#[test]
fn test_accessors_reject_other_tags() {
    let r = GcRef::new(0, 0);
    assert_eq!(Value::List(r).as_dict(), None);
    assert_eq!(Value::Dict(r, DictKind::Raw).as_list(), None);
    assert_eq!(Value::Number(1.0).as_str(), None);
    assert_eq!(Value::Function(r).as_function(), Some(r));
}

#[test]
fn test_string_value_tag() {
    let s = Value::Str(StrView::whole(GcRef::new(2, 0), 5));
    assert_eq!(s.tag(), Tag::Str);
    assert_eq!(s.tag().name(), "string");
}

#[test]
fn test_dict_kind_default_is_raw() {
    assert_eq!(DictKind::default(), DictKind::Raw);
    assert_eq!(DictKind::Object as u8, 2);
}

#[test]
fn test_substring_empty_view() {
    let s = StrView::whole(GcRef::new(0, 0), 0);
    let v = s.substring(-1, 5);
    assert!(v.is_empty());
}
