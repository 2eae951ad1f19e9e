// Utils module tests.

use super::*;

#[test]
fn test_clarify_trims_and_drops_blank() {
    assert_eq!(clarify(Some("  foo ")), Some("foo".to_string()));
    assert_eq!(clarify(Some("   ")), None);
    assert_eq!(clarify(Some("")), None);
    assert_eq!(clarify(None), None);
}

#[test]
fn test_one_or_many_from_str() {
    let one: OneOrMany<String> = "value".into();
    assert_eq!(one, OneOrMany::One("value".to_string()));
    assert_eq!(one.len(), 1);
    assert_eq!(one.as_one().map(String::as_str), Some("value"));
}

#[test]
fn test_one_or_many_from_list_keeps_order() {
    let many: OneOrMany<String> = ["a", "b", "c"].into();
    assert_eq!(many.len(), 3);
    assert_eq!(many.as_one(), None);
    assert_eq!(many.first().map(String::as_str), Some("a"));
    assert_eq!(many.into_vec(), vec!["a", "b", "c"]);
}

#[test]
fn test_one_or_many_empty_many() {
    let empty: OneOrMany<u8> = Vec::new().into();
    assert!(empty.is_empty());
    assert_eq!(empty.first(), None);
}
