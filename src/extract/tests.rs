// Extractor tests.

use super::*;

const ITEM: &str =
    r#"<div id="item_123" data-slug="/items/123">Foo Bar Item <span>* - rare</span></div>"#;

fn one(value: &str) -> Option<Extracted> {
    Some(OneOrMany::One(value.to_string()))
}

#[test]
fn test_extract_groups() {
    let extractor = Extractor::new(ITEM, None);
    assert_eq!(
        extractor.extract(r#"id="item_(\d*)""#, None, true, None).expect("match"),
        one("123")
    );

    let named = r#"id="item_(?P<id>\d*)""#;
    assert_eq!(
        extractor.extract(named, Some(1.into()), true, None).expect("match"),
        one("123")
    );
    assert_eq!(
        extractor.extract(named, Some("id".into()), true, None).expect("match"),
        one("123")
    );
}

#[test]
fn test_extract_without_groups_returns_whole_match() {
    let extractor = Extractor::new(ITEM, None);
    assert_eq!(
        extractor.extract(r"\d+", None, true, None).expect("match"),
        one("123")
    );
}

#[test]
fn test_extract_multiple_groups() {
    let extractor = Extractor::new(ITEM, None);
    let result = extractor
        .extract(r#"id="(\w+)_(\d+)""#, None, true, None)
        .expect("match");
    assert_eq!(
        result,
        Some(OneOrMany::Many(vec!["item".to_string(), "123".to_string()]))
    );
}

#[test]
fn test_extract_miss_strict_and_relaxed() {
    let extractor = Extractor::new(ITEM, Some("https://example.org/item"));
    assert_eq!(extractor.extract("nothing", None, false, None).expect("relaxed"), None);

    let error = extractor
        .extract("nothing", None, true, None)
        .expect_err("strict");
    assert_eq!(error.pattern, "nothing");
    assert_eq!(error.url.as_deref(), Some("https://example.org/item"));
    assert!(error.snippet().is_some_and(|s| s.starts_with("<div")));
}

#[test]
fn test_extract_all() {
    let extractor = Extractor::new(
        r#"<div id="item_1">Item 1</div><div id="item_2">Item 2</div><div id="item_3">Item 3</div>"#,
        None,
    );
    let pattern = r#"id="item_(?P<id>\d*)">([^<]*)"#;
    let ids = vec![one("1"), one("2"), one("3")];
    assert_eq!(
        extractor.extract_all(pattern, Some("id".into()), false, None).expect("all"),
        ids
    );
    assert_eq!(
        extractor.extract_all(pattern, Some(1.into()), false, None).expect("all"),
        ids
    );
    assert_eq!(
        extractor.extract_all(pattern, Some("wrong".into()), false, None).expect("all"),
        vec![None, None, None]
    );
    assert!(extractor
        .extract_all("absent", None, false, None)
        .expect("relaxed")
        .is_empty());
    assert!(extractor.extract_all("absent", None, true, None).is_err());
}

#[test]
fn test_check_and_flags() {
    let extractor = Extractor::new(ITEM, None);
    assert!(extractor.check(r#"data-slug=".*""#, None).expect("valid"));
    assert!(!extractor.check(r#"data-slug=".*777""#, None).expect("valid"));
    assert!(!extractor.check("FOO BAR", None).expect("valid"));
    assert!(extractor.check("FOO BAR", Some("i")).expect("valid"));
    assert!(extractor.check("(unclosed", None).is_err());
}

#[test]
fn test_equal() {
    let extractor = Extractor::new(ITEM, None);
    let slug = r#"data-slug="([^"]*)""#;
    assert!(extractor.equal(slug, "/items/123", None, false, true, None).expect("eq"));
    assert!(!extractor.equal(slug, "/items/777", None, false, true, None).expect("eq"));
    assert!(extractor.equal(slug, "/Items/123", None, false, true, None).expect("eq"));
    assert!(!extractor.equal(slug, "/Items/123", None, true, true, None).expect("eq"));
    assert!(extractor
        .equal(r#"data-slug="(?P<slug>[^"]*)""#, "/items/123", Some("slug".into()), false, true, None)
        .expect("eq"));
}

#[test]
fn test_clean_out() {
    let extractor = Extractor::new(ITEM, None);
    let cleaned = extractor
        .clean_out(vec![r"<span>.*?</span>", r"<[^>]+>"], None)
        .expect("clean");
    assert_eq!(cleaned, "Foo Bar Item ");
}

#[test]
fn test_from_response() {
    let response = Response::new(Some("https://example.org/"), 200, Some("<b>42</b>"), None);
    let extractor = Extractor::from_response(&response);
    assert_eq!(extractor.url(), Some("https://example.org/"));
    assert_eq!(
        extractor.extract(r"<b>(\d+)</b>", None, true, None).expect("match"),
        one("42")
    );
}
