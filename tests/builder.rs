//! Tree-builder integration tests: the invariants and sealing rules that
//! govern how headers, array-of-tables, and dotted keys interact,
//! exercised through the public `loads` API end to end.

use toml_rt::Value;

#[test]
fn dotted_keys_build_nested_implicit_tables() {
    let table = toml_rt::loads("a.b.c = 1\na.b.d = 2\n").unwrap();
    let a = table.get("a").unwrap().as_table().unwrap();
    let b = a.get("b").unwrap().as_table().unwrap();
    assert_eq!(b.get("c").unwrap().as_integer(), Some(1));
    assert_eq!(b.get("d").unwrap().as_integer(), Some(2));
}

#[test]
fn header_promotes_an_implicit_ancestor_to_explicit() {
    let table = toml_rt::loads("[a.b]\nx = 1\n[a]\ny = 2\n").unwrap();
    let a = table.get("a").unwrap().as_table().unwrap();
    assert_eq!(a.get("y").unwrap().as_integer(), Some(2));
    let b = a.get("b").unwrap().as_table().unwrap();
    assert_eq!(b.get("x").unwrap().as_integer(), Some(1));
}

#[test]
fn array_of_tables_appends_a_fresh_element_each_header() {
    let table = toml_rt::loads("[[fruit]]\nname = \"apple\"\n[[fruit]]\nname = \"banana\"\n").unwrap();
    let fruit = table.get("fruit").unwrap().as_array().unwrap();
    assert_eq!(fruit.len(), 2);
    assert_eq!(fruit.get(0).unwrap().as_table().unwrap().get("name").unwrap().as_str(), Some("apple"));
    assert_eq!(fruit.get(1).unwrap().as_table().unwrap().get("name").unwrap().as_str(), Some("banana"));
}

#[test]
fn sub_table_header_extends_the_last_array_of_tables_element() {
    let table = toml_rt::loads(
        "[[fruit]]\nname = \"apple\"\n[fruit.physical]\ncolor = \"red\"\n[[fruit]]\nname = \"banana\"\n",
    )
    .unwrap();
    let fruit = table.get("fruit").unwrap().as_array().unwrap();
    assert_eq!(fruit.len(), 2);
    let apple = fruit.get(0).unwrap().as_table().unwrap();
    let physical = apple.get("physical").unwrap().as_table().unwrap();
    assert_eq!(physical.get("color").unwrap().as_str(), Some("red"));
    let banana = fruit.get(1).unwrap().as_table().unwrap();
    assert!(banana.get("physical").is_none());
}

#[test]
fn inline_table_is_closed_and_explicit() {
    let table = toml_rt::loads("point = { x = 1, y = 2 }\n").unwrap();
    let point = table.get("point").unwrap().as_table().unwrap();
    assert!(point.is_inline());
    assert!(point.is_closed());
}

#[test]
fn top_level_table_is_neither_inline_nor_explicit() {
    let table = toml_rt::loads("a = 1\n").unwrap();
    assert!(!table.is_inline());
    assert!(!table.is_explicit());
}

#[test]
fn explicit_header_table_is_marked_explicit() {
    let table = toml_rt::loads("[a]\nx = 1\n").unwrap();
    let a = table.get("a").unwrap().as_table().unwrap();
    assert!(a.is_explicit());
    assert!(!a.is_inline());
}

#[test]
fn insertion_order_is_preserved_for_encoder_stability() {
    let table = toml_rt::loads("z = 1\na = 2\nm = 3\n").unwrap();
    let keys: Vec<&str> = table.keys().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn semantic_equality_ignores_insertion_order() {
    let left = toml_rt::loads("a = 1\nb = 2\n").unwrap();
    let right = toml_rt::loads("b = 2\na = 1\n").unwrap();
    assert_eq!(Value::Table(left), Value::Table(right));
}

#[test]
fn empty_document_produces_an_empty_table() {
    let table = toml_rt::loads("").unwrap();
    assert!(table.is_empty());
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let table = toml_rt::loads("# a comment\n\n   \n# another\na = 1 # trailing\n").unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("a").unwrap().as_integer(), Some(1));
}

#[test]
fn quoted_keys_with_dots_are_single_segments() {
    let table = toml_rt::loads("\"a.b\" = 1\n").unwrap();
    assert_eq!(table.get("a.b").unwrap().as_integer(), Some(1));
    assert!(table.get("a").is_none());
}
