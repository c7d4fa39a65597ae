use assoc_maps::{
    string_hash, ChainedHashMap, FnHashing, StdHashing, DEFAULT_BUCKET_COUNT,
    DEFAULT_LOAD_FACTOR,
};
use std::rc::Rc;

#[test]
fn defaults_and_basic_ops() {
    let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
    assert_eq!(m.bucket_count(), DEFAULT_BUCKET_COUNT);
    assert_eq!(m.load_factor(), DEFAULT_LOAD_FACTOR);
    assert!(m.is_empty());

    assert_eq!(m.put("a".to_string(), 1), None);
    assert_eq!(m.put("a".to_string(), 2), Some(1));
    assert_eq!(m.len(), 1);
    assert_eq!(m.get("a"), Some(&2));
    if let Some(v) = m.get_mut("a") {
        *v += 1;
    }
    assert_eq!(m.get("a"), Some(&3));
    assert_eq!(m.remove("missing"), None);
    assert_eq!(m.remove("a"), Some(3));
    assert!(m.is_empty());
}

/// Invariant: growth keeps every key reachable and the bucket count follows
/// 11, 23, 47, ...
#[test]
fn grows_through_several_rehashes() {
    let mut m: ChainedHashMap<String, usize> = ChainedHashMap::new();
    for i in 0..9 {
        m.put(format!("key{i}"), i);
    }
    // floor(11 * 0.75) = 8
    assert_eq!(m.bucket_count(), 23);
    for i in 9..1000 {
        m.put(format!("key{i}"), i);
    }
    let mut expected = DEFAULT_BUCKET_COUNT;
    while (((expected as f32) * DEFAULT_LOAD_FACTOR) as usize) < 1000 {
        expected = expected * 2 + 1;
    }
    assert_eq!(m.bucket_count(), expected);
    for i in 0..1000 {
        assert_eq!(m.get(format!("key{i}").as_str()), Some(&i));
    }
}

#[test]
fn null_key_is_a_separate_slot() {
    let mut m: ChainedHashMap<String, &'static str> = ChainedHashMap::new();
    // The empty string hashes to 0, like the null key.
    assert_eq!(string_hash(""), 0);
    m.put(String::new(), "empty");
    assert_eq!(m.put_null("null"), None);
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(""), Some(&"empty"));
    assert_eq!(m.get_null(), Some(&"null"));
    assert!(m.keys().any(|k| k.is_none()));
    assert_eq!(m.remove_null(), Some("null"));
    assert!(!m.contains_null_key());
    assert_eq!(m.get(""), Some(&"empty"));
}

#[test]
fn custom_function_pair() {
    fn ci_hash(k: &String) -> u32 {
        string_hash(&k.to_ascii_lowercase())
    }
    fn ci_eq(a: &String, b: &String) -> bool {
        a.eq_ignore_ascii_case(b)
    }
    let mut m = ChainedHashMap::with_hashing(FnHashing::new(ci_hash, ci_eq));
    m.put("Hello".to_string(), 1);
    assert_eq!(m.put("HELLO".to_string(), 2), Some(1));
    assert_eq!(m.len(), 1);
    assert_eq!(m.keys().next(), Some(Some(&"Hello".to_string())));
    assert_eq!(m.get(&"hello".to_string()), Some(&2));
}

#[test]
fn std_hashing_for_integer_keys() {
    let mut m: ChainedHashMap<u64, u64, StdHashing> = ChainedHashMap::default();
    for k in 0..500 {
        m.put(k, k * k);
    }
    assert_eq!(m.len(), 500);
    assert_eq!(m.get(&21), Some(&441));
    assert!(m.contains_value(&(499 * 499)));
    assert!(!m.contains_value(&2));
}

#[test]
fn clear_keeps_bucket_count() {
    let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
    for i in 0..50 {
        m.put(i.to_string(), i);
    }
    let buckets = m.bucket_count();
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.bucket_count(), buckets);
    assert_eq!(m.iter().count(), 0);
    m.put("x".to_string(), 1);
    assert_eq!(m.len(), 1);
}

/// Invariant: a clone has its own structure but aliases `Rc` payloads.
#[test]
fn clone_shares_payloads_not_structure() {
    let mut m: ChainedHashMap<String, Rc<str>> = ChainedHashMap::new();
    let shared: Rc<str> = Rc::from("payload");
    m.put("a".to_string(), shared.clone());
    m.put("b".to_string(), shared.clone());

    let mut c = m.clone();
    assert!(Rc::ptr_eq(c.get("a").unwrap(), &shared));
    c.remove("a");
    c.put("z".to_string(), Rc::from("other"));

    assert!(m.contains_key("a"));
    assert!(!m.contains_key("z"));
    assert_eq!(c.len(), 2);
    assert_eq!(Rc::strong_count(&shared), 4);
}
