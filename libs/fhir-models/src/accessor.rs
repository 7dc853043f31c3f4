//! Lookup and comparison helpers over collections of resources.

use crate::Resource;
use serde_json::Value;

/// Elements that may legitimately differ between a read and a search copy of
/// the same resource: the logical id and the generated narrative.
pub const IDENTITY_IGNORED: &[&str] = &["id", "text"];

/// Find the record whose logical id equals `id`.
pub fn find_by_id<'a, R: Resource>(collection: &'a [R], id: &str) -> Option<&'a R> {
    collection.iter().find(|r| r.id() == Some(id))
}

/// Deep-compare two resources, skipping any element named in `ignored` at
/// every nesting level.
///
/// Resources that fail to serialize compare unequal.
pub fn equals_ignoring<R: Resource>(a: &R, b: &R, ignored: &[&str]) -> bool {
    match (a.to_value(), b.to_value()) {
        (Ok(a), Ok(b)) => values_equal_ignoring(&a, &b, ignored),
        _ => false,
    }
}

pub fn values_equal_ignoring(a: &Value, b: &Value, ignored: &[&str]) -> bool {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => {
            let kept = |(k, _): &(&String, &Value)| !ignored.contains(&k.as_str());
            let a_count = a.iter().filter(kept).count();
            let b_count = b.iter().filter(kept).count();
            a_count == b_count
                && a.iter().filter(kept).all(|(k, av)| {
                    b.get(k)
                        .is_some_and(|bv| values_equal_ignoring(av, bv, ignored))
                })
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b)
                    .all(|(av, bv)| values_equal_ignoring(av, bv, ignored))
        }
        _ => a == b,
    }
}
