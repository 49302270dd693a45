//! Key Builder
//!
//! Deterministic cache keys from a namespace and a call's arguments.
//!
//! Arguments are converted to a `serde_json::Value` and written out with
//! object keys sorted at every depth, so named arguments hash the same no
//! matter what order the caller supplied them in, whether or not serde_json's
//! `preserve_order` feature is enabled. The canonical text is hashed with
//! seahash (64-bit). This is not a security boundary; it only needs to be
//! stable and low-collision.
//!
//! Non-finite floats (NaN, infinities) become JSON `null`, so they share a
//! key with `None` and with each other.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Separator between key segments.
pub const KEY_SEPARATOR: char = ':';

// == Fingerprint ==
/// Builds `namespace:hash` for the given arguments.
///
/// An empty namespace yields the bare hash.
///
/// # Errors
/// `CacheError::Serialization` if `args` cannot be represented as JSON
/// (e.g. a map with non-scalar keys).
pub fn fingerprint<A>(namespace: &str, args: &A) -> Result<String>
where
    A: Serialize + ?Sized,
{
    let canonical = canonical_json(&serde_json::to_value(args)?);
    let hash = format!("{:016x}", seahash::hash(canonical.as_bytes()));

    if namespace.is_empty() {
        Ok(hash)
    } else {
        Ok(format!("{namespace}{KEY_SEPARATOR}{hash}"))
    }
}

// == Canonical JSON ==
/// Compact JSON text of `value` with object keys in sorted order.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

// == Compose ==
/// Joins literal segments into a key, e.g. `["user", "profile", "7"]` into
/// `user:profile:7`.
///
/// Useful for hand-built keys that prefix and entity invalidation must reach.
pub fn compose<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut key = String::new();
    for (i, segment) in segments.into_iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(segment.as_ref());
    }
    key
}
