use std::{borrow::Cow, collections::HashMap, fs, path::Path};

use anyhow::{Context, anyhow};
use serde_json::Value;

use crate::normalize::normalize;

/// The published reference list: canonical journal keys in first-occurrence
/// order, hash-indexed, each carrying every metadata payload recorded for it.
///
/// Built once, then read-only. Nothing here mutates after construction, so a
/// set may be shared across threads freely while lookups run against it.
#[derive(Debug)]
pub struct ReferenceSet<M> {
    entries: Vec<(String, Vec<M>)>,
    index: HashMap<String, usize>,
}

impl<M> ReferenceSet<M> {
    /// Build a set from (raw name, payload) rows.
    ///
    /// Names are canonicalized on ingestion; rows whose name normalizes to
    /// the empty string are dropped (an empty key could never be matched,
    /// since empty queries short-circuit to no-match). Rows colliding on a
    /// canonical key all keep their payloads, in row order.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, M)>,
        S: AsRef<str>,
    {
        let mut set = ReferenceSet {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for (raw, payload) in rows {
            let key = normalize(raw.as_ref());
            if key.is_empty() {
                continue;
            }
            if let Some(&i) = set.index.get(&key) {
                set.entries[i].1.push(payload);
            } else {
                set.index.insert(key.clone(), set.entries.len());
                set.entries.push((key, vec![payload]));
            }
        }
        set
    }

    /// Number of distinct canonical keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical keys in first-occurrence order. Fuzzy scans iterate this,
    /// never the hash index, so tie-breaks stay deterministic.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Hash lookup of an exact canonical key.
    pub fn get(&self, key: &str) -> Option<(&str, &[M])> {
        self.index.get(key).map(|&i| self.entry(i))
    }

    /// Payloads recorded under a canonical key; empty when absent.
    pub fn payloads(&self, key: &str) -> &[M] {
        self.get(key).map_or(&[], |(_, payloads)| payloads)
    }

    pub(crate) fn entry(&self, i: usize) -> (&str, &[M]) {
        let (key, payloads) = &self.entries[i];
        (key.as_str(), payloads.as_slice())
    }
}

/// Load a reference set from a JSON file: an array of objects, each holding
/// the journal name under `name_field` plus arbitrary metadata fields. The
/// whole object is kept as the payload.
pub fn load_json(path: &Path, name_field: &str) -> anyhow::Result<ReferenceSet<Value>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read reference file {}", path.display()))?;
    let rows: Vec<serde_json::Map<String, Value>> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of objects", path.display()))?;

    let mut named = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        let name = row
            .get(name_field)
            .ok_or_else(|| anyhow!("reference row {i} has no `{name_field}` field"))?;
        let name = value_text(name).into_owned();
        named.push((name, Value::Object(row)));
    }
    Ok(ReferenceSet::from_rows(named))
}

/// Coerce a JSON value to the text a name field is expected to hold. Null
/// degrades to the empty string; non-string scalars use their JSON rendering.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
