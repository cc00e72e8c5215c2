//! Keyed aggregate storage
//!
//! Every record lands in the global bucket. Discriminator keys get their
//! own bucket the first time they are seen.

use serde::Serialize;
use std::collections::BTreeMap;

use super::aggregate::Bucket;

/// Global bucket plus one lazily created bucket per discriminator key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyedRegistry<B> {
    global: B,
    keyed: BTreeMap<String, B>,
}

impl<B> KeyedRegistry<B>
where
    B: Bucket,
{
    /// Folds a record into the global bucket and into the bucket of `key`
    pub fn apply_keyed(&mut self, key: &str, record: &B::Record) {
        self.apply(std::iter::once(key), record);
    }

    /// Folds a record into the global bucket once and into every key bucket given.
    ///
    /// A key repeated in `keys` is folded once per occurrence.
    pub fn apply<'k, I>(&mut self, keys: I, record: &B::Record)
    where
        I: IntoIterator<Item = &'k str>,
    {
        self.global.record(record);

        for key in keys {
            match self.keyed.get_mut(key) {
                Some(bucket) => bucket.record(record),
                None => {
                    self.keyed
                        .insert(key.to_string(), B::fold(None, record));
                }
            }
        }
    }

    pub fn global(&self) -> &B {
        &self.global
    }

    pub fn get(&self, key: &str) -> Option<&B> {
        self.keyed.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keyed.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keyed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyed.is_empty()
    }

    /// Splits the registry into its global bucket and key map
    pub fn into_parts(self) -> (B, BTreeMap<String, B>) {
        (self.global, self.keyed)
    }
}
