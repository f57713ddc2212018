// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Double-array trie: a compact deterministic automaton over feature
//! strings, built once from a sorted [`FeatureSet`] and then used as a
//! read-only multi-pattern matcher.
//!
//! ```text
//! transition u --c--> v   holds iff   v = base[u] + c  AND  check[v] == u
//! ```
//!
//! `base`, `check`, and `value` are plain parallel arrays; there is no
//! pointer or `Box` anywhere in this structure, which is the entire point
//! of the representation — one array access per transition, no indirection
//! chasing, and a trivial binary on-disk shape if it were ever persisted
//! (it isn't: see [`crate::model::io`], which rebuilds the trie from
//! features on load instead).

mod build;

use crate::features::FeatureSet;
use crate::types::{Events, FeatureId};

/// A built double-array trie. Read-only after construction.
#[derive(Debug, Clone)]
pub struct DoubleArrayTrie {
    base: Vec<i64>,
    check: Vec<i64>,
    value: Vec<i64>,
}

impl DoubleArrayTrie {
    /// Build from a feature set whose features are already sorted
    /// lexicographically by slice content (the invariant `FeatureSet`
    /// itself maintains).
    pub fn build(features: &FeatureSet) -> Self {
        let (base, check, value) = build::build(features);
        let trie = DoubleArrayTrie { base, check, value };
        if cfg!(debug_assertions) {
            crate::contracts::check_trie_round_trip(&trie, features);
        }
        trie
    }

    /// Array length after construction (`N` in the data model).
    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Walk `key` from the root; return the matched feature id, or `-1` if
    /// `key` is not a complete feature string.
    pub fn get(&self, key: &[char]) -> i64 {
        let mut cur: i64 = 0;
        for &ch in key {
            match self.step(cur, ch) {
                Some(next) => cur = next,
                None => return -1,
            }
        }
        self.value.get(cur as usize).copied().filter(|&v| v >= 0).unwrap_or(-1)
    }

    /// Scan every start position in `text`, emitting one count per
    /// distinct `(start, matched feature)` pair into `events`, summed
    /// across all starts.
    pub fn extract_features(&self, events: &mut Events, text: &[char]) {
        for start in 0..text.len() {
            let mut cur: i64 = 0;
            for &ch in &text[start..] {
                match self.step(cur, ch) {
                    Some(next) => {
                        cur = next;
                        if let Some(&v) = self.value.get(cur as usize) {
                            if v >= 0 {
                                *events.entry(FeatureId(v as u32)).or_insert(0) += 1;
                            }
                        }
                    }
                    None => break,
                }
            }
        }
    }

    #[inline]
    fn step(&self, cur: i64, ch: char) -> Option<i64> {
        let next = self.base[cur as usize] + ch as i64;
        if next < 0 || next as usize >= self.check.len() {
            return None;
        }
        if self.check[next as usize] != cur {
            return None;
        }
        Some(next)
    }
}
