// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Debug-only runtime checks of the invariants this crate is built to
//! maintain.
//!
//! Every function here wraps a `debug_assert!` and is a no-op in release
//! builds; callers invoke them unconditionally rather than gating the call
//! site on `cfg!(debug_assertions)` themselves; that keeps the check next to
//! the invariant it's verifying instead of scattered through call sites.
//! Cheap, per-call checks are wired into the code paths that could violate
//! them; checks that are `O(M)` or worse are left for tests and for callers
//! (e.g. `--dump`) that already expect to pay for a full pass.

use crate::features::FeatureSet;
use crate::trie::DoubleArrayTrie;
use crate::types::Feature;

/// A feature's slice is a non-empty substring of its backing text.
///
/// Property 1: `∀(b,l) ∈ F: T[b:b+l]` is a non-empty substring of `T`.
pub fn check_feature_is_nonempty_substring(feature: Feature, text_len: usize) {
    debug_assert!(feature.len > 0, "feature has zero length: {feature:?}");
    debug_assert!(
        feature.begin + feature.len <= text_len,
        "feature {feature:?} runs past end of text (len {text_len})"
    );
}

/// Shrink preserves slice content and never grows the text buffer.
///
/// Property 2: after `shrink`, every feature's slice content is unchanged
/// and `|T_new| <= |T_old|`.
pub fn check_shrink_preserves_content(
    old_text: &[char],
    old_feature: Feature,
    new_text: &[char],
    new_feature: Feature,
    old_len: usize,
    new_len: usize,
) {
    debug_assert!(
        new_len <= old_len,
        "shrink grew the text buffer: {old_len} -> {new_len}"
    );
    debug_assert_eq!(
        old_feature.slice(old_text),
        new_feature.slice(new_text),
        "shrink changed a feature's slice content"
    );
}

/// Every feature round-trips through the trie it was built from.
///
/// Property 3: `∀i ∈ [0,M): trie.get(F[i]) == i`. `O(M)`: call from tests
/// and from `--dump`-style diagnostics, not on every build.
pub fn check_trie_round_trip(trie: &DoubleArrayTrie, features: &FeatureSet) {
    for i in 0..features.len() {
        let key = features.slice(i);
        debug_assert_eq!(
            trie.get(key),
            i as i64,
            "trie.get(feature {i}) did not return its own id"
        );
    }
}

/// Softmax output is a probability distribution: sums to 1, every entry in
/// `(0, 1)`.
///
/// Property 5.
pub fn check_softmax_is_distribution(y: &[f64]) {
    if y.len() > 1 {
        debug_assert!(
            y.iter().all(|&p| p > 0.0 && p < 1.0),
            "softmax output has an entry outside (0, 1): {y:?}"
        );
    }
    let sum: f64 = y.iter().sum();
    debug_assert!(
        (sum - 1.0).abs() < 1e-9,
        "softmax output does not sum to 1: sum = {sum}"
    );
}
