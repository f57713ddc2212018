// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Double-array trie build and scan under adversarial input.
//!
//! Splits the fuzz input into a "corpus" half (used to discover features
//! and build a trie) and a "probe" half (scanned against that trie).
//! Every emitted event must name a real feature id, and every feature
//! must still round-trip through `get` after the trie is built.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ldig::features::FeatureSet;
use ldig::trie::DoubleArrayTrie;
use ldig::types::Events;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 || data.len() > 4096 {
        return;
    }
    let mid = data.len() / 2;
    let (corpus_bytes, probe_bytes) = data.split_at(mid);

    let to_text = |bytes: &[u8]| -> Vec<char> { bytes.iter().map(|&b| (b'a' + b % 6) as char).collect() };
    let corpus = to_text(corpus_bytes);
    let probe = to_text(probe_bytes);
    if corpus.is_empty() {
        return;
    }

    let fs = FeatureSet::extract(corpus, 2);
    let trie = DoubleArrayTrie::build(&fs);

    for i in 0..fs.len() {
        let slice = fs.slice(i).to_vec();
        assert_eq!(trie.get(&slice), i as i64, "feature {i} did not round-trip through get");
    }

    let mut events = Events::new();
    trie.extract_features(&mut events, &probe);
    for (&feat, &count) in &events {
        assert!((feat.0 as usize) < fs.len(), "event names a feature id out of range");
        assert!(count > 0, "event has a non-positive count");
    }
});
