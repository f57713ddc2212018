// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Enhanced suffix array construction under adversarial input.
//!
//! `ldig::esa::build` is the primitive every feature extraction pass
//! walks; a malformed interval tree here would silently corrupt every
//! downstream maximal substring. Maps fuzzer bytes onto a deliberately
//! tiny alphabet (`a`..`e`) so the fuzzer spends its budget finding
//! repeat structure instead of mostly-unique random text, which is where
//! ESA construction's interesting cases (deep internal nodes, ties in
//! rank) actually live.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ldig::esa;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 4096 {
        return;
    }
    let text: Vec<char> = data.iter().map(|&b| (b'a' + b % 5) as char).collect();
    let n = text.len();

    let Some(built) = esa::build(&text) else {
        return;
    };

    assert_eq!(built.sa.len(), n);
    let mut seen = vec![false; n];
    for &s in &built.sa {
        let s = s as usize;
        assert!(s < n, "suffix array entry {s} out of bounds for n={n}");
        assert!(!seen[s], "suffix array entry {s} repeated");
        seen[s] = true;
    }

    for node in &built.nodes {
        assert!(node.left < node.right, "internal node has empty interval");
        assert!(node.right <= n, "internal node interval runs past SA length");
        assert!(node.depth > 0, "internal node has zero depth");
    }
});
