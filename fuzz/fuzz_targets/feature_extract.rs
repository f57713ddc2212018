// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Maximal-substring extraction under adversarial input.
//!
//! Every discovered feature must be a non-empty substring that fits
//! inside the (possibly-rewritten, NUL/astral-clamped) text buffer
//! `FeatureSet::extract` returns. The first byte picks `f_min`; the rest
//! becomes the corpus text, run through a tiny alphabet plus the
//! line-feed sentinel so the fuzzer can hit the interior-sentinel content
//! filter.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ldig::features::FeatureSet;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 4096 {
        return;
    }
    let (f_min_byte, rest) = data.split_first().unwrap();
    let f_min = (*f_min_byte as usize % 8) + 1;

    let text: Vec<char> = rest
        .iter()
        .map(|&b| match b % 7 {
            0 => '\u{0001}',
            n => (b'a' + n - 1) as char,
        })
        .collect();
    if text.is_empty() {
        return;
    }

    let fs = FeatureSet::extract(text, f_min);
    for f in fs.iter() {
        assert!(f.len > 0, "feature has zero length");
        assert!(f.begin + f.len <= fs.text().len(), "feature runs past buffer end");
    }

    // Features must stay in strictly ascending slice order after
    // extraction (the sort order `FeatureSet` maintains).
    for w in fs.iter().collect::<Vec<_>>().windows(2) {
        let a: Vec<char> = w[0].slice(fs.text()).to_vec();
        let b: Vec<char> = w[1].slice(fs.text()).to_vec();
        assert!(a <= b, "features are not sorted by slice content");
    }
});
