// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Best-effort Unicode folding for corpus text: NFD decomposition,
//! combining-mark stripping, lowercasing.
//!
//! Full Unicode-correct normalization is out of scope here — this is a
//! best-effort fold, not a conformant implementation — but it still has to
//! exist for the corpus loader to produce usable training text. Built the
//! same way a search engine's query normalizer folds text: NFD via
//! `unicode-normalization`, then drop combining marks, then lowercase.
//! Unlike a query normalizer, this does *not* collapse whitespace: feature
//! offsets are code-point positions into the exact normalized text, and
//! collapsing runs of whitespace would shift them out from under any
//! feature discovered downstream.

use unicode_normalization::UnicodeNormalization;

/// Normalize `value` for corpus ingestion: NFD decompose, drop combining
/// marks, lowercase.
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Code points in Unicode category Mn (Mark, Nonspacing) — the diacritics
/// NFD decomposition separates from their base letter.
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |
        '\u{0483}'..='\u{0489}' |
        '\u{0591}'..='\u{05BD}' |
        '\u{0610}'..='\u{061A}' |
        '\u{064B}'..='\u{065F}' |
        '\u{06D6}'..='\u{06DC}' |
        '\u{0900}'..='\u{0903}' |
        '\u{093A}'..='\u{093C}' |
        '\u{0941}'..='\u{0948}' |
        '\u{0C00}'..='\u{0C04}' |
        '\u{1AB0}'..='\u{1AFF}' |
        '\u{1DC0}'..='\u{1DFF}' |
        '\u{20D0}'..='\u{20FF}' |
        '\u{FE20}'..='\u{FE2F}'
    )
}
