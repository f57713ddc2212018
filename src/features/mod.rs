// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Maximal-substring feature discovery and the feature set container.
//!
//! A [`FeatureSet`] owns the single text buffer every feature addresses by
//! `(begin, len)`. Three operations build or reshape it:
//!
//! - [`FeatureSet::extract`]: discover maximal substrings from raw text via
//!   an enhanced suffix array.
//! - [`FeatureSet::compact_copy`]: copy an existing feature list into a
//!   fresh buffer, greedily deduplicating overlapping slices (used right
//!   after `extract` to drop the full corpus text the raw extraction
//!   addressed into).
//! - [`FeatureSet::shrink`]: compact an existing buffer in place after some
//!   features have been dropped (used by the learner's pruning pass).

use crate::esa::build as build_esa;
use crate::types::{Feature, Text, LINE_FEED_SENTINEL};

/// Code points counted as "letters" for the maximal-substring content
/// filter. Preserved verbatim from the source this crate's feature
/// extraction is modeled on — whether the exact range boundaries are
/// intentional or incidental is unclear upstream; no behavior here should
/// try to "fix" them.
fn is_letter_class(c: char) -> bool {
    let cp = c as u32;
    matches!(cp,
        0x41..=0x5A |   // ASCII uppercase
        0x61..=0x7A |   // ASCII lowercase
        0xC0..=0x1FFF | // Latin extended, Greek, Cyrillic, etc.
        0x20A0..=0x20CF |
        0x2C00..=0x2FFF |
        0x3040..=u32::MAX
    )
}

/// Content filter: no interior line-feed sentinel, at least one
/// letter-class code point.
fn is_content_valid(slice: &[char]) -> bool {
    if slice.is_empty() {
        return false;
    }
    for &c in &slice[1..slice.len() - 1] {
        if c == LINE_FEED_SENTINEL {
            return false;
        }
    }
    slice.iter().any(|&c| is_letter_class(c))
}

/// A set of features sharing one backing text buffer.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    text: Text,
    features: Vec<Feature>,
}

impl FeatureSet {
    /// An empty feature set with an empty buffer.
    pub fn empty() -> Self {
        FeatureSet {
            text: Vec::new(),
            features: Vec::new(),
        }
    }

    /// Store `features` against `text` verbatim, with no deduplication.
    /// Used when the caller already knows the features are valid slices
    /// into `text` (model load, and the learner's pruning pass, which
    /// filters an existing feature list before re-compacting it).
    pub fn with_text_and_features(text: Text, mut features: Vec<Feature>) -> Self {
        features.sort_by(|a, b| a.slice(&text).cmp(b.slice(&text)));
        FeatureSet { text, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    pub fn get(&self, i: usize) -> Feature {
        self.features[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.features.iter().copied()
    }

    pub fn slice(&self, i: usize) -> &[char] {
        self.features[i].slice(&self.text)
    }

    /// Discover maximal-substring features from `text` at minimum
    /// left-extension frequency `f_min`, replacing any code point that is
    /// NUL or `>= 0x10000` with a space beforehand. That bound keeps every
    /// character a valid single-cell transition offset in the double-array
    /// trie built downstream (`base[u] + c` must stay within a plan-ahead
    /// array size); it mirrors a detail of the implementation this crate's
    /// extraction logic is ported from, which the same way bounds its
    /// working alphabet before handing text to its suffix-array builder.
    pub fn extract(mut text: Text, f_min: usize) -> Self {
        for c in &mut text {
            let cp = *c as u32;
            if cp == 0 || cp >= 0x1_0000 {
                *c = ' ';
            }
        }

        let n = text.len();
        let esa = match build_esa(&text) {
            Some(esa) => esa,
            None => {
                return FeatureSet {
                    text,
                    features: Vec::new(),
                };
            }
        };

        // rank[i]: count of distinct "character before SA[i]" boundaries
        // seen by position i, used to get each node's left-extension count
        // in O(1) without materializing the set of preceding characters.
        let mut rank = vec![0u32; n];
        for i in 0..n {
            let cur = text[(esa.sa[i] as usize + n - 1) % n];
            if i == 0 {
                rank[i] = 0;
            } else {
                let prev = text[(esa.sa[i - 1] as usize + n - 1) % n];
                rank[i] = rank[i - 1] + u32::from(cur != prev);
            }
        }

        let mut features = Vec::new();
        for node in &esa.nodes {
            if node.depth == 0 {
                continue;
            }
            let left_extensions = rank[node.right - 1] - rank[node.left];
            if (left_extensions + 1) < f_min as u32 {
                continue;
            }
            let begin = esa.sa[node.left] as usize;
            let len = node.depth;
            if begin + len > n {
                continue;
            }
            if !is_content_valid(&text[begin..begin + len]) {
                continue;
            }
            features.push(Feature::new(begin, len));
        }

        features.sort_by(|a, b| a.slice(&text).cmp(b.slice(&text)));
        for f in &features {
            crate::contracts::check_feature_is_nonempty_substring(*f, text.len());
        }
        FeatureSet { text, features }
    }

    /// Copy `features` into a fresh buffer, deduplicating overlapping
    /// slices. Processes features longest-first so that shorter features
    /// land on substrings of already-copied longer ones whenever possible.
    pub fn compact_copy(&self) -> Self {
        let mut order: Vec<usize> = (0..self.features.len()).collect();
        order.sort_by(|&a, &b| self.features[b].len.cmp(&self.features[a].len));

        let mut new_text: Text = Vec::new();
        let mut new_features = vec![Feature::new(0, 0); self.features.len()];

        for idx in order {
            let slice = self.slice(idx);
            let begin = find_subslice(&new_text, slice).unwrap_or_else(|| {
                let start = new_text.len();
                new_text.extend_from_slice(slice);
                start
            });
            new_features[idx] = Feature::new(begin, slice.len());
        }

        new_features.sort_by(|a, b| a.slice(&new_text).cmp(b.slice(&new_text)));
        FeatureSet {
            text: new_text,
            features: new_features,
        }
    }

    /// In-place compaction: rewrite `begin` offsets so overlapping features
    /// share storage and non-overlapping ones sit back-to-back, without
    /// changing any feature's slice content. Idempotent.
    pub fn shrink(&mut self) {
        if self.features.is_empty() {
            self.text.clear();
            return;
        }

        let mut order: Vec<usize> = (0..self.features.len()).collect();
        order.sort_by(|&a, &b| {
            let fa = self.features[a];
            let fb = self.features[b];
            fa.begin.cmp(&fb.begin).then(fb.len.cmp(&fa.len))
        });

        let old_text = std::mem::take(&mut self.text);
        let mut new_text: Text = Vec::with_capacity(old_text.len());

        let mut pre_end = 0usize;
        // `old_pos - shift == new_pos` for every position already copied in
        // the current run of coverage; reset whenever a feature starts past
        // everything copied so far, since that's an actual gap and the old
        // and new buffers diverge there.
        let mut shift = 0usize;
        let mut first = true;

        for &idx in &order {
            let f = self.features[idx];
            if first {
                new_text.extend_from_slice(&old_text[f.begin..f.begin + f.len]);
                pre_end = f.begin + f.len;
                shift = f.begin;
                self.features[idx] = Feature::new(0, f.len);
                first = false;
                continue;
            }

            if f.begin > pre_end {
                shift = f.begin - new_text.len();
            }
            let cur_begin = f.begin - shift;

            let covered_end = f.begin + f.len;
            if covered_end > pre_end {
                let new_start = pre_end.max(f.begin);
                new_text.extend_from_slice(&old_text[new_start..covered_end]);
                pre_end = covered_end;
            }

            self.features[idx] = Feature::new(cur_begin, f.len);
        }

        self.text = new_text;
    }
}

/// Find `needle` as a contiguous subslice of `haystack`, returning its
/// start index.
fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    /// T="abracadabra", f_min=2 -> exactly "a" (5x) and "abra" (2x).
    #[test]
    fn maxsubst_abracadabra() {
        let fs = FeatureSet::extract(chars("abracadabra"), 2);
        let mut slices: Vec<String> = fs.iter().map(|f| f.slice(fs.text()).iter().collect()).collect();
        slices.sort();
        assert_eq!(slices, vec!["a".to_string(), "abra".to_string()]);
    }

    /// features {(10,1),(7,4)} in "abracadabra" -> shrink yields
    /// text="abra", features {(3,1),(0,4)}.
    #[test]
    fn shrink_abracadabra() {
        let text = chars("abracadabra");
        let features = vec![Feature::new(10, 1), Feature::new(7, 4)];
        let mut fs = FeatureSet::with_text_and_features(text, features);
        fs.shrink();

        let result_text: String = fs.text().iter().collect();
        assert_eq!(result_text, "abra");

        let mut results: Vec<Feature> = fs.iter().collect();
        results.sort_by_key(|f| f.begin);
        assert_eq!(results, vec![Feature::new(0, 4), Feature::new(3, 1)]);
    }

    #[test]
    fn shrink_preserves_slice_content() {
        let text = chars("the quick brown fox jumps over the lazy dog");
        let features = vec![
            Feature::new(0, 3),
            Feature::new(4, 5),
            Feature::new(4, 2),
            Feature::new(31, 4),
        ];
        let originals: Vec<Vec<char>> = features.iter().map(|f| f.slice(&text).to_vec()).collect();
        let mut fs = FeatureSet::with_text_and_features(text, features);
        let len_before = fs.text().len();
        fs.shrink();
        assert!(fs.text().len() <= len_before);
        let mut after: Vec<Vec<char>> = fs.iter().map(|f| f.slice(fs.text()).to_vec()).collect();
        let mut before = originals;
        after.sort();
        before.sort();
        assert_eq!(after, before);
    }

    #[test]
    fn every_feature_is_nonempty_substring() {
        let fs = FeatureSet::extract(chars("abracadabra mississippi banana"), 2);
        for f in fs.iter() {
            assert!(f.len > 0);
            assert!(f.begin + f.len <= fs.text().len());
        }
    }
}
