// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The trained model container: labels, feature set, parameter matrix, and
//! the trie built from the feature set. Everything the learner mutates and
//! everything inference reads lives here.

pub mod io;

use std::collections::HashMap;

use crate::features::FeatureSet;
use crate::trie::DoubleArrayTrie;
use crate::types::{Events, Text};

/// Label returned when no class passes the caller's confidence threshold.
pub const NO_MATCH_LABEL: &str = "**";

/// Labels, features, parameters, and the trie built from them.
pub struct Model {
    pub k: usize,
    pub m: usize,
    pub features: FeatureSet,
    pub trie: DoubleArrayTrie,
    pub labels: Vec<String>,
    pub label_index: HashMap<String, usize>,
    pub params: Vec<f64>,
}

impl Model {
    /// A fresh model over `labels` with no features yet.
    pub fn new(labels: Vec<String>) -> Self {
        let label_index = labels
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        let k = labels.len();
        Model {
            k,
            m: 0,
            features: FeatureSet::empty(),
            trie: DoubleArrayTrie::build(&FeatureSet::empty()),
            labels,
            label_index,
            params: Vec::new(),
        }
    }

    /// Discover features from `text` and size the parameter matrix and
    /// trie to match. Called once, at model initialization.
    ///
    /// `extract` addresses its features into the full (cleaned) corpus
    /// text; `compact_copy` then copies just the matched slices into a
    /// fresh, deduplicated buffer so the model doesn't carry the entire
    /// corpus around as its saved text.
    pub fn generate_features(&mut self, text: Text, f_min: usize) {
        self.features = FeatureSet::extract(text, f_min).compact_copy();
        self.post_features();
    }

    /// Resize `params` and rebuild `trie` to be consistent with
    /// `self.features`. Called after any operation that changes the
    /// feature set: initial construction, load, and pruning.
    pub fn post_features(&mut self) {
        self.m = self.features.len();
        self.params = vec![0.0; self.k * self.m];
        self.trie = DoubleArrayTrie::build(&self.features);
    }

    pub fn label_name(&self, k: usize) -> &str {
        self.labels.get(k).map(String::as_str).unwrap_or(NO_MATCH_LABEL)
    }

    pub fn predict(&self, events: &Events) -> (Vec<f64>, usize) {
        crate::learner::predict(&self.params, self.k, events)
    }

    /// Scan `text` against this model's trie, then predict over the
    /// resulting event map.
    pub fn predict_text(&self, text: &[char]) -> (Vec<f64>, usize) {
        let mut events = Events::new();
        self.trie.extract_features(&mut events, text);
        self.predict(&events)
    }
}
