// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! ldig: short-text language identification over a discriminative
//! multinomial logistic regression model whose features are maximal
//! substrings discovered from the training corpus.
//!
//! The pipeline, leaf modules first:
//!
//! - [`esa`]: enhanced suffix array construction — suffix array, LCP array,
//!   internal-node intervals — the primitive [`features`] walks to find
//!   maximal substrings.
//! - [`features`]: maximal-substring discovery and the feature set's shared
//!   text buffer, including compaction (`compact_copy`, `shrink`).
//! - [`trie`]: the double-array trie built from a feature set, and its
//!   linear-time multi-pattern scan.
//! - [`learner`]: the sparse SGD learner — softmax prediction, the SGD
//!   update rule, cumulative-penalty L1 regularization, and pruning.
//! - [`model`]: the trained model container tying features, trie,
//!   parameters, and labels together, plus its binary file format
//!   ([`model::io`]).
//! - [`corpus`]: loading `label<TAB>...<TAB>text` files into the shared
//!   text buffer the rest of the pipeline addresses by offset.
//! - [`cv`]: k-fold cross-validation over a loaded corpus.
//! - [`normalize`]: Unicode folding applied to corpus text before feature
//!   discovery.
//! - [`cli`]: the command-line argument surface.
//! - [`display`]: colored terminal summaries for training, shrinking, and
//!   cross-validation output.
//! - [`contracts`]: debug-only runtime checks of this crate's invariants.
//! - [`error`], [`types`]: the shared error taxonomy and core data types.

pub mod cli;
pub mod contracts;
pub mod corpus;
pub mod cv;
pub mod display;
pub mod error;
pub mod esa;
pub mod features;
pub mod learner;
pub mod model;
pub mod normalize;
pub mod trie;
pub mod types;

pub use error::{LdigError, Result};
pub use model::Model;
