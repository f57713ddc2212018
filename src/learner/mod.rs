// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Sparse SGD learner for L1-regularized multinomial logistic regression.
//!
//! Operates directly on a [`Model`]'s parameter matrix; the model owns the
//! data, this module owns the update rules. Three layers:
//!
//! - [`predict`]: softmax inference, used both during training and at
//!   detection time.
//! - [`sgd_step`] / [`run_epoch`]: the per-example and per-epoch update
//!   rules, including cumulative-penalty (lazy) L1 regularization.
//! - [`shrink`]: pruning near-zero feature weights and rebuilding the
//!   feature set, parameter matrix, and trie to match.
//!
//! [`run_training`] is the 10-epoch (or 5-epoch, for cross-validation)
//! driver tying epochs, regularization on/off, and pruning together.

mod regularize;

use rand::Rng;

use crate::corpus::Corpus;
use crate::model::Model;
use crate::types::Events;
use regularize::l1_regularize;

/// Threshold below which a predicted-probability residual is treated as
/// "already confident"; also the near-zero cutoff for pruning.
pub const ALMOST_ZERO: f64 = 1e-7;

/// Epochs to run during full training (`--init`).
pub const INIT_EPOCHS: usize = 10;
/// Epochs to run during a cross-validation trial.
pub const CV_EPOCHS: usize = 5;
/// Epoch (0-indexed) after which regularization turns on.
const REGULARIZE_FROM_EPOCH: usize = 5;
/// Epoch (0-indexed) after which pruning runs once.
const PRUNE_AFTER_EPOCH: usize = 4;
/// Per-epoch learning-rate decay.
const ETA_DECAY: f64 = 0.8;

/// Softmax prediction: `z_k = sum_{(i,c) in events} c * W[i*K+k]`, then the
/// max-subtraction-stabilized softmax. Returns the probability vector and
/// its argmax.
pub fn predict(params: &[f64], k: usize, events: &Events) -> (Vec<f64>, usize) {
    let mut z = vec![0f64; k];
    for (&feat, &count) in events {
        let row = feat.0 as usize * k;
        for kk in 0..k {
            z[kk] += count as f64 * params[row + kk];
        }
    }

    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for v in z.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    for v in z.iter_mut() {
        *v /= sum;
    }

    let argmax = z
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0);
    crate::contracts::check_softmax_is_distribution(&z);
    (z, argmax)
}

/// One unregularized SGD step against `events`/`true_label`, unconditional
/// (no confidence gate) — used directly by tests and as the inner update
/// applied by [`run_epoch`]'s non-regularized branch once its gate passes.
pub fn sgd_step(params: &mut [f64], k: usize, events: &Events, true_label: usize, eta: f64) {
    let (mut y, _) = predict(params, k, events);
    y[true_label] -= 1.0;
    for v in &mut y {
        *v *= eta;
    }
    for (&feat, &count) in events {
        let row = feat.0 as usize * k;
        for kk in 0..k {
            params[row + kk] -= count as f64 * y[kk];
        }
    }
}

/// Negative log-likelihood and per-label correct-prediction counts over
/// every example in `corpus`.
pub fn likelihood(model: &Model, corpus: &Corpus) -> (f64, Vec<usize>) {
    let k = model.k;
    let mut correct = vec![0usize; k];
    let mut neg_log_likelihood = 0.0;

    for label in 0..k {
        for example in corpus.examples(label) {
            let mut events = Events::new();
            model
                .trie
                .extract_features(&mut events, corpus.slice(*example));
            let (y, predicted) = model.predict(&events);
            if predicted == label {
                correct[label] += 1;
            }
            if y[label] > 0.0 {
                neg_log_likelihood -= y[label].ln();
            }
        }
    }
    (neg_log_likelihood, correct)
}

/// Run one epoch of SGD over `corpus` against `model`, permuting the
/// `D * K` virtual example slots (`D` = largest per-label example count)
/// so every class is visited the same number of times per epoch,
/// oversampling smaller classes. `eta` is the epoch's starting learning
/// rate; when `reg > 0` it grows across the epoch via `alpha` and decays
/// back down between epochs by the driver, not within this call.
pub fn run_epoch(model: &mut Model, corpus: &Corpus, mut eta: f64, reg: f64, rng: &mut impl Rng) {
    let k = model.k;
    let m = model.m;
    let d = corpus.max_label_count().max(1);
    let n = d * k;

    let mut perm: Vec<usize> = (0..n).collect();
    shuffle(&mut perm, rng);

    let with_reg = reg > 0.0;
    let alpha = if with_reg { 0.9f64.powf(-1.0 / n as f64) } else { 1.0 };
    let whole_reg_interval = n / 100 + 1;
    let mut penalties: Vec<f64> = if with_reg { vec![0.0; m * k] } else { Vec::new() };
    let mut uk = 0.0f64;

    for (ni, &slot) in perm.iter().enumerate() {
        let label = slot / d;
        let examples = corpus.examples(label);
        if examples.is_empty() {
            continue;
        }
        let r = slot % d;
        let count = examples.len();
        let idx = if r / count == d / count {
            rng.gen_range(0..count)
        } else {
            r % count
        };
        let example = examples[idx];

        let mut events = Events::new();
        model.trie.extract_features(&mut events, corpus.slice(example));

        let (mut y, _) = model.predict(&events);
        y[label] -= 1.0;

        if with_reg {
            eta *= alpha;
            uk += reg * eta / n as f64;
            for v in &mut y {
                *v *= eta;
            }

            let whole_pass = (n - ni) % whole_reg_interval == 1;
            if whole_pass {
                apply_update(&mut model.params, k, &events, &y);
                for i in 0..(m * k) {
                    l1_regularize(&mut model.params[i], &mut penalties[i], uk);
                }
            } else {
                for (&feat, &c) in &events {
                    let row = feat.0 as usize * k;
                    for kk in 0..k {
                        model.params[row + kk] -= c as f64 * y[kk];
                        l1_regularize(&mut model.params[row + kk], &mut penalties[row + kk], uk);
                    }
                }
            }
        } else if y[label] < -ALMOST_ZERO {
            for v in &mut y {
                *v *= eta;
            }
            apply_update(&mut model.params, k, &events, &y);
        }
    }
}

fn apply_update(params: &mut [f64], k: usize, events: &Events, y: &[f64]) {
    for (&feat, &count) in events {
        let row = feat.0 as usize * k;
        for kk in 0..k {
            params[row + kk] -= count as f64 * y[kk];
        }
    }
}

/// Fisher-Yates shuffle using the supplied RNG; kept local rather than
/// pulled in from `rand::seq` so the epoch permutation's randomness source
/// is visibly the same `rng` threaded through oversampling.
fn shuffle(perm: &mut [usize], rng: &mut impl Rng) {
    for i in (1..perm.len()).rev() {
        let j = rng.gen_range(0..=i);
        perm.swap(i, j);
    }
}

/// Drop any feature whose weight row is entirely near-zero, compact the
/// feature set's text buffer, and rebuild the trie. Returns
/// `summary[c]` = number of retained-or-dropped features with exactly `c`
/// nonzero weights (so `summary[0]` counts the dropped features).
pub fn shrink(model: &mut Model) -> Vec<usize> {
    let k = model.k;
    let mut summary = vec![0usize; k + 1];
    let mut kept_features = Vec::new();
    let mut kept_params = Vec::new();

    for i in 0..model.features.len() {
        let row = &model.params[i * k..(i + 1) * k];
        let nonzero = row.iter().filter(|w| w.abs() > ALMOST_ZERO).count();
        summary[nonzero] += 1;
        if nonzero > 0 {
            kept_features.push(model.features.get(i));
            kept_params.extend_from_slice(row);
        }
    }

    let text = model.features.text().to_vec();
    let mut new_features = crate::features::FeatureSet::with_text_and_features(text, kept_features);
    new_features.shrink();

    model.features = new_features;
    model.params = kept_params;
    model.m = model.features.len();
    model.trie = crate::trie::DoubleArrayTrie::build(&model.features);
    summary
}

/// Report returned by [`run_training`]: per-epoch negative log-likelihood
/// and, once pruning has run, its histogram.
pub struct TrainingReport {
    pub epoch_log_likelihood: Vec<f64>,
    pub prune_summary: Option<Vec<usize>>,
}

/// The 10-epoch (or 5-epoch, for cross-validation) training driver:
/// regularization off for the first [`REGULARIZE_FROM_EPOCH`] epochs, on
/// thereafter; pruning once after epoch [`PRUNE_AFTER_EPOCH`]; `eta` decays
/// by [`ETA_DECAY`] each epoch.
pub fn run_training(
    model: &mut Model,
    corpus: &Corpus,
    initial_eta: f64,
    reg: f64,
    epochs: usize,
    rng: &mut impl Rng,
) -> TrainingReport {
    let mut eta = initial_eta;
    let mut epoch_log_likelihood = Vec::with_capacity(epochs);
    let mut prune_summary = None;

    for epoch in 0..epochs {
        let epoch_reg = if epoch >= REGULARIZE_FROM_EPOCH { reg } else { 0.0 };
        run_epoch(model, corpus, eta, epoch_reg, rng);

        let (nll, _correct) = likelihood(model, corpus);
        epoch_log_likelihood.push(nll);

        if epoch == PRUNE_AFTER_EPOCH {
            prune_summary = Some(shrink(model));
        }

        eta *= ETA_DECAY;
    }

    TrainingReport {
        epoch_log_likelihood,
        prune_summary,
    }
}
