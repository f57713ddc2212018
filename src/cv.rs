// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! K-fold cross-validation driver.
//!
//! Each trial holds out one fold of every label's examples, trains a fresh
//! model on the remainder for [`crate::learner::CV_EPOCHS`] epochs, and
//! scores accuracy on the held-out fold. Trials are independent — no trial
//! reads another trial's model or RNG state — so, mirroring how the index
//! builder this crate is modeled on parallelizes independent per-document
//! work with `rayon`, trials run concurrently under the `parallel` feature
//! and fall back to a plain sequential loop without it. An `indicatif` bar
//! tracks trial completion the same way that builder tracks its own
//! document/index progress. What never runs in parallel is the SGD epoch
//! loop itself: each trial's training is strictly sequential, only the
//! trials are fanned out.

use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::corpus::Corpus;
use crate::learner::{self, CV_EPOCHS};
use crate::model::Model;

/// One trial's outcome: held-out fold index and per-label accuracy.
#[derive(Debug, Clone)]
pub struct TrialReport {
    pub trial: usize,
    pub held_out_fold: usize,
    pub correct: usize,
    pub total: usize,
}

impl TrialReport {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Split `corpus`'s examples into `folds` round-robin groups, per label.
/// Returns `fold_of[label][example_index] = fold`.
fn assign_folds(corpus: &Corpus, folds: usize) -> Vec<Vec<usize>> {
    corpus
        .labels()
        .iter()
        .enumerate()
        .map(|(label, _)| (0..corpus.examples(label).len()).map(|i| i % folds).collect())
        .collect()
}

/// Build the training/held-out split for one trial's held-out fold.
fn split_for_fold(corpus: &Corpus, fold_of: &[Vec<usize>], held_out: usize) -> (Corpus, Vec<(usize, usize)>) {
    let mut train_lines = Vec::new();
    let mut held_out_examples = Vec::new();

    for label in 0..corpus.labels().len() {
        let name = &corpus.labels()[label];
        for (i, example) in corpus.examples(label).iter().enumerate() {
            let text: String = corpus.slice(*example).iter().collect();
            // corpus text windows are sentinel-wrapped; strip those before
            // re-feeding through Corpus::load's own TSV parsing.
            let text = text.trim_matches(crate::types::LINE_FEED_SENTINEL);
            if fold_of[label][i] == held_out {
                held_out_examples.push((label, i));
            } else {
                train_lines.push(format!("{name}\t{text}"));
            }
        }
    }

    let train_corpus = Corpus::load_from_lines(&train_lines);
    (train_corpus, held_out_examples)
}

/// Run one trial: train on everything but `held_out` fold, score accuracy
/// on that fold.
fn run_trial(
    corpus: &Corpus,
    fold_of: &[Vec<usize>],
    trial: usize,
    held_out: usize,
    f_min: usize,
    eta: f64,
    reg: f64,
    seed: u64,
) -> TrialReport {
    let (train_corpus, held_out_examples) = split_for_fold(corpus, fold_of, held_out);

    let mut model = Model::new(train_corpus.labels().to_vec());
    model.generate_features(train_corpus.text().to_vec(), f_min);

    let mut rng = StdRng::seed_from_u64(seed);
    learner::run_training(&mut model, &train_corpus, eta, reg, CV_EPOCHS, &mut rng);

    let mut correct = 0;
    let total = held_out_examples.len();
    for (label, i) in &held_out_examples {
        let example = corpus.examples(*label)[*i];
        let (_, predicted) = model.predict_text(corpus.slice(example));
        let predicted_name = model.label_name(predicted);
        if predicted_name == corpus.labels()[*label] {
            correct += 1;
        }
    }

    TrialReport {
        trial,
        held_out_fold: held_out,
        correct,
        total,
    }
}

/// Run `trials` independent k-fold cross-validation trials over `corpus`.
/// `base_seed` is mixed with the trial index so trials are deterministic
/// but distinct.
pub fn run(
    corpus: &Corpus,
    folds: usize,
    trials: usize,
    f_min: usize,
    eta: f64,
    reg: f64,
    base_seed: u64,
) -> Vec<TrialReport> {
    let folds = folds.max(1);
    let fold_of = assign_folds(corpus, folds);

    let trial_indices: Vec<usize> = (0..trials).collect();

    #[cfg(feature = "parallel")]
    {
        let progress = ProgressBar::new(trial_indices.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} trials {bar:30} {pos}/{len}")
                .unwrap(),
        );
        let reports: Vec<TrialReport> = trial_indices
            .par_iter()
            .map(|&t| {
                let held_out = t % folds;
                let report =
                    run_trial(corpus, &fold_of, t, held_out, f_min, eta, reg, base_seed.wrapping_add(t as u64));
                progress.inc(1);
                report
            })
            .collect();
        progress.finish_and_clear();
        reports
    }

    #[cfg(not(feature = "parallel"))]
    {
        trial_indices
            .iter()
            .map(|&t| {
                let held_out = t % folds;
                run_trial(corpus, &fold_of, t, held_out, f_min, eta, reg, base_seed.wrapping_add(t as u64))
            })
            .collect()
    }
}

/// Mean accuracy across trials; 0.0 for an empty trial list.
pub fn mean_accuracy(reports: &[TrialReport]) -> f64 {
    if reports.is_empty() {
        return 0.0;
    }
    reports.iter().map(TrialReport::accuracy).sum::<f64>() / reports.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_corpus() -> Corpus {
        let lines = vec![
            "en\thello there friend".to_string(),
            "en\tgood morning to you".to_string(),
            "en\thow are you doing".to_string(),
            "en\tnice to meet you".to_string(),
            "fr\tbonjour mon ami".to_string(),
            "fr\tcomment allez vous".to_string(),
            "fr\tbonne journee a tous".to_string(),
            "fr\tmerci beaucoup monsieur".to_string(),
        ];
        Corpus::load_from_lines(&lines)
    }

    #[test]
    fn run_produces_one_report_per_trial() {
        let corpus = sample_corpus();
        let reports = run(&corpus, 2, 4, 1, 0.1, 0.0, 7);
        assert_eq!(reports.len(), 4);
        for r in &reports {
            assert!(r.total > 0);
            assert!(r.accuracy() >= 0.0 && r.accuracy() <= 1.0);
        }
    }

    #[test]
    fn mean_accuracy_of_empty_reports_is_zero() {
        assert_eq!(mean_accuracy(&[]), 0.0);
    }

    #[test]
    fn trials_beyond_fold_count_wrap_around() {
        let corpus = sample_corpus();
        let reports = run(&corpus, 2, 5, 1, 0.1, 0.0, 1);
        assert_eq!(reports[0].held_out_fold, reports[2].held_out_fold);
    }
}
