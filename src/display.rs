// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Colored terminal summaries for `--init`, `--shrink`, and `--cv`.
//!
//! Scaled down from the box-drawing, theme-aware display layer of the
//! search tool this crate is built from: ldig's output surface is three
//! small summary tables, not multi-section search result rendering, so
//! this keeps only what that layer does for color policy — respect
//! `NO_COLOR`, fall back to no color when stdout isn't a terminal — and
//! drops the theme detection and box-drawing machinery that table doesn't
//! need.

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Whether ANSI color codes should be emitted: respects `NO_COLOR`
/// (https://no-color.org) and falls back to plain text when stdout isn't a
/// terminal.
pub fn use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

fn colorize(s: &str, code: &str, colors: bool) -> String {
    if colors {
        format!("{code}{s}{RESET}")
    } else {
        s.to_string()
    }
}

fn accuracy_color(acc: f64) -> &'static str {
    if acc >= 0.9 {
        GREEN
    } else if acc >= 0.7 {
        YELLOW
    } else {
        RED
    }
}

/// One line per epoch: index, negative log-likelihood, and a trailing
/// pruning histogram line when pruning ran that epoch.
pub fn print_training_summary(report: &crate::learner::TrainingReport) {
    let colors = use_colors();
    println!("{}", colorize("training", BOLD, colors));
    for (epoch, nll) in report.epoch_log_likelihood.iter().enumerate() {
        println!("  epoch {epoch:>2}  neg_log_likelihood = {nll:.4}");
    }
    if let Some(summary) = &report.prune_summary {
        let dropped = summary.first().copied().unwrap_or(0);
        let kept: usize = summary.iter().skip(1).sum();
        println!(
            "  {} dropped {}, kept {} (by nonzero-weight count: {:?})",
            colorize("shrink:", DIM, colors),
            colorize(&dropped.to_string(), RED, colors),
            colorize(&kept.to_string(), GREEN, colors),
            summary
        );
    }
}

/// `--shrink`'s pruning histogram.
pub fn print_shrink_summary(summary: &[usize]) {
    let colors = use_colors();
    let dropped = summary.first().copied().unwrap_or(0);
    let kept: usize = summary.iter().skip(1).sum();
    println!(
        "{} dropped {}, kept {}",
        colorize("shrink:", BOLD, colors),
        colorize(&dropped.to_string(), RED, colors),
        colorize(&kept.to_string(), GREEN, colors)
    );
}

/// `--cv`'s per-trial and mean accuracy table.
pub fn print_cv_summary(reports: &[crate::cv::TrialReport]) {
    let colors = use_colors();
    println!("{}", colorize("cross-validation", BOLD, colors));
    for r in reports {
        let acc = r.accuracy();
        let line = format!(
            "  trial {:>2}  fold {:>2}  {:>4}/{:<4}  accuracy = {:.4}",
            r.trial, r.held_out_fold, r.correct, r.total, acc
        );
        println!("{}", colorize(&line, accuracy_color(acc), colors));
    }
    let mean = crate::cv::mean_accuracy(reports);
    println!(
        "  {} {:.4}",
        colorize("mean accuracy:", BOLD, colors),
        mean
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorize_wraps_with_ansi_codes_when_enabled() {
        assert_eq!(colorize("x", GREEN, true), format!("{GREEN}x{RESET}"));
    }

    #[test]
    fn colorize_is_passthrough_when_disabled() {
        assert_eq!(colorize("x", GREEN, false), "x");
    }

    #[test]
    fn accuracy_color_thresholds() {
        assert_eq!(accuracy_color(0.95), GREEN);
        assert_eq!(accuracy_color(0.75), YELLOW);
        assert_eq!(accuracy_color(0.5), RED);
    }
}
