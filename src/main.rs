// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI entry point: parse arguments, dispatch to the mode the flags
//! resolve to, exit 1 on any error.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use ldig::cli::{Cli, Mode};
use ldig::corpus::Corpus;
use ldig::error::{LdigError, Result};
use ldig::learner::{self, INIT_EPOCHS};
use ldig::model::{self, Model};
use ldig::{cv, display};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("ldig: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mode = cli.mode()?;
    for file in &cli.files {
        ldig::corpus::check_path(Path::new(file))?;
    }

    match mode {
        Mode::Init => run_init(cli),
        Mode::Detection => run_detection(cli),
        Mode::Shrink => run_shrink(cli),
        Mode::Dump => run_dump(cli),
        Mode::Cv => run_cv(cli),
        Mode::Maxsubst => run_maxsubst(cli),
    }
}

/// Resolve the RNG seed: explicit `--seed`, or time-derived when omitted.
fn resolve_seed(cli: &Cli) -> u64 {
    cli.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    })
}

fn seed_rng(cli: &Cli) -> StdRng {
    StdRng::seed_from_u64(resolve_seed(cli))
}

fn require_files(cli: &Cli) -> Result<()> {
    if cli.files.is_empty() {
        return Err(LdigError::Usage("no input files given".into()));
    }
    Ok(())
}

fn run_init(cli: &Cli) -> Result<()> {
    require_files(cli)?;
    let corpus = Corpus::load(&cli.files)?;
    let mut model = Model::new(corpus.labels().to_vec());
    model.generate_features(corpus.text().to_vec(), cli.min_freq);

    let mut rng = seed_rng(cli);

    #[cfg(feature = "parallel")]
    let progress = {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}").unwrap());
        pb.set_message(format!("training {INIT_EPOCHS} epochs over {} features...", model.m));
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    };

    let report = learner::run_training(&mut model, &corpus, cli.eta, cli.reg, INIT_EPOCHS, &mut rng);

    #[cfg(feature = "parallel")]
    progress.finish_and_clear();

    display::print_training_summary(&report);

    let out_path = cli.output.as_deref().unwrap_or(&cli.model);
    model::io::save(&model, Path::new(out_path))?;
    println!("saved model to {out_path} ({} features)", model.m);
    Ok(())
}

fn run_shrink(cli: &Cli) -> Result<()> {
    let mut model = model::io::load(Path::new(&cli.model))?;
    let summary = learner::shrink(&mut model);
    display::print_shrink_summary(&summary);

    let out_path = cli.output.as_deref().unwrap_or(&cli.model);
    model::io::save(&model, Path::new(out_path))?;
    println!("saved model to {out_path} ({} features)", model.m);
    Ok(())
}

fn run_dump(cli: &Cli) -> Result<()> {
    let model = model::io::load(Path::new(&cli.model))?;
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    for i in 0..model.features.len() {
        let s: String = model.features.slice(i).iter().collect();
        writeln!(out, "{s}")?;
    }
    Ok(())
}

fn run_cv(cli: &Cli) -> Result<()> {
    require_files(cli)?;
    let corpus = Corpus::load(&cli.files)?;
    let seed = resolve_seed(cli);
    let reports = cv::run(&corpus, cli.cv_folds, cli.cv_trials, cli.min_freq, cli.eta, cli.reg, seed);
    display::print_cv_summary(&reports);
    Ok(())
}

fn run_maxsubst(cli: &Cli) -> Result<()> {
    require_files(cli)?;
    let corpus = Corpus::load(&cli.files)?;
    let features = ldig::features::FeatureSet::extract(corpus.text().to_vec(), cli.min_freq);
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    for f in features.iter() {
        let s: String = f.slice(features.text()).iter().collect();
        writeln!(out, "{s}")?;
    }
    Ok(())
}

/// Number of distinct matched features below which a detection line is
/// treated as too sparse to have a meaningful margin, when margin
/// filtering is enabled. Detection-time heuristic only; not a property of
/// the core trie/learner.
const MIN_EVENTS_FOR_MARGIN: usize = 10;

fn run_detection(cli: &Cli) -> Result<()> {
    require_files(cli)?;
    let model = model::io::load(Path::new(&cli.model))?;

    for file in &cli.files {
        let f = std::fs::File::open(file)?;
        let reader = std::io::BufReader::new(f);
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            classify_line(&model, &line, cli.margin)?;
        }
    }
    Ok(())
}

fn classify_line(model: &Model, line: &str, margin: Option<f64>) -> Result<()> {
    let (label_field, text_field) = match line.rsplit_once('\t') {
        Some((rest, text)) => (rest.split('\t').next().unwrap_or(""), text),
        None => ("", line),
    };
    let normalized = ldig::normalize::normalize(text_field);
    let chars: Vec<char> = normalized.chars().collect();

    let mut events = ldig::types::Events::new();
    model.trie.extract_features(&mut events, &chars);

    if margin.is_some() && events.len() < MIN_EVENTS_FOR_MARGIN {
        return Ok(());
    }

    let (y, predicted) = model.predict(&events);
    let label_name = model.label_name(predicted);

    if let Some(threshold) = margin {
        let mut sorted = y.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        let top = sorted.first().copied().unwrap_or(0.0);
        let second = sorted.get(1).copied().unwrap_or(0.0);
        if top - second > threshold {
            return Ok(());
        }
    }

    let _ = label_field;
    println!("{label_name}\t{:.4}\t{text_field}", y[predicted]);
    Ok(())
}
