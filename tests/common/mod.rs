//! Shared helpers for ldig's external test suite.

use rand::rngs::StdRng;
use rand::SeedableRng;

use ldig::corpus::Corpus;
use ldig::model::Model;

/// A small two-language corpus, large enough to produce features at
/// `f_min = 2` without needing real-world data.
pub fn sample_corpus() -> Corpus {
    let lines: Vec<String> = [
        "en\thello there my friend how are you",
        "en\tgood morning to you my friend",
        "en\tthe weather today is quite lovely",
        "en\tthank you very much my friend",
        "fr\tbonjour mon ami comment allez vous",
        "fr\tbonne journee a vous mon ami",
        "fr\tle temps aujourd'hui est tres beau",
        "fr\tmerci beaucoup mon cher ami",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    Corpus::load_from_lines(&lines)
}

/// Train a small model over [`sample_corpus`] for `epochs` epochs with a
/// fixed `seed`, returning the trained model and the corpus it was trained
/// on.
pub fn train_sample_model(epochs: usize, seed: u64) -> (Model, Corpus) {
    let corpus = sample_corpus();
    let mut model = Model::new(corpus.labels().to_vec());
    model.generate_features(corpus.text().to_vec(), 2);
    let mut rng = StdRng::seed_from_u64(seed);
    ldig::learner::run_training(&mut model, &corpus, 0.3, 0.0, epochs, &mut rng);
    (model, corpus)
}
