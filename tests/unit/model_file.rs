//! Model file save/load from the public API: a reloaded model must predict
//! exactly like the one that was saved.

use ldig::model::io;

#[test]
fn reloaded_model_predicts_identically_to_the_original() {
    let (model, corpus) = crate::common::train_sample_model(6, 11);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ldig.model");
    io::save(&model, &path).unwrap();
    let reloaded = io::load(&path).unwrap();

    assert_eq!(reloaded.labels, model.labels);
    assert_eq!(reloaded.m, model.m);

    for label in 0..corpus.labels().len() {
        for example in corpus.examples(label) {
            let original = model.predict_text(corpus.slice(*example));
            let after_reload = reloaded.predict_text(corpus.slice(*example));
            assert_eq!(original.1, after_reload.1, "predicted label diverged after reload");
            for (a, b) in original.0.iter().zip(after_reload.0.iter()) {
                assert!((a - b).abs() < 1e-12, "predicted probabilities diverged after reload");
            }
        }
    }
}

#[test]
fn shrunk_model_still_round_trips() {
    let (mut model, _corpus) = crate::common::train_sample_model(6, 12);
    ldig::learner::shrink(&mut model);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ldig.model");
    io::save(&model, &path).unwrap();
    let reloaded = io::load(&path).unwrap();

    assert_eq!(reloaded.m, model.m);
    assert_eq!(reloaded.params, model.params);
}
