//! Property tests for the learner's numerical invariants: softmax always
//! produces a normalized distribution, an
//! unregularized SGD step decreases log-loss on the example it was taken
//! against, and prediction does not depend on the order events were
//! inserted into the sparse event map.

use proptest::prelude::*;

use ldig::learner::{predict, sgd_step};
use ldig::types::{Events, FeatureId};

/// `(k, m, params, events)` where `params` is exactly `m * k` long and
/// `events` touches every feature id in `0..m` with a small positive
/// count — the shapes `predict`/`sgd_step` expect.
fn arb_prediction_inputs(max_k: usize, max_m: usize) -> impl Strategy<Value = (usize, usize, Vec<f64>, Events)> {
    (2..=max_k, 1..=max_m).prop_flat_map(|(k, m)| {
        (
            Just(k),
            Just(m),
            proptest::collection::vec(-5.0f64..5.0, m * k),
            proptest::collection::vec(1u32..5, m),
        )
    }).prop_map(|(k, m, params, counts)| {
        let events: Events = counts
            .into_iter()
            .enumerate()
            .map(|(i, c)| (FeatureId(i as u32), c))
            .collect();
        (k, m, params, events)
    })
}

proptest! {
    /// Property 5: softmax output sums to 1 within 1e-9 and every entry is
    /// in the open interval (0, 1).
    #[test]
    fn softmax_is_a_probability_distribution((k, _m, params, events) in arb_prediction_inputs(6, 5)) {
        let (y, _) = predict(&params, k, &events);
        prop_assert_eq!(y.len(), k);
        let sum: f64 = y.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
        if k > 1 {
            prop_assert!(y.iter().all(|&p| p > 0.0 && p < 1.0));
        }
    }

    /// Property 6: an unregularized SGD step decreases log-loss on the
    /// example it was taken against whenever the model wasn't already
    /// confident (`y_t < 1 - eps`).
    #[test]
    fn sgd_step_decreases_log_loss_when_not_already_confident(
        (k, _m, params, events) in arb_prediction_inputs(4, 4),
        eta in 0.01f64..0.5,
    ) {
        let mut params = params;
        let true_label = 0usize;

        let (y_before, _) = predict(&params, k, &events);
        if y_before[true_label] < 1.0 - 1e-7 {
            let loss_before = -y_before[true_label].ln();
            sgd_step(&mut params, k, &events, true_label, eta);
            let (y_after, _) = predict(&params, k, &events);
            let loss_after = -y_after[true_label].ln();
            prop_assert!(loss_after <= loss_before + 1e-9);
        }
    }

    /// Property 7: prediction is invariant under permutation of event
    /// insertion order — a `HashMap`-backed event set already guarantees
    /// this structurally, but the property is worth pinning down directly
    /// against a reordered rebuild of the same map.
    #[test]
    fn prediction_is_invariant_under_event_reinsertion_order((k, _m, params, events) in arb_prediction_inputs(4, 4)) {
        let (y_a, argmax_a) = predict(&params, k, &events);

        let mut reordered = Events::new();
        for (&feat, &count) in events.iter().rev() {
            reordered.insert(feat, count);
        }
        let (y_b, argmax_b) = predict(&params, k, &reordered);

        prop_assert_eq!(y_a, y_b);
        prop_assert_eq!(argmax_a, argmax_b);
    }
}
