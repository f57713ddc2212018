// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! SGD step and softmax prediction under adversarial (but bounded) inputs.
//!
//! Parameters and event counts are clamped to a finite range — an
//! unregularized SGD update over astronomically large weights would
//! legitimately diverge, which isn't a bug in the update rule itself.
//! What must hold regardless is the numerical contract from the
//! specification: softmax always sums to 1 (property 5) and never
//! produces NaN/Inf for finite inputs, whatever those inputs are.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use ldig::learner::{predict, sgd_step};
use ldig::types::{Events, FeatureId};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    k_seed: u8,
    m_seed: u8,
    true_label_seed: u8,
    eta_seed: u16,
    param_seeds: Vec<i16>,
    count_seeds: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let k = (input.k_seed as usize % 6) + 1;
    let m = (input.m_seed as usize % 6) + 1;
    let true_label = input.true_label_seed as usize % k;
    let eta = (input.eta_seed as f64 / u16::MAX as f64) * 0.99 + 0.001;

    let mut params: Vec<f64> = (0..m * k)
        .map(|i| {
            let raw = *input.param_seeds.get(i % input.param_seeds.len().max(1)).unwrap_or(&0);
            raw as f64 / 1000.0
        })
        .collect();
    if params.is_empty() {
        return;
    }

    let mut events = Events::new();
    for i in 0..m {
        let raw = *input.count_seeds.get(i % input.count_seeds.len().max(1)).unwrap_or(&1);
        let count = (raw as u32 % 9) + 1;
        events.insert(FeatureId(i as u32), count);
    }

    let (y, _) = predict(&params, k, &events);
    assert!(y.iter().all(|v| v.is_finite()), "softmax produced a non-finite probability");
    let sum: f64 = y.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6, "softmax did not sum to 1: {sum}");

    sgd_step(&mut params, k, &events, true_label, eta);
    assert!(params.iter().all(|w| w.is_finite()), "SGD step produced a non-finite weight");
});
