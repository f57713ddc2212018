// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Model file parsing under adversarial input.
//!
//! `ldig::model::io::load_bytes` is the first thing that touches a
//! `.model` file handed to `--detection` or `--shrink`; a truncated
//! download, a bit-flipped copy, or a file from a different tool entirely
//! should produce an `Err`, never a panic or an out-of-bounds read. This
//! target hammers the parser with raw bytes, including lengths that claim
//! more data than exists and a CRC that doesn't match the body it covers.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ldig::model::io::load_bytes;

fuzz_target!(|data: &[u8]| {
    let result = load_bytes(data);

    if let Ok(model) = result {
        // Every loaded model must be internally consistent: the
        // parameter matrix is exactly m*k long, and every feature's
        // slice fits inside the loaded text buffer.
        assert_eq!(model.params.len(), model.m * model.k);
        assert_eq!(model.labels.len(), model.k);
        for i in 0..model.features.len() {
            let f = model.features.get(i);
            assert!(f.begin + f.len <= model.features.text().len());
        }
    }
});
