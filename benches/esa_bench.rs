//! Enhanced suffix array construction throughput.
//!
//! Simulates the size of a concatenated training corpus: a few thousand
//! short, noisy lines glued into one code-point buffer, the shape
//! `FeatureSet::extract` actually hands to `esa::build`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ldig::esa;

fn synthetic_corpus(lines: usize, chars_per_line: usize) -> Vec<char> {
    let alphabet: Vec<char> = "abcdefghijklmnopqrstuvwxyz ".chars().collect();
    let mut text = Vec::with_capacity(lines * (chars_per_line + 1));
    let mut seed = 1u64;
    for _ in 0..lines {
        for _ in 0..chars_per_line {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let idx = (seed >> 33) as usize % alphabet.len();
            text.push(alphabet[idx]);
        }
        text.push('\u{0001}');
    }
    text
}

fn bench_esa_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("esa_build");
    for &(lines, chars_per_line) in &[(200usize, 40usize), (1_000, 60), (5_000, 80)] {
        let text = synthetic_corpus(lines, chars_per_line);
        group.throughput(Throughput::Elements(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{lines}x{chars_per_line}")),
            &text,
            |b, text| {
                b.iter(|| esa::build(black_box(text)));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_esa_build);
criterion_main!(benches);
