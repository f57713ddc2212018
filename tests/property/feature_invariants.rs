//! Property tests for the feature-set and trie invariants: every feature
//! is a non-empty substring of its text,
//! `shrink` preserves slice content without growing the buffer, every
//! feature round-trips through the trie built from it, and a trie scan's
//! total hit count matches the number of substring occurrences.

use proptest::prelude::*;

use ldig::features::FeatureSet;
use ldig::trie::DoubleArrayTrie;
use ldig::types::Feature;

/// A corpus-ish string: lowercase ascii letters and a few repeats, long
/// enough that `f_min = 2` actually finds maximal substrings.
fn arb_corpus_text() -> impl Strategy<Value = String> {
    "[a-e]{20,80}"
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

proptest! {
    /// Property 1: every discovered feature's slice is a non-empty
    /// substring that fits inside its backing text.
    #[test]
    fn every_feature_is_nonempty_substring(text in arb_corpus_text(), f_min in 2usize..6) {
        let fs = FeatureSet::extract(chars(&text), f_min);
        for f in fs.iter() {
            prop_assert!(f.len > 0);
            prop_assert!(f.begin + f.len <= fs.text().len());
        }
    }

    /// Property 2: after `shrink`, every feature's slice content is
    /// unchanged and the buffer never grows.
    #[test]
    fn shrink_preserves_content_and_never_grows(text in arb_corpus_text(), f_min in 2usize..6) {
        let fs = FeatureSet::extract(chars(&text), f_min);
        let originals: Vec<Vec<char>> = fs.iter().map(|f| f.slice(fs.text()).to_vec()).collect();
        let raw_features: Vec<Feature> = fs.iter().collect();
        let text_before_len = fs.text().len();

        let mut shrunk = FeatureSet::with_text_and_features(fs.text().to_vec(), raw_features);
        shrunk.shrink();

        prop_assert!(shrunk.text().len() <= text_before_len);
        let mut after: Vec<Vec<char>> = shrunk.iter().map(|f| f.slice(shrunk.text()).to_vec()).collect();
        let mut before = originals;
        after.sort();
        before.sort();
        prop_assert_eq!(after, before);
    }

    /// Property 3: every feature round-trips through the trie built from
    /// its feature set: `trie.get(F[i].slice()) == i`.
    #[test]
    fn every_feature_round_trips_through_its_trie(text in arb_corpus_text(), f_min in 2usize..6) {
        let fs = FeatureSet::extract(chars(&text), f_min);
        let trie = DoubleArrayTrie::build(&fs);
        for i in 0..fs.len() {
            let slice = fs.slice(i).to_vec();
            prop_assert_eq!(trie.get(&slice), i as i64);
        }
    }

    /// Property 4: the sum of a trie scan's event counts equals the total
    /// number of substring occurrences of every feature in the scanned
    /// text (naive substring counting as the oracle).
    #[test]
    fn scan_hit_count_matches_naive_occurrence_count(
        text in arb_corpus_text(),
        f_min in 2usize..6,
        probe in "[a-e]{5,40}",
    ) {
        let fs = FeatureSet::extract(chars(&text), f_min);
        let trie = DoubleArrayTrie::build(&fs);
        let probe_chars = chars(&probe);

        let mut events = ldig::types::Events::new();
        trie.extract_features(&mut events, &probe_chars);
        let total_hits: u32 = events.values().sum();

        let expected: usize = (0..fs.len())
            .map(|i| {
                let needle = fs.slice(i);
                if needle.is_empty() || needle.len() > probe_chars.len() {
                    return 0;
                }
                probe_chars.windows(needle.len()).filter(|w| *w == needle).count()
            })
            .sum();

        prop_assert_eq!(total_hits as usize, expected);
    }
}
