// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Double-array trie construction: a breadth-first walk over the implicit
//! trie formed by a sorted feature list, allocating `base` offsets from a
//! free list of unoccupied cells.
//!
//! The free list in the algorithm this is modeled on is an intrusive
//! doubly-linked list embedded in the negative values of `base`/`check`.
//! Cells are only ever appended at the tail (each array doubling adds a
//! contiguous run of new free cells) and removed from wherever they're
//! allocated; removing an element from a sorted linked list never changes
//! the relative order of what's left. So the chain of free cells is always
//! exactly its indices in ascending order, and "the next free cell after
//! this one" is always "the next-larger index still free" — which a
//! `BTreeSet<usize>` gives directly, without needing to hand-decode
//! negative-encoded pointers out of the array cells themselves.
//!
//! `free` starts empty (index 0 is the root node, never a free cell), so
//! every lookup grows the arrays first when there's nothing to hand back
//! rather than assuming a prior growth already happened.

use std::collections::{BTreeSet, VecDeque};

use crate::features::FeatureSet;

pub(super) fn build(features: &FeatureSet) -> (Vec<i64>, Vec<i64>, Vec<i64>) {
    let text = features.text();
    let m = features.len();

    let mut base: Vec<i64> = vec![-1];
    let mut check: Vec<i64> = vec![-1];
    let mut value: Vec<i64> = vec![-1];
    let mut free: BTreeSet<usize> = BTreeSet::new();

    if m == 0 {
        return (base, check, value);
    }

    let extend = |base: &mut Vec<i64>,
                  check: &mut Vec<i64>,
                  value: &mut Vec<i64>,
                  free: &mut BTreeSet<usize>,
                  max_cand: usize| {
        let old_n = base.len();
        let mut n = old_n;
        while n <= max_cand {
            n *= 2;
        }
        if n <= old_n {
            return;
        }
        base.resize(n, -1);
        check.resize(n, -1);
        value.resize(n, -1);
        for i in old_n..n {
            free.insert(i);
        }
    };

    // Pull the smallest free cell at or after `from`, growing the arrays
    // (which seeds fresh cells into `free`) until one exists. `free` starts
    // empty — index 0 is the root, never a free cell — so the very first
    // call always grows before it can return anything.
    let next_free = |base: &mut Vec<i64>,
                      check: &mut Vec<i64>,
                      value: &mut Vec<i64>,
                      free: &mut BTreeSet<usize>,
                      from: usize| {
        loop {
            if let Some(&h) = free.range(from..).next() {
                return h;
            }
            let candidate = base.len().max(from);
            extend(base, check, value, free, candidate);
        }
    };

    let mut queue: VecDeque<(usize, usize, usize, usize)> = VecDeque::new();
    queue.push_back((0, 0, m, 0));
    let mut max_index = 0usize;

    while let Some((da_index, mut left, right, depth)) = queue.pop_front() {
        if depth >= features.get(left).len {
            value[da_index] = left as i64;
            left += 1;
            if left >= right {
                continue;
            }
        }

        // Partition [left, right) into runs sharing the character at
        // `depth`. The range is already sorted (every feature in it shares
        // a common prefix of length `depth`, so ordering by slice content
        // is ordering by the character at `depth`), so this is a single
        // linear scan rather than the stack-based binary descent some
        // double-array implementations use purely for performance — same
        // output, same order, simpler code.
        let mut branches: Vec<(usize, char)> = Vec::new();
        let mut run_char = text[features.get(left).begin + depth];
        for i in (left + 1)..right {
            let c = text[features.get(i).begin + depth];
            if c != run_char {
                branches.push((i, run_char));
                run_char = c;
            }
        }
        branches.push((right, run_char));

        let v0 = branches[0].1 as i64;
        let mut head = next_free(&mut base, &mut check, &mut value, &mut free, 0);
        let mut j: i64 = head as i64 - v0;
        loop {
            let blocked = branches.iter().any(|&(_, c)| {
                let k = j + c as i64;
                k >= 0 && (k as usize) < check.len() && check[k as usize] >= 0
            });
            if !blocked {
                break;
            }
            let cur = (j + v0) as usize;
            head = next_free(&mut base, &mut check, &mut value, &mut free, cur + 1);
            j = head as i64 - v0;
        }

        let tail_index = (j + branches.last().unwrap().1 as i64) as usize;
        if tail_index > max_index {
            max_index = tail_index;
            extend(&mut base, &mut check, &mut value, &mut free, tail_index + 2);
        }

        base[da_index] = j;
        let mut child_left = left;
        let next_depth = depth + 1;
        for &(end, c) in &branches {
            let child = (j + c as i64) as usize;
            free.remove(&child);
            check[child] = da_index as i64;
            queue.push_back((child, child_left, end, next_depth));
            child_left = end;
        }
    }

    let final_len = max_index + 1;
    base.truncate(final_len);
    check.truncate(final_len);
    value.truncate(final_len);
    (base, check, value)
}
