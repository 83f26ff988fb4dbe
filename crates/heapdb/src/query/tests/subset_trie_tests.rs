/*
 * Copyright 2026 HeapDB Authors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use crate::error::Error;
use crate::query::subset_iter::KSubsetIter;
use crate::query::trie::Trie;
use proptest::prelude::*;
use std::collections::HashSet;

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let mut result = 1_usize;
    for i in 0..k.min(n - k) {
        result = result * (n - i) / (i + 1);
    }
    result
}

#[test]
fn subsets_are_distinct_sorted_and_lexicographic() {
    let subsets: Vec<Vec<usize>> = KSubsetIter::new(6, 3).expect("iterator").collect();
    assert_eq!(subsets.len(), binomial(6, 3));

    let distinct: HashSet<Vec<usize>> = subsets.iter().cloned().collect();
    assert_eq!(distinct.len(), subsets.len());

    for subset in &subsets {
        assert!(subset.windows(2).all(|w| w[0] < w[1]));
        assert!(subset.iter().all(|i| *i < 6));
    }
    for pair in subsets.windows(2) {
        assert!(pair[0] < pair[1], "not lexicographic: {pair:?}");
    }
}

#[test]
fn degenerate_sizes_behave() {
    let empty: Vec<Vec<usize>> = KSubsetIter::new(5, 0).expect("iterator").collect();
    assert_eq!(empty, vec![Vec::<usize>::new()]);

    let all: Vec<Vec<usize>> = KSubsetIter::new(4, 4).expect("iterator").collect();
    assert_eq!(all, vec![vec![0, 1, 2, 3]]);

    let none: Vec<Vec<usize>> = KSubsetIter::new(0, 0).expect("iterator").collect();
    assert_eq!(none, vec![Vec::<usize>::new()]);
}

#[test]
fn oversized_k_is_rejected() {
    assert!(matches!(
        KSubsetIter::new(3, 4),
        Err(Error::MalformedData(_))
    ));
}

proptest! {
    #[test]
    fn subset_counts_match_binomials(n in 0_usize..10, k in 0_usize..10) {
        prop_assume!(k <= n);
        let count = KSubsetIter::new(n, k).expect("iterator").count();
        prop_assert_eq!(count, binomial(n, k));
    }
}

#[test]
fn trie_stores_and_retrieves_by_sequence() {
    let mut trie: Trie<usize, &str> = Trie::new();
    trie.set(&[], "root");
    trie.set(&[1, 2, 3], "abc");
    trie.set(&[1, 2], "ab");

    assert_eq!(trie.get(&[]), Some(&"root"));
    assert_eq!(trie.get(&[1, 2]), Some(&"ab"));
    assert_eq!(trie.get(&[1, 2, 3]), Some(&"abc"));
    assert_eq!(trie.get(&[1]), None);
    assert_eq!(trie.get(&[2]), None);
    assert_eq!(trie.get(&[1, 2, 3, 4]), None);

    trie.set(&[1, 2], "overwritten");
    assert_eq!(trie.get(&[1, 2]), Some(&"overwritten"));
}
