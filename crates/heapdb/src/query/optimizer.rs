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

use crate::error::{Error, Result};
use crate::query::subset_iter::KSubsetIter;
use crate::query::trie::Trie;
use crate::stats::Stats;
use std::sync::Arc;

pub const JOIN_BUFFER_SIZE: usize = 1000;

#[derive(Clone)]
pub struct TableInfo {
    pub name: String,
    pub stats: Arc<dyn Stats>,
    pub sel: f64,
}

impl TableInfo {
    pub fn new(name: impl Into<String>, stats: Arc<dyn Stats>, sel: f64) -> Self {
        Self {
            name: name.into(),
            stats,
            sel,
        }
    }

    fn cardinality(&self) -> usize {
        self.stats.estimate_cardinality(self.sel)
    }

    fn scan_cost(&self) -> f64 {
        self.stats.estimate_scan_cost()
    }
}

#[derive(Clone)]
pub struct JoinNode {
    pub left: TableInfo,
    pub left_field: String,
    pub right: TableInfo,
    pub right_field: String,
}

impl JoinNode {
    pub fn new(
        left: TableInfo,
        left_field: impl Into<String>,
        right: TableInfo,
        right_field: impl Into<String>,
    ) -> Self {
        Self {
            left,
            left_field: left_field.into(),
            right,
            right_field: right_field.into(),
        }
    }

    pub fn swap(&self) -> JoinNode {
        JoinNode {
            left: self.right.clone(),
            left_field: self.right_field.clone(),
            right: self.left.clone(),
            right_field: self.left_field.clone(),
        }
    }
}

pub fn estimate_join_cost(
    outer_card: usize,
    inner_card: usize,
    outer_cost: f64,
    inner_cost: f64,
) -> f64 {
    (outer_card + inner_card) as f64
        + outer_cost
        + (outer_card as f64 / JOIN_BUFFER_SIZE as f64).max(1.0) * inner_cost
}

pub fn estimate_join_cardinality(card1: usize, card2: usize) -> usize {
    if card1 == 0 || card2 == 0 {
        return 0;
    }
    card1.max(card2).max(1)
}

#[derive(Clone)]
struct OrderStats {
    order: Vec<JoinNode>,
    cost: f64,
    card: usize,
}

pub fn order_joins(joins: &[JoinNode]) -> Result<Vec<JoinNode>> {
    if joins.is_empty() {
        return Ok(Vec::new());
    }

    let mut memo: Trie<usize, OrderStats> = Trie::new();
    memo.set(
        &[],
        OrderStats {
            order: Vec::new(),
            cost: 0.0,
            card: 0,
        },
    );

    for k in 1..=joins.len() {
        let mut subsets = KSubsetIter::new(joins.len(), k)?;
        while let Some(set) = subsets.next_subset() {
            let mut best: Option<OrderStats> = None;
            for (pos, &j) in set.iter().enumerate() {
                let mut without = set.clone();
                without.remove(pos);
                // subsets are enumerated in sorted order, so the memo key for
                // the remainder is just the set with one index dropped
                let Some(prev) = memo.get(&without) else {
                    continue;
                };
                if let Some(candidate) = add_join(&joins[j], prev) {
                    if best.as_ref().map_or(true, |b| candidate.cost < b.cost) {
                        best = Some(candidate);
                    }
                }
            }
            if let Some(best) = best {
                memo.set(&set, best);
            }
        }
    }

    let full: Vec<usize> = (0..joins.len()).collect();
    memo.get(&full)
        .map(|stats| stats.order.clone())
        .ok_or_else(|| {
            Error::IncompatibleTypes("join predicates do not form a connected plan".to_string())
        })
}

fn has_table(order: &[JoinNode], name: &str) -> bool {
    order
        .iter()
        .any(|j| j.left.name == name || j.right.name == name)
}

fn add_join(join: &JoinNode, prev: &OrderStats) -> Option<OrderStats> {
    let card_lhs = join.left.cardinality();
    let cost_lhs = join.left.scan_cost();
    let card_rhs = join.right.cardinality();
    let cost_rhs = join.right.scan_cost();

    let mut options: Vec<OrderStats> = Vec::new();
    if prev.order.is_empty() {
        options.push(OrderStats {
            order: vec![join.clone()],
            cost: estimate_join_cost(card_lhs, card_rhs, cost_lhs, cost_rhs),
            card: estimate_join_cardinality(card_lhs, card_rhs),
        });
        options.push(OrderStats {
            order: vec![join.swap()],
            cost: estimate_join_cost(card_rhs, card_lhs, cost_rhs, cost_lhs),
            card: estimate_join_cardinality(card_rhs, card_lhs),
        });
    } else {
        if has_table(&prev.order, &join.left.name) {
            let mut order = prev.order.clone();
            order.push(join.clone());
            options.push(OrderStats {
                order,
                cost: estimate_join_cost(prev.card, card_rhs, prev.cost, cost_rhs),
                card: estimate_join_cardinality(prev.card, card_rhs),
            });
        }
        if has_table(&prev.order, &join.right.name) {
            let mut order = prev.order.clone();
            order.push(join.swap());
            options.push(OrderStats {
                order,
                cost: estimate_join_cost(prev.card, card_lhs, prev.cost, cost_lhs),
                card: estimate_join_cardinality(prev.card, card_lhs),
            });
        }
    }

    options.into_iter().min_by(|a, b| {
        a.cost
            .partial_cmp(&b.cost)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}
