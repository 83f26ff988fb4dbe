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

use crate::tx::TransactionId;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct WaitForGraph {
    edges: HashMap<TransactionId, HashSet<TransactionId>>,
}

impl WaitForGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edges(
        &mut self,
        tid: TransactionId,
        waits_on: impl IntoIterator<Item = TransactionId>,
    ) {
        let targets = self.edges.entry(tid).or_default();
        for t in waits_on {
            targets.insert(t);
        }
    }

    pub fn clear_waits(&mut self, tid: TransactionId) {
        self.edges.remove(&tid);
    }

    pub fn remove_transaction(&mut self, tid: TransactionId) {
        self.edges.remove(&tid);
        for targets in self.edges.values_mut() {
            targets.remove(&tid);
        }
    }

    pub fn detect_deadlock(&self, start: TransactionId) -> bool {
        let mut seen = HashSet::new();
        seen.insert(start);
        self.search(start, start, &mut seen)
    }

    fn search(
        &self,
        node: TransactionId,
        root: TransactionId,
        seen: &mut HashSet<TransactionId>,
    ) -> bool {
        let Some(targets) = self.edges.get(&node) else {
            return false;
        };
        for &next in targets {
            if next == root {
                return true;
            }
            if seen.insert(next) && self.search(next, root, seen) {
                return true;
            }
        }
        false
    }
}
