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

use crate::storage::heap_page::PageKey;
use crate::tx::wait_for::WaitForGraph;
use crate::tx::{Perm, TransactionId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockResponse {
    Grant,
    Wait,
    Abort,
}

#[derive(Debug, Default)]
struct PageLocks {
    readers: HashSet<TransactionId>,
    writer: Option<TransactionId>,
}

impl PageLocks {
    fn is_empty(&self) -> bool {
        self.readers.is_empty() && self.writer.is_none()
    }
}

#[derive(Debug, Default)]
pub struct LockTable {
    locks: HashMap<PageKey, PageLocks>,
    held: HashMap<TransactionId, HashSet<PageKey>>,
    wait_graph: WaitForGraph,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_lock(&mut self, key: PageKey, tid: TransactionId, perm: Perm) -> LockResponse {
        // whatever this transaction was waiting for is superseded by this
        // request
        self.wait_graph.clear_waits(tid);

        let locks = self.locks.entry(key).or_default();
        match perm {
            Perm::Read => {
                if locks.writer.is_none() || locks.writer == Some(tid) {
                    if locks.writer != Some(tid) {
                        locks.readers.insert(tid);
                        self.held.entry(tid).or_default().insert(key);
                    }
                    return LockResponse::Grant;
                }
                if let Some(writer) = locks.writer {
                    self.wait_graph.add_edges(tid, [writer]);
                }
            }
            Perm::Write => {
                let read_ok = locks.readers.is_empty()
                    || (locks.readers.len() == 1 && locks.readers.contains(&tid));
                let write_ok = locks.writer.is_none() || locks.writer == Some(tid);
                if read_ok && write_ok {
                    // an upgrade surrenders the read entry
                    locks.readers.remove(&tid);
                    locks.writer = Some(tid);
                    self.held.entry(tid).or_default().insert(key);
                    return LockResponse::Grant;
                }

                let mut blockers: Vec<TransactionId> = Vec::new();
                if let Some(writer) = locks.writer {
                    if writer != tid {
                        blockers.push(writer);
                    }
                }
                blockers.extend(locks.readers.iter().copied().filter(|r| *r != tid));
                self.wait_graph.add_edges(tid, blockers);
            }
        }

        if self.wait_graph.detect_deadlock(tid) {
            LockResponse::Abort
        } else {
            LockResponse::Wait
        }
    }

    pub fn release_all(&mut self, tid: TransactionId) {
        if let Some(keys) = self.held.remove(&tid) {
            for key in keys {
                if let Some(locks) = self.locks.get_mut(&key) {
                    locks.readers.remove(&tid);
                    if locks.writer == Some(tid) {
                        locks.writer = None;
                    }
                    if locks.is_empty() {
                        self.locks.remove(&key);
                    }
                }
            }
        }
        self.wait_graph.remove_transaction(tid);
    }

    pub fn write_locked_pages(&self, tid: TransactionId) -> Vec<PageKey> {
        let Some(keys) = self.held.get(&tid) else {
            return Vec::new();
        };
        keys.iter()
            .copied()
            .filter(|key| {
                self.locks
                    .get(key)
                    .map_or(false, |locks| locks.writer == Some(tid))
            })
            .collect()
    }
}
