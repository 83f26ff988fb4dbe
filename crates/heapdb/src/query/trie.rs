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

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug)]
pub struct Trie<K, V> {
    children: HashMap<K, Trie<K, V>>,
    value: Option<V>,
}

impl<K: Eq + Hash + Clone, V> Trie<K, V> {
    pub fn new() -> Self {
        Self {
            children: HashMap::new(),
            value: None,
        }
    }

    pub fn get(&self, key: &[K]) -> Option<&V> {
        let mut node = self;
        for k in key {
            node = node.children.get(k)?;
        }
        node.value.as_ref()
    }

    pub fn set(&mut self, key: &[K], value: V) {
        let mut node = self;
        for k in key {
            node = node.children.entry(k.clone()).or_insert_with(Trie::new);
        }
        node.value = Some(value);
    }
}

impl<K: Eq + Hash + Clone, V> Default for Trie<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
