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

pub struct KSubsetIter {
    c: Vec<usize>,
    k: usize,
    first: bool,
    done: bool,
}

impl KSubsetIter {
    pub fn new(n: usize, k: usize) -> Result<Self> {
        if k > n {
            return Err(Error::MalformedData(format!(
                "cannot take {k}-subsets of a {n}-element set"
            )));
        }
        // c[0] is unused; c[k+1] and c[k+2] are sentinels
        let mut c = vec![0_usize; k + 3];
        for j in 1..=k {
            c[j] = j - 1;
        }
        c[k + 1] = n;
        Ok(Self {
            c,
            k,
            first: true,
            done: false,
        })
    }

    pub fn next_subset(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if self.k == 0 {
            self.done = true;
            return Some(Vec::new());
        }
        if self.first {
            self.first = false;
            return Some(self.current());
        }

        let mut j = 1;
        while self.c[j] + 1 == self.c[j + 1] {
            self.c[j] = j - 1;
            j += 1;
        }
        if j > self.k {
            self.done = true;
            return None;
        }
        self.c[j] += 1;
        Some(self.current())
    }

    fn current(&self) -> Vec<usize> {
        (1..=self.k).map(|i| self.c[i]).collect()
    }
}

impl Iterator for KSubsetIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_subset()
    }
}
