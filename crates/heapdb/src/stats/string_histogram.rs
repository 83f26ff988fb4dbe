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

use crate::error::Result;
use crate::stats::int_histogram::IntHistogram;
use crate::types::BoolOp;

pub const STR_HIST_BINS: usize = 1024;
const STR_FEATURE_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct StringHistogram {
    inner: IntHistogram,
}

impl StringHistogram {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: IntHistogram::new(STR_HIST_BINS, 0, STR_HIST_BINS as i64 - 1)?,
        })
    }

    pub fn add_value(&mut self, s: &str) {
        self.inner.add_value(str_feature(s));
    }

    pub fn estimate_selectivity(&self, op: BoolOp, s: &str) -> f64 {
        self.inner.estimate_selectivity(op, str_feature(s))
    }

    pub fn total(&self) -> u64 {
        self.inner.total()
    }
}

fn str_feature(s: &str) -> i64 {
    let mut h: i64 = 0;
    for &b in s.as_bytes().iter().take(STR_FEATURE_LEN) {
        h = h * 131 + i64::from(b);
    }
    h.rem_euclid(STR_HIST_BINS as i64)
}
