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
use crate::types::BoolOp;

pub const INT_HIST_BINS: usize = 100;

#[derive(Debug, Clone)]
pub struct IntHistogram {
    bins: Vec<u64>,
    vmin: i64,
    vmax: i64,
    bin_width: i64,
    n: u64,
}

impl IntHistogram {
    pub fn new(n_bins: usize, vmin: i64, vmax: i64) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::MalformedData(
                "histogram needs at least one bin".to_string(),
            ));
        }
        if vmin > vmax {
            return Err(Error::MalformedData(format!(
                "histogram range [{vmin}, {vmax}] is empty"
            )));
        }
        let span = (vmax as i128 - vmin as i128 + 1) / n_bins as i128;
        let bin_width = span.clamp(1, i64::MAX as i128) as i64;
        Ok(Self {
            bins: vec![0; n_bins],
            vmin,
            vmax,
            bin_width,
            n: 0,
        })
    }

    fn bin(&self, v: i64) -> usize {
        let idx = (v as i128 - self.vmin as i128) / self.bin_width as i128;
        idx.clamp(0, self.bins.len() as i128 - 1) as usize
    }

    pub fn add_value(&mut self, v: i64) {
        let bin = self.bin(v);
        self.bins[bin] += 1;
        self.n += 1;
    }

    pub fn total(&self) -> u64 {
        self.n
    }

    pub fn estimate_selectivity(&self, op: BoolOp, v: i64) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        let mut lo = self.vmin;
        let mut hi = self.vmax;
        match op {
            BoolOp::Gt => lo = v.saturating_add(1),
            BoolOp::Lt => hi = v.saturating_sub(1),
            BoolOp::Ge => lo = v,
            BoolOp::Le => hi = v,
            BoolOp::Eq | BoolOp::Like => {
                lo = v;
                hi = v;
            }
            BoolOp::Neq => return 1.0 - self.estimate_selectivity(BoolOp::Eq, v),
        }

        if lo > hi {
            return 0.0;
        }
        if lo <= self.vmin && hi >= self.vmax {
            return 1.0;
        }

        let lo_bin = self.bin(lo);
        let hi_bin = self.bin(hi);
        let mut total = 0.0;
        for bin in lo_bin..=hi_bin {
            let bin_lo = self.vmin as i128 + self.bin_width as i128 * bin as i128;
            let bin_hi = bin_lo + self.bin_width as i128 - 1;
            let lo_cut = (lo as i128).max(bin_lo);
            let hi_cut = (hi as i128).min(bin_hi);
            if lo_cut <= hi_cut {
                let covered = (hi_cut - lo_cut + 1) as f64 / self.bin_width as f64;
                total += self.bins[bin] as f64 * covered;
            }
        }
        total / self.n as f64
    }
}
