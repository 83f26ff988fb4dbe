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

use crate::catalog::schema::Schema;
use crate::error::{Error, Result};
use crate::query::Operator;
use crate::stats::int_histogram::{IntHistogram, INT_HIST_BINS};
use crate::stats::string_histogram::StringHistogram;
use crate::storage::buffer_pool::BufferPool;
use crate::storage::heap_file::HeapFile;
use crate::tx::TransactionId;
use crate::types::{BoolOp, Field, FieldType};
use std::sync::Arc;

pub const SCAN_COST_PER_PAGE: f64 = 2.0;

pub trait Stats {
    fn estimate_scan_cost(&self) -> f64;
    fn estimate_cardinality(&self, sel: f64) -> usize;
    fn estimate_selectivity(&self, field: &str, op: BoolOp, value: &Field) -> Result<f64>;
}

#[derive(Debug, Clone)]
enum ColumnHistogram {
    Int(IntHistogram),
    Str(StringHistogram),
}

#[derive(Debug, Clone)]
pub struct TableStats {
    schema: Arc<Schema>,
    num_pages: usize,
    num_tuples: usize,
    columns: Vec<ColumnHistogram>,
}

impl TableStats {
    pub fn compute(pool: &BufferPool, file: &HeapFile) -> Result<TableStats> {
        let tid = TransactionId::new();
        pool.begin_transaction(tid)?;
        match Self::compute_inner(file, tid) {
            Ok(stats) => {
                pool.commit_transaction(tid)?;
                Ok(stats)
            }
            Err(err) => {
                let _ = pool.abort_transaction(tid);
                Err(err)
            }
        }
    }

    fn compute_inner(file: &HeapFile, tid: TransactionId) -> Result<TableStats> {
        let schema = Arc::clone(file.schema());
        let n_fields = schema.fields.len();

        let mut mins = vec![i64::MAX; n_fields];
        let mut maxs = vec![i64::MIN; n_fields];
        let mut num_tuples = 0_usize;

        let mut iter = file.iterator(tid)?;
        while let Some(tuple) = iter()? {
            num_tuples += 1;
            for (idx, field) in tuple.fields.iter().enumerate() {
                if let Field::Int(v) = field {
                    mins[idx] = mins[idx].min(*v);
                    maxs[idx] = maxs[idx].max(*v);
                }
            }
        }

        let mut columns = Vec::with_capacity(n_fields);
        for (idx, def) in schema.fields.iter().enumerate() {
            columns.push(match def.ftype {
                FieldType::Int => {
                    let (lo, hi) = if mins[idx] > maxs[idx] {
                        (0, 0)
                    } else {
                        (mins[idx], maxs[idx])
                    };
                    ColumnHistogram::Int(IntHistogram::new(INT_HIST_BINS, lo, hi)?)
                }
                FieldType::Str => ColumnHistogram::Str(StringHistogram::new()?),
            });
        }

        let mut iter = file.iterator(tid)?;
        while let Some(tuple) = iter()? {
            for (field, column) in tuple.fields.iter().zip(columns.iter_mut()) {
                match (field, column) {
                    (Field::Int(v), ColumnHistogram::Int(hist)) => hist.add_value(*v),
                    (Field::Str(s), ColumnHistogram::Str(hist)) => hist.add_value(s),
                    _ => {
                        return Err(Error::TypeMismatch(
                            "tuple does not match its table schema".to_string(),
                        ))
                    }
                }
            }
        }

        Ok(TableStats {
            schema,
            num_pages: file.num_pages(),
            num_tuples,
            columns,
        })
    }

    pub fn num_tuples(&self) -> usize {
        self.num_tuples
    }

    pub fn num_pages(&self) -> usize {
        self.num_pages
    }
}

impl Stats for TableStats {
    fn estimate_scan_cost(&self) -> f64 {
        self.num_pages as f64 * SCAN_COST_PER_PAGE
    }

    fn estimate_cardinality(&self, sel: f64) -> usize {
        (self.num_tuples as f64 * sel).round() as usize
    }

    fn estimate_selectivity(&self, field: &str, op: BoolOp, value: &Field) -> Result<f64> {
        let idx = self
            .schema
            .field_index(field)
            .ok_or_else(|| Error::TypeMismatch(format!("no column named {field}")))?;
        match (&self.columns[idx], value) {
            (ColumnHistogram::Int(hist), Field::Int(v)) => Ok(hist.estimate_selectivity(op, *v)),
            (ColumnHistogram::Str(hist), Field::Str(s)) => Ok(hist.estimate_selectivity(op, s)),
            _ => Err(Error::TypeMismatch(format!(
                "operand type does not match column {field}"
            ))),
        }
    }
}
