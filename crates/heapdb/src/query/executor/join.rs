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
use crate::error::Result;
use crate::query::expression::Expr;
use crate::query::{Operator, TupleStream};
use crate::storage::tuple::Tuple;
use crate::tx::TransactionId;
use crate::types::Field;
use std::collections::HashMap;
use std::sync::Arc;

pub struct EqualityJoin<'a> {
    left_field: Expr,
    right_field: Expr,
    left: &'a dyn Operator,
    right: &'a dyn Operator,
    max_buffer: usize,
    out_schema: Arc<Schema>,
}

impl<'a> EqualityJoin<'a> {
    pub fn new(
        left: &'a dyn Operator,
        left_field: Expr,
        right: &'a dyn Operator,
        right_field: Expr,
        max_buffer: usize,
    ) -> Self {
        let out_schema = Arc::new(left.descriptor().merge(&right.descriptor()));
        Self {
            left_field,
            right_field,
            left,
            right,
            max_buffer: max_buffer.max(1),
            out_schema,
        }
    }
}

impl Operator for EqualityJoin<'_> {
    fn descriptor(&self) -> Arc<Schema> {
        Arc::clone(&self.out_schema)
    }

    fn iterator(&self, tid: TransactionId) -> Result<TupleStream<'_>> {
        let mut outer = self.left.iterator(tid)?;
        let mut inner: Option<TupleStream<'_>> = None;
        let mut table: HashMap<Field, Vec<Tuple>> = HashMap::new();
        let mut outer_done = false;
        let mut need_batch = true;
        let mut pending: Vec<Tuple> = Vec::new();
        let mut pending_inner: Option<Tuple> = None;
        let mut match_idx = 0_usize;

        Ok(Box::new(move || loop {
            if match_idx < pending.len() {
                if let Some(probe) = &pending_inner {
                    let joined =
                        Tuple::join(&pending[match_idx], probe, Arc::clone(&self.out_schema));
                    match_idx += 1;
                    return Ok(Some(joined));
                }
            }
            pending.clear();
            match_idx = 0;
            pending_inner = None;

            if need_batch {
                if outer_done {
                    return Ok(None);
                }
                table.clear();
                let mut loaded = 0_usize;
                while loaded < self.max_buffer {
                    match outer()? {
                        Some(tuple) => {
                            let key = self.left_field.eval(&tuple)?;
                            table.entry(key).or_default().push(tuple);
                            loaded += 1;
                        }
                        None => {
                            outer_done = true;
                            break;
                        }
                    }
                }
                if loaded == 0 {
                    return Ok(None);
                }
                inner = Some(self.right.iterator(tid)?);
                need_batch = false;
            }

            let Some(inner_iter) = inner.as_mut() else {
                return Ok(None);
            };
            match inner_iter()? {
                Some(tuple) => {
                    let key = self.right_field.eval(&tuple)?;
                    if let Some(matches) = table.get(&key) {
                        pending = matches.clone();
                    }
                    pending_inner = Some(tuple);
                }
                None => {
                    inner = None;
                    need_batch = true;
                }
            }
        }))
    }
}
