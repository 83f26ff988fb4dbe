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
use std::cmp::Ordering;
use std::sync::Arc;

pub struct OrderBy<'a> {
    keys: Vec<(Expr, bool)>,
    child: &'a dyn Operator,
}

impl<'a> OrderBy<'a> {
    pub fn new(keys: Vec<(Expr, bool)>, child: &'a dyn Operator) -> Self {
        Self { keys, child }
    }
}

impl Operator for OrderBy<'_> {
    fn descriptor(&self) -> Arc<Schema> {
        self.child.descriptor()
    }

    fn iterator(&self, tid: TransactionId) -> Result<TupleStream<'_>> {
        let mut child = self.child.iterator(tid)?;
        let mut rows: Vec<(Vec<Field>, Tuple)> = Vec::new();
        while let Some(tuple) = child()? {
            let mut key = Vec::with_capacity(self.keys.len());
            for (expr, _) in &self.keys {
                key.push(expr.eval(&tuple)?);
            }
            rows.push((key, tuple));
        }

        rows.sort_by(|(a, _), (b, _)| {
            for (idx, (_, ascending)) in self.keys.iter().enumerate() {
                // keys of one column share a type, so compare cannot fail here
                let ord = a[idx].compare(&b[idx]).unwrap_or(Ordering::Equal);
                let ord = if *ascending { ord } else { ord.reverse() };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        let mut sorted = rows.into_iter();
        Ok(Box::new(move || Ok(sorted.next().map(|(_, tuple)| tuple))))
    }
}
