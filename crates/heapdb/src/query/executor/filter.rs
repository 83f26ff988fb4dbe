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
use crate::tx::TransactionId;
use crate::types::BoolOp;
use std::sync::Arc;

pub struct Filter<'a> {
    field: Expr,
    op: BoolOp,
    constant: Expr,
    child: &'a dyn Operator,
}

impl<'a> Filter<'a> {
    pub fn new(field: Expr, op: BoolOp, constant: Expr, child: &'a dyn Operator) -> Self {
        Self {
            field,
            op,
            constant,
            child,
        }
    }
}

impl Operator for Filter<'_> {
    fn descriptor(&self) -> Arc<Schema> {
        self.child.descriptor()
    }

    fn iterator(&self, tid: TransactionId) -> Result<TupleStream<'_>> {
        let mut child = self.child.iterator(tid)?;
        Ok(Box::new(move || {
            while let Some(tuple) = child()? {
                let left = self.field.eval(&tuple)?;
                let right = self.constant.eval(&tuple)?;
                if left.eval_pred(&right, self.op)? {
                    return Ok(Some(tuple));
                }
            }
            Ok(None)
        }))
    }
}
