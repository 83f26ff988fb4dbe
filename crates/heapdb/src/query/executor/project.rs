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

use crate::catalog::schema::{FieldDef, Schema};
use crate::error::{Error, Result};
use crate::query::expression::Expr;
use crate::query::{Operator, TupleStream};
use crate::storage::tuple::Tuple;
use crate::tx::TransactionId;
use crate::types::Field;
use std::collections::HashSet;
use std::sync::Arc;

pub struct Project<'a> {
    exprs: Vec<Expr>,
    out_schema: Arc<Schema>,
    distinct: bool,
    child: &'a dyn Operator,
}

impl<'a> Project<'a> {
    pub fn new(
        exprs: Vec<Expr>,
        output_names: Vec<String>,
        distinct: bool,
        child: &'a dyn Operator,
    ) -> Result<Self> {
        if exprs.len() != output_names.len() {
            return Err(Error::IncompatibleTypes(
                "projection needs one output name per expression".to_string(),
            ));
        }
        let fields = exprs
            .iter()
            .zip(&output_names)
            .map(|(expr, name)| FieldDef::new(name.clone(), expr.ftype()))
            .collect();
        Ok(Self {
            exprs,
            out_schema: Arc::new(Schema::new(fields)),
            distinct,
            child,
        })
    }
}

impl Operator for Project<'_> {
    fn descriptor(&self) -> Arc<Schema> {
        Arc::clone(&self.out_schema)
    }

    fn iterator(&self, tid: TransactionId) -> Result<TupleStream<'_>> {
        let mut child = self.child.iterator(tid)?;
        let mut seen: HashSet<Vec<Field>> = HashSet::new();
        Ok(Box::new(move || {
            while let Some(tuple) = child()? {
                let mut out = Vec::with_capacity(self.exprs.len());
                for expr in &self.exprs {
                    out.push(expr.eval(&tuple)?);
                }
                if self.distinct && !seen.insert(out.clone()) {
                    continue;
                }
                let mut projected = Tuple::new(Arc::clone(&self.out_schema), out)?;
                if let Some(rid) = tuple.rid {
                    projected = projected.with_rid(rid);
                }
                return Ok(Some(projected));
            }
            Ok(None)
        }))
    }
}
