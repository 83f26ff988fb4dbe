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
use crate::query::{Operator, TupleStream};
use crate::tx::TransactionId;
use std::sync::Arc;

pub struct Limit<'a> {
    limit: usize,
    child: &'a dyn Operator,
}

impl<'a> Limit<'a> {
    pub fn new(limit: usize, child: &'a dyn Operator) -> Self {
        Self { limit, child }
    }
}

impl Operator for Limit<'_> {
    fn descriptor(&self) -> Arc<Schema> {
        self.child.descriptor()
    }

    fn iterator(&self, tid: TransactionId) -> Result<TupleStream<'_>> {
        let mut child = self.child.iterator(tid)?;
        let mut remaining = self.limit;
        Ok(Box::new(move || {
            if remaining == 0 {
                return Ok(None);
            }
            match child()? {
                Some(tuple) => {
                    remaining -= 1;
                    Ok(Some(tuple))
                }
                None => {
                    remaining = 0;
                    Ok(None)
                }
            }
        }))
    }
}
